fn main() -> anyhow::Result<()> {
    soundboard_admin::cli::run()
}

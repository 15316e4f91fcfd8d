use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Args;
use tokio::runtime::Handle;

use crate::api::SoundApi;
use crate::app::App;
use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::mutation::{BootstrapStatus, DeleteCoordinator, DeleteOutcome, FetchBootstrap};
use crate::notify::{ConsoleNotifier, Notifier};
use crate::ui::plain_page;
use crate::upload::{upload_succeeded_message, UploadDraft, UPLOAD_FAILED_MESSAGE};

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Page to print (clamped to the available pages)
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub page: i64,
}

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    /// Name of the sound to delete
    pub id: String,
}

#[derive(Args, Debug, Clone)]
pub struct UploadArgs {
    /// MP3 file to upload
    #[arg()]
    pub file: Option<PathBuf>,
    /// Name the sound is redeemed by
    #[arg(long, default_value = "")]
    pub name: String,
    /// Price in channel points
    #[arg(long, default_value = "")]
    pub price: String,
    /// Cooldown amount, in --unit
    #[arg(long, default_value = "")]
    pub cooldown: String,
    /// Cooldown unit: day, hour, minute, second or millisecond
    #[arg(long)]
    pub unit: Option<String>,
}

pub fn run_tui(config: Arc<AppConfig>, api: Arc<dyn SoundApi>, runtime: Handle) -> Result<()> {
    let mut app = App::new(config, api, runtime);
    app.run()
}

async fn load_catalog<A>(api: &A) -> Result<Catalog>
where
    A: SoundApi + ?Sized,
{
    let mut catalog = Catalog::new();
    let mut bootstrap = FetchBootstrap::new();
    if bootstrap.run(api, &mut catalog).await == BootstrapStatus::Failed {
        bail!("could not fetch the sound catalog, see log output");
    }
    Ok(catalog)
}

pub async fn list_sounds<A>(api: &A, args: ListArgs) -> Result<()>
where
    A: SoundApi + ?Sized,
{
    let mut catalog = load_catalog(api).await?;
    catalog.change_page(args.page);
    if catalog.current_page() as i64 != args.page {
        tracing::info!(
            requested = args.page,
            max_page = catalog.max_page(),
            "page out of range, showing page {}",
            catalog.current_page()
        );
    }
    println!("{}", plain_page(&catalog));
    Ok(())
}

pub async fn delete_sound<A>(api: &A, args: DeleteArgs) -> Result<()>
where
    A: SoundApi + ?Sized,
{
    let mut catalog = load_catalog(api).await?;
    if !catalog.store().contains(&args.id) {
        tracing::warn!(id = %args.id, "sound not in the fetched catalog, deleting anyway");
    }
    let mut coordinator = DeleteCoordinator::new();
    let mut notifier = ConsoleNotifier;
    match coordinator
        .delete(&mut catalog, api, &mut notifier, &args.id)
        .await
    {
        DeleteOutcome::Deleted { .. } => Ok(()),
        DeleteOutcome::Failed { id } => bail!("deleting {id} failed"),
        DeleteOutcome::Rejected => bail!("another delete is already in flight"),
    }
}

pub async fn upload_sound<A>(config: Arc<AppConfig>, api: &A, args: UploadArgs) -> Result<()>
where
    A: SoundApi + ?Sized,
{
    let draft = UploadDraft {
        file: args.file,
        name: args.name,
        price: args.price,
        cooldown: args.cooldown,
        cooldown_unit: args
            .unit
            .unwrap_or_else(|| config.ui.default_cooldown_unit.to_string()),
    };
    let mut notifier = ConsoleNotifier;
    let upload = match draft.validate() {
        Ok(upload) => upload,
        Err(err) => {
            notifier.notify_error(&err.to_string());
            bail!("upload rejected: {err}");
        }
    };
    match api.upload_sound(&upload).await {
        Ok(()) => {
            tracing::info!(name = %upload.name, price = upload.price, cooldown_ms = upload.cooldown_millis, "uploaded sound");
            notifier.notify_success(&upload_succeeded_message(&upload));
            Ok(())
        }
        Err(err) => {
            tracing::warn!(?err, name = %upload.name, "upload failed");
            notifier.notify_error(UPLOAD_FAILED_MESSAGE);
            bail!("upload of {} failed", upload.name);
        }
    }
}

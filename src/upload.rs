use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::api::SoundUpload;
use crate::units;

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").expect("valid number pattern"));

pub const UPLOAD_FAILED_MESSAGE: &str =
    "Failed to upload the new Audio... Perhaps it already exists?";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("You must select an Audio file.")]
    MissingFile,
    #[error("The file type must be of MP3.")]
    NotMp3,
    #[error("Audio name must NOT be empty.")]
    EmptyName,
    #[error("Audio Price is either invalid or missing - make sure it's a number with no decimals!")]
    InvalidPrice,
    #[error(
        "Audio Cooldown is either invalid or missing - make sure it's a number with no decimals!"
    )]
    InvalidCooldown,
}

/// Raw form input for a new sound, as typed by the admin.
#[derive(Debug, Clone, Default)]
pub struct UploadDraft {
    pub file: Option<PathBuf>,
    pub name: String,
    pub price: String,
    pub cooldown: String,
    pub cooldown_unit: String,
}

impl UploadDraft {
    /// Checks fields in form order and converts the cooldown to
    /// milliseconds.
    pub fn validate(&self) -> Result<SoundUpload, UploadError> {
        let file = self.file.as_ref().ok_or(UploadError::MissingFile)?;
        let is_mp3 = file
            .file_name()
            .map(|name| name.to_string_lossy().ends_with("mp3"))
            .unwrap_or(false);
        if !is_mp3 {
            return Err(UploadError::NotMp3);
        }
        if self.name.is_empty() {
            return Err(UploadError::EmptyName);
        }
        let price = parse_whole_number(&self.price).ok_or(UploadError::InvalidPrice)?;
        let cooldown = match parse_whole_number(&self.cooldown) {
            Some(value) => value,
            None => {
                tracing::debug!(cooldown = %self.cooldown, "rejected cooldown input");
                return Err(UploadError::InvalidCooldown);
            }
        };
        Ok(SoundUpload {
            name: self.name.clone(),
            price,
            cooldown_millis: units::to_millis(&self.cooldown_unit, cooldown),
            file: file.clone(),
        })
    }
}

pub fn upload_succeeded_message(upload: &SoundUpload) -> String {
    format!(
        "You have added the Audio {} to the roster with a price of {}.",
        upload.name, upload.price
    )
}

fn parse_whole_number(input: &str) -> Option<u64> {
    if !NUMBER.is_match(input) {
        return None;
    }
    input.parse().ok()
}

//! Bundled default avatar images.

use std::path::Path;

use serde::Serialize;

use habitual_core::config::AvatarsConfig;

use crate::error::{ServiceError, ServiceResult};

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefaultAvatar {
    /// File name without its extension.
    pub id: String,
    pub filename: String,
    pub url: String,
}

/// File stem of `name` when it has an image extension.
fn image_stem(name: &str) -> Option<&str> {
    let (stem, extension) = name.rsplit_once('.')?;
    IMAGE_EXTENSIONS
        .iter()
        .any(|known| extension.eq_ignore_ascii_case(known))
        .then_some(stem)
}

/// ## Summary
/// Lists the image files of the default avatar directory, sorted by file name.
///
/// ## Errors
/// Returns an I/O error if the directory cannot be read.
#[tracing::instrument(skip(config), fields(dir = %config.default_dir))]
pub async fn list_default_avatars(config: &AvatarsConfig) -> ServiceResult<Vec<DefaultAvatar>> {
    let mut dir = tokio::fs::read_dir(Path::new(&config.default_dir)).await?;
    let mut avatars = Vec::new();

    while let Some(item) = dir.next_entry().await? {
        if !item.file_type().await?.is_file() {
            continue;
        }
        let Ok(filename) = item.file_name().into_string() else {
            continue;
        };
        let Some(stem) = image_stem(&filename) else {
            continue;
        };
        avatars.push(DefaultAvatar {
            id: stem.to_string(),
            url: format!("{}{filename}", config.url_prefix),
            filename,
        });
    }

    avatars.sort_by(|a, b| a.filename.cmp(&b.filename));
    tracing::trace!(count = avatars.len(), "Default avatars listed");

    Ok(avatars)
}

/// ## Summary
/// Accepts only `<prefix><file>` where `<file>` is a single plain file name.
///
/// ## Errors
/// Returns a `ValidationError` ("Invalid default avatar URL") otherwise.
pub fn validate_default_avatar_url(url: &str, prefix: &str) -> ServiceResult<()> {
    let invalid = || ServiceError::validation("Invalid default avatar URL");

    let filename = url.strip_prefix(prefix).ok_or_else(invalid)?;
    if filename.is_empty()
        || filename.contains(['/', '\\'])
        || filename.contains("..")
    {
        return Err(invalid());
    }

    Ok(())
}

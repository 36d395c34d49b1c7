use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Downloads attachment bytes into the notes directory
pub struct AttachmentFetcher {
    client: reqwest::Client,
}

impl Default for AttachmentFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl AttachmentFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Stream `url` into `destination`, replacing any existing file.
    /// Returns the number of bytes written.
    ///
    /// The body lands in a staging file next to `destination` and is renamed
    /// into place only once complete. The URL carries the bot token, so it is
    /// stripped from errors.
    pub async fn fetch(&self, url: &str, destination: &Path) -> Result<u64> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| e.without_url())
            .context("Failed to send download request")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Download failed with status {}", status);
        }

        let staging = staging_path(destination)?;
        let written = match download(response, &staging).await {
            Ok(written) => written,
            Err(e) => {
                discard(&staging).await;
                return Err(e);
            }
        };

        if let Err(e) = tokio::fs::rename(&staging, destination).await {
            discard(&staging).await;
            return Err(e)
                .with_context(|| format!("Failed to move file into place: {}", destination.display()));
        }

        debug!("Downloaded {} bytes to {}", written, destination.display());
        Ok(written)
    }
}

async fn download(mut response: reqwest::Response, path: &Path) -> Result<u64> {
    let mut file = tokio::fs::File::create(path)
        .await
        .with_context(|| format!("Failed to create file: {}", path.display()))?;

    let mut written = 0u64;
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| e.without_url())
        .context("Failed to read download body")?
    {
        file.write_all(&chunk)
            .await
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        written += chunk.len() as u64;
    }
    file.flush()
        .await
        .with_context(|| format!("Failed to write file: {}", path.display()))?;

    Ok(written)
}

/// Write `contents` to `path` in one piece: either the complete file appears
/// under its final name or nothing does.
pub async fn write_atomically(path: &Path, contents: &[u8]) -> Result<()> {
    let staging = staging_path(path)?;

    let result: Result<()> = async {
        tokio::fs::write(&staging, contents)
            .await
            .with_context(|| format!("Failed to write file: {}", staging.display()))?;
        tokio::fs::rename(&staging, path)
            .await
            .with_context(|| format!("Failed to move file into place: {}", path.display()))
    }
    .await;

    if result.is_err() {
        discard(&staging).await;
    }
    result
}

/// Hidden sibling `.{name}.part` used while a file is being written
fn staging_path(path: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .with_context(|| format!("Path has no file name: {}", path.display()))?;
    Ok(path.with_file_name(format!(".{}.part", name.to_string_lossy())))
}

async fn discard(staging: &Path) {
    if let Err(e) = tokio::fs::remove_file(staging).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Failed to remove {}: {}", staging.display(), e);
        }
    }
}

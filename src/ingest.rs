use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::auth;
use crate::compose::{self, FetchedAttachments, SavedDocument};
use crate::config::Config;
use crate::fetch::{self, AttachmentFetcher};
use crate::platform::{AttachmentRef, Transport, Update};

/// What happened to a single update
#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// The update carried no message
    NoMessage,
    /// Sent by someone other than the authorized user
    Rejected,
    /// Note written to this path
    Saved(PathBuf),
    /// Composing worked but the note could not be written
    WriteFailed,
}

/// Pulls updates from a transport and archives each accepted one as a note.
/// Updates are handled one at a time, in delivery order.
pub struct Ingestor<'a, T: Transport> {
    config: &'a Config,
    transport: T,
    fetcher: AttachmentFetcher,
}

impl<'a, T: Transport> Ingestor<'a, T> {
    pub fn new(config: &'a Config, transport: T, fetcher: AttachmentFetcher) -> Self {
        Self {
            config,
            transport,
            fetcher,
        }
    }

    /// Process updates until the transport's stream ends.
    pub async fn run(&mut self) {
        while let Some(update) = self.transport.next_update().await {
            let update_id = update.id;
            match self.process(update, Utc::now()).await {
                Outcome::NoMessage => debug!("Update {} has no message, skipping", update_id),
                Outcome::Rejected => debug!("Update {} is not from the authorized user", update_id),
                Outcome::Saved(path) => info!("Saved note: {}", path.display()),
                Outcome::WriteFailed => warn!("Update {} dropped", update_id),
            }
        }
        info!("Update stream closed");
    }

    /// Handle one update. `saved_at` feeds every time-derived file name.
    pub async fn process(&self, update: Update, saved_at: DateTime<Utc>) -> Outcome {
        let Some(message) = update.message.as_ref() else {
            return Outcome::NoMessage;
        };
        if !auth::is_authorized(&update, self.config.telegram.authorized_user_id) {
            return Outcome::Rejected;
        }

        debug!("Archiving update {} sent at {}", update.id, message.date);

        let notes_dir = &self.config.notes.directory;
        let note_path = notes_dir.join(compose::note_file_name(update.id, saved_at));

        let mut attachments = FetchedAttachments::default();

        if let Some(doc) = &message.document {
            let attachment = doc.attachment();
            let local_name = compose::document_file_name(attachment.display_name, saved_at);
            match self.materialize(attachment, &local_name).await {
                Ok(()) => {
                    attachments.document = Some(SavedDocument {
                        display_name: attachment
                            .display_name
                            .unwrap_or(&local_name)
                            .to_string(),
                        local_name,
                    })
                }
                Err(e) => warn!(
                    "Skipping document of update {}: {:#}",
                    update.id, e
                ),
            }
        }

        // Variants come smallest first
        if let Some(photo) = message.photos.last() {
            debug!("Picked {}x{} photo variant", photo.width, photo.height);
            let local_name = compose::photo_file_name(saved_at);
            match self.materialize(photo.attachment(), &local_name).await {
                Ok(()) => attachments.photo = Some(local_name),
                Err(e) => warn!("Skipping photo of update {}: {:#}", update.id, e),
            }
        }

        let content = compose::compose(message, &attachments);

        match fetch::write_atomically(&note_path, content.as_bytes()).await {
            Ok(()) => Outcome::Saved(note_path),
            Err(e) => {
                error!("Failed to write note {}: {:#}", note_path.display(), e);
                Outcome::WriteFailed
            }
        }
    }

    /// Resolve and download an attachment into the notes directory.
    async fn materialize(&self, attachment: AttachmentRef<'_>, local_name: &str) -> Result<()> {
        let url = self
            .transport
            .resolve_file(attachment.file_id)
            .await
            .with_context(|| format!("Failed to resolve {} URL", attachment.kind))?;

        let destination = self.config.notes.directory.join(local_name);
        let bytes = self
            .fetcher
            .fetch(&url, &destination)
            .await
            .with_context(|| format!("Failed to download {}", attachment.kind))?;

        info!(
            "Saved {} ({} bytes): {}",
            attachment.kind,
            bytes,
            destination.display()
        );
        Ok(())
    }
}

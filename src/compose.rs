use std::path::Path;

use chrono::{DateTime, Utc};

use crate::platform::IncomingMessage;

/// A document that made it to disk
#[derive(Debug, Clone, PartialEq)]
pub struct SavedDocument {
    /// Name shown in the link text
    pub display_name: String,
    /// File name inside the notes directory
    pub local_name: String,
}

/// Attachments fetched for one note. `None` means absent or failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchedAttachments {
    pub document: Option<SavedDocument>,
    /// File name of the saved photo inside the notes directory
    pub photo: Option<String>,
}

/// Render the markdown body of a note.
pub fn compose(message: &IncomingMessage, attachments: &FetchedAttachments) -> String {
    let sender_name = message
        .sender
        .as_ref()
        .map(|s| s.display_name())
        .unwrap_or("unknown");
    let text = message.text.as_deref().unwrap_or_default();

    let mut content = format!("# Message from {}\n\n{}\n\n", sender_name, text);

    if let Some(doc) = &attachments.document {
        content.push_str(&format!(
            "[📎 Attachment: {}]({})\n",
            doc.display_name, doc.local_name
        ));
    }
    if let Some(photo) = &attachments.photo {
        content.push_str(&format!("[🖼 Photo: ![]({})]\n", photo));
    }

    content
}

/// `{update_id}_{unix_seconds}.md`
pub fn note_file_name(update_id: u32, saved_at: DateTime<Utc>) -> String {
    format!("{}_{}.md", update_id, saved_at.timestamp())
}

/// `photo_{unix_seconds}.jpg`
pub fn photo_file_name(saved_at: DateTime<Utc>) -> String {
    format!("photo_{}.jpg", saved_at.timestamp())
}

/// Local name for a document: its own name, reduced to the last path
/// component. Falls back to `document_{unix_seconds}`.
pub fn document_file_name(display_name: Option<&str>, saved_at: DateTime<Utc>) -> String {
    display_name
        .and_then(|name| Path::new(name).file_name())
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| format!("document_{}", saved_at.timestamp()))
}

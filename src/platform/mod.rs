pub mod telegram;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// One inbound event delivered by a transport
#[derive(Debug, Clone)]
pub struct Update {
    /// Platform sequence identifier, unique per update
    pub id: u32,
    /// None for update kinds that carry no message (edits, callbacks, ...)
    pub message: Option<IncomingMessage>,
}

/// A message received from any platform
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub date: DateTime<Utc>,
    pub sender: Option<Sender>,
    pub text: Option<String>,
    pub document: Option<DocumentRef>,
    /// Photo variants in ascending resolution
    pub photos: Vec<PhotoVariant>,
}

/// Author of a message
#[derive(Debug, Clone, PartialEq)]
pub struct Sender {
    pub id: u64,
    pub username: Option<String>,
    pub first_name: String,
}

impl Sender {
    /// Username when the user has one, otherwise the first name
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.first_name)
    }
}

/// A document attached to a message
#[derive(Debug, Clone)]
pub struct DocumentRef {
    pub file_id: String,
    pub file_name: Option<String>,
}

/// One resolution of an attached photo
#[derive(Debug, Clone)]
pub struct PhotoVariant {
    pub file_id: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Document,
    Photo,
}

impl std::fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttachmentKind::Document => write!(f, "document"),
            AttachmentKind::Photo => write!(f, "photo"),
        }
    }
}

/// Platform-hosted binary content, resolved to a URL only when fetched
#[derive(Debug, Clone, Copy)]
pub struct AttachmentRef<'a> {
    pub kind: AttachmentKind,
    pub display_name: Option<&'a str>,
    pub file_id: &'a str,
}

impl DocumentRef {
    pub fn attachment(&self) -> AttachmentRef<'_> {
        AttachmentRef {
            kind: AttachmentKind::Document,
            display_name: self.file_name.as_deref(),
            file_id: &self.file_id,
        }
    }
}

impl PhotoVariant {
    pub fn attachment(&self) -> AttachmentRef<'_> {
        AttachmentRef {
            kind: AttachmentKind::Photo,
            display_name: None,
            file_id: &self.file_id,
        }
    }
}

/// Source of updates plus the file-hosting side of a chat platform.
#[async_trait]
pub trait Transport: Send {
    /// Wait for the next update. Updates come back in arrival order; `None`
    /// means the stream is closed for good.
    async fn next_update(&mut self) -> Option<Update>;

    /// Turn an opaque file id into a URL the file can be downloaded from.
    async fn resolve_file(&self, file_id: &str) -> Result<String>;
}

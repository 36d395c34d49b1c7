use std::collections::VecDeque;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use teloxide::payloads::GetUpdatesSetters;
use teloxide::prelude::*;
use teloxide::types::{AllowedUpdate, FileId, UpdateKind};
use tracing::{debug, info, warn};

use crate::config::TelegramConfig;
use crate::platform::{DocumentRef, IncomingMessage, PhotoVariant, Sender, Transport, Update};

/// Pause between long-poll attempts after a failed one
const RETRY_DELAY: Duration = Duration::from_secs(3);

/// Long-polling Telegram transport
pub struct TelegramTransport {
    bot: Bot,
    poll_timeout: u32,
    offset: i32,
    pending: VecDeque<Update>,
}

impl TelegramTransport {
    /// Build the bot client and make sure the token is accepted.
    pub async fn connect(config: &TelegramConfig) -> Result<Self> {
        // The HTTP timeout has to outlive the long-poll timeout
        let client = teloxide::net::default_reqwest_settings()
            .timeout(Duration::from_secs(u64::from(config.poll_timeout_secs) + 10))
            .build()
            .context("Failed to build Telegram HTTP client")?;
        let bot = Bot::with_client(&config.bot_token, client);

        let me = bot
            .get_me()
            .await
            .context("Failed to reach the Telegram Bot API")?;
        info!(
            "Connected to Telegram as @{} ({})",
            me.user.username.as_deref().unwrap_or_default(),
            me.user.id.0
        );

        Ok(Self {
            bot,
            poll_timeout: config.poll_timeout_secs,
            offset: 0,
            pending: VecDeque::new(),
        })
    }

    async fn poll(&mut self) -> Result<()> {
        let updates = self
            .bot
            .get_updates()
            .offset(self.offset)
            .timeout(self.poll_timeout)
            .allowed_updates(vec![AllowedUpdate::Message])
            .await?;

        if !updates.is_empty() {
            debug!("Received {} update(s)", updates.len());
        }

        for update in updates {
            self.offset = update.id.0 as i32 + 1;
            self.pending.push_back(convert_update(update));
        }
        Ok(())
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn next_update(&mut self) -> Option<Update> {
        loop {
            if let Some(update) = self.pending.pop_front() {
                return Some(update);
            }
            if let Err(e) = self.poll().await {
                warn!(
                    "Failed to get updates, retrying in {}s: {:#}",
                    RETRY_DELAY.as_secs(),
                    e
                );
                tokio::time::sleep(RETRY_DELAY).await;
            }
        }
    }

    async fn resolve_file(&self, file_id: &str) -> Result<String> {
        let file = self
            .bot
            .get_file(FileId(file_id.to_string()))
            .await
            .with_context(|| format!("Failed to look up file {}", file_id))?;

        // api_url already ends with a slash
        Ok(format!(
            "{}file/bot{}/{}",
            self.bot.api_url(),
            self.bot.token(),
            file.path
        ))
    }
}

fn convert_update(update: teloxide::types::Update) -> Update {
    let message = match &update.kind {
        UpdateKind::Message(msg) => Some(convert_message(msg)),
        _ => None,
    };
    Update {
        id: update.id.0,
        message,
    }
}

fn convert_message(msg: &Message) -> IncomingMessage {
    let sender = msg.from.as_ref().map(|user| Sender {
        id: user.id.0,
        username: user.username.clone(),
        first_name: user.first_name.clone(),
    });

    // Captioned media have no text of their own
    let text = msg.text().or_else(|| msg.caption()).map(str::to_string);

    let document = msg.document().map(|doc| DocumentRef {
        file_id: doc.file.id.0.clone(),
        file_name: doc.file_name.clone(),
    });

    let photos = msg
        .photo()
        .map(|sizes| {
            sizes
                .iter()
                .map(|size| PhotoVariant {
                    file_id: size.file.id.0.clone(),
                    width: size.width,
                    height: size.height,
                })
                .collect()
        })
        .unwrap_or_default();

    IncomingMessage {
        date: msg.date,
        sender,
        text,
        document,
        photos,
    }
}

use std::time::Duration;

use teloxide::{prelude::*, types::ParseMode};
use url::Url;

use crate::{config::TelegramConfig, ArticleRecord};

pub enum Sender {
    Console(ConsoleSender),
    Telegram(TelegramSender),
}

/// Destination for notification texts. Delivery is best effort: failures are
/// logged by the implementation and never reach the caller.
pub trait Notify {
    async fn send_message(&self, text: &str);
}

impl Notify for Sender {
    async fn send_message(&self, text: &str) {
        match self {
            Sender::Console(sender) => sender.send_message(text).await,
            Sender::Telegram(sender) => sender.send_message(text).await,
        }
    }
}

pub struct ConsoleSender {}

pub struct TelegramSender {
    bot: Bot,
    chat_ids: Vec<String>,
    delay: Duration,
}

impl TelegramSender {
    #[must_use]
    pub fn new(token: &str, config: &TelegramConfig) -> Self {
        Self {
            bot: Bot::new(token),
            chat_ids: config.chat_ids.clone(),
            delay: Duration::from_secs(config.delay_seconds),
        }
    }

    /// Talk to another Bot API host, e.g. a mock server
    #[must_use]
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn with_api_url(mut self, api_url: Url) -> Self {
        self.bot = self.bot.set_api_url(api_url);
        self
    }

    /// Check the token with the Bot API and return the bot's user name
    pub async fn authorize(&self) -> Result<String, teloxide::RequestError> {
        let me = self.bot.get_me().send().await?;
        Ok(me.user.username.clone().unwrap_or_default())
    }
}

impl Notify for ConsoleSender {
    async fn send_message(&self, text: &str) {
        println!("{text}\n");
    }
}

impl Notify for TelegramSender {
    async fn send_message(&self, text: &str) {
        for chat_id in &self.chat_ids {
            let id: i64 = match chat_id.parse() {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!(chat_id = %chat_id, error = %e, "invalid chat id");
                    continue;
                }
            };

            if let Err(e) = self
                .bot
                .send_message(ChatId(id), text)
                .parse_mode(ParseMode::Html)
                .send()
                .await
            {
                tracing::warn!(chat_id = id, error = %e, "could not send message");
            }

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }
    }
}

/// Render one article as an HTML chat message
#[must_use]
pub fn format_article(record: &ArticleRecord) -> String {
    format!(
        "{published}\n{title}\n\n{description}\n\n<a href=\"{link}\">Article link</a>",
        published = record.published_at,
        title = record.title,
        description = record.description,
        link = record.link,
    )
}

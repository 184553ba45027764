use std::time::Duration;

use anyhow::{Context, Result, bail};
use log::debug;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::models::{ApiResponse, GetUpdates, ReplyParameters, ReplyTarget, SendMessage, Update};
use super::throttle::Throttle;
use crate::config::settings::TelegramSettings;

/// Headroom on top of the long-poll timeout before the HTTP request gives up
const HTTP_TIMEOUT_MARGIN_SECS: u64 = 10;

/// Telegram Bot API client
pub struct TelegramClient {
    client: Client,
    base_url: String,
    token: String,
    poll_timeout_secs: u64,
    throttle: Throttle,
}

impl TelegramClient {
    pub fn new(settings: &TelegramSettings) -> Result<Self> {
        let token = settings.require_token()?.to_string();
        let client = Self::build_client(
            settings.user_agent,
            settings.poll_timeout_secs + HTTP_TIMEOUT_MARGIN_SECS,
        )?;

        Ok(Self {
            client,
            base_url: settings.api_base_url.clone(),
            token,
            poll_timeout_secs: settings.poll_timeout_secs,
            throttle: Throttle::new(settings.send_interval_ms),
        })
    }

    /// Long-poll for message updates newer than `offset`
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        let body = GetUpdates {
            offset,
            timeout: self.poll_timeout_secs,
            allowed_updates: vec!["message"],
        };
        self.call("getUpdates", &body).await
    }

    /// Reply to a message, inside its topic when it has one
    pub async fn send_reply(&mut self, target: ReplyTarget, text: &str) -> Result<()> {
        self.throttle.wait().await;

        let body = SendMessage {
            chat_id: target.chat_id,
            text,
            message_thread_id: target.thread_id,
            reply_parameters: Some(ReplyParameters {
                message_id: target.message_id,
                allow_sending_without_reply: true,
            }),
        };
        let _: serde_json::Value = self.call("sendMessage", &body).await?;
        debug!("Replied to message {} in chat {}", target.message_id, target.chat_id);
        Ok(())
    }

    fn build_client(user_agent: &str, timeout_secs: u64) -> Result<Client> {
        Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| e.without_url())
            .with_context(|| format!("Failed to send {method} request"))?;

        let status = response.status();
        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| e.without_url())
            .with_context(|| format!("Failed to parse {method} response (HTTP {status})"))?;

        unwrap_envelope(method, envelope)
    }
}

fn unwrap_envelope<T>(method: &str, envelope: ApiResponse<T>) -> Result<T> {
    if !envelope.ok {
        bail!(
            "{method} rejected: {}",
            envelope.description.unwrap_or_else(|| "no description".to_string())
        );
    }
    envelope
        .result
        .with_context(|| format!("{method} returned no result"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> TelegramSettings {
        TelegramSettings {
            token: Some("123:abc".to_string()),
            ..TelegramSettings::default()
        }
    }

    #[test]
    fn test_method_url_embeds_token() {
        let client = TelegramClient::new(&settings()).unwrap();

        assert_eq!(
            client.method_url("getUpdates"),
            "https://api.telegram.org/bot123:abc/getUpdates"
        );
    }

    #[test]
    fn test_client_requires_token() {
        assert!(TelegramClient::new(&TelegramSettings::default()).is_err());
    }

    #[test]
    fn test_rejected_call_reports_description() {
        let envelope: ApiResponse<Vec<Update>> = serde_json::from_str(
            r#"{"ok": false, "error_code": 401, "description": "Unauthorized"}"#,
        )
        .unwrap();

        let err = unwrap_envelope("getUpdates", envelope).unwrap_err();

        assert_eq!(err.to_string(), "getUpdates rejected: Unauthorized");
    }
}

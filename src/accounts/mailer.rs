use std::time::Duration;

use anyhow::Context;
use axum::async_trait;
use serde_json::json;
use tracing::{debug, info};

use crate::config::MailConfig;

#[derive(Debug, Clone)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Returns once the provider has accepted the message.
    async fn send(&self, mail: &OutgoingMail) -> anyhow::Result<()>;
}

/// SendGrid v3 transactional mail over HTTPS.
#[derive(Clone)]
pub struct SendGridMailer {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    from: String,
}

impl SendGridMailer {
    pub fn new(cfg: &MailConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("build mail http client")?;
        Ok(Self {
            client,
            api_base: cfg.api_base.trim_end_matches('/').to_string(),
            api_key: cfg.keys.send_mail.sendgrid_api_key.clone(),
            from: cfg.keys.sender.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send(&self, mail: &OutgoingMail) -> anyhow::Result<()> {
        let payload = json!({
            "personalizations": [{ "to": [{ "email": mail.to }] }],
            "from": { "email": self.from },
            "subject": mail.subject,
            "content": [{ "type": "text/plain", "value": mail.body }],
        });

        debug!(to = %mail.to, "sending mail");
        let res = self
            .client
            .post(format!("{}/v3/mail/send", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .context("sendgrid request")?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            anyhow::bail!("sendgrid returned {status}: {text}");
        }
        info!(to = %mail.to, %status, "mail accepted");
        Ok(())
    }
}

//! Admin password notifications over the SendGrid v3 HTTP API

use serde_json::json;
use thiserror::Error;

use crate::config::EmailConfig;

const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";
const SEND_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("email transport not configured")]
    NotConfigured,

    #[error("no recipient addresses configured")]
    NoRecipients,

    #[error("email request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("email rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Optional SendGrid client; without configuration every send is refused
#[derive(Clone)]
pub struct Mailer {
    http: reqwest::Client,
    config: Option<EmailConfig>,
}

impl Mailer {
    pub fn new(config: Option<EmailConfig>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    pub fn recipient_count(&self) -> usize {
        self.config.as_ref().map_or(0, |c| c.recipients.len())
    }

    /// Send a plain-text message to every configured recipient.
    ///
    /// Returns the number of recipients.
    pub async fn send_to_admins(&self, subject: &str, text: &str) -> Result<usize, EmailError> {
        let config = self.config.as_ref().ok_or(EmailError::NotConfigured)?;
        if config.recipients.is_empty() {
            return Err(EmailError::NoRecipients);
        }

        let to: Vec<_> = config
            .recipients
            .iter()
            .map(|email| json!({ "email": email }))
            .collect();
        let body = json!({
            "personalizations": [{ "to": to }],
            "from": { "email": config.from },
            "subject": subject,
            "content": [{ "type": "text/plain", "value": text }],
        });

        let resp = self
            .http
            .post(SENDGRID_SEND_URL)
            .bearer_auth(&config.api_key)
            .timeout(SEND_TIMEOUT)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(EmailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(recipients = config.recipients.len(), "Admin email sent");
        Ok(config.recipients.len())
    }
}

fn generated_at(now_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(now_ms)
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_default()
}

pub const RESET_SUBJECT: &str = "Nueva Contraseña de Administrador - Tuz Díaz Dulzes";
pub const ROTATE_SUBJECT: &str = "Nueva contraseña de administrador - Tuz Díaz Dulzes";

pub fn reset_password_text(password: &str, now_ms: i64) -> String {
    format!(
        "Nueva Contraseña de Administrador - Tuz Díaz Dulzes\n\n\
         Se ha generado una nueva contraseña:\n\n\
         {password}\n\n\
         IMPORTANTE:\n\
         - Guarda esta contraseña en un lugar seguro\n\
         - No compartas este email con nadie\n\
         - Considera cambiarla después de iniciar sesión\n\n\
         Fecha: {}\n\n\
         Si no solicitaste este cambio, contacta al equipo de soporte.\n",
        generated_at(now_ms)
    )
}

pub fn rotate_password_text(password: &str, now_ms: i64) -> String {
    format!(
        "Se ha rotado la contraseña de administrador.\n\
         Nueva contraseña: {password}\n\n\
         Fecha: {}\n\
         Si no reconoces esta acción, rota la contraseña nuevamente y contacta al soporte.\n",
        generated_at(now_ms)
    )
}

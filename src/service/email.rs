use lettre::{
    transport::smtp::authentication::Credentials, AsyncSmtpTransport, Tokio1Executor,
};
use std::time::Duration;
use thiserror::Error;

use crate::config::Settings;

const SMTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum MailError {
    #[error("smtp server {0} did not accept the connection")]
    Rejected(String),

    #[error("smtp transport failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailSecurity {
    /// TLS from the first byte (SMTPS).
    Tls,
    StartTls,
    Plain,
}

impl MailSecurity {
    /// SSL wins when both flags are set.
    pub fn from_settings(settings: &Settings) -> Self {
        if settings.mail_use_ssl {
            MailSecurity::Tls
        } else if settings.mail_use_tls {
            MailSecurity::StartTls
        } else {
            MailSecurity::Plain
        }
    }
}

pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    endpoint: String,
    security: MailSecurity,
}

impl Mailer {
    pub fn new(settings: &Settings) -> Result<Self, MailError> {
        let host = settings.mail_server_host.as_str();
        let security = MailSecurity::from_settings(settings);

        let mut builder = match security {
            MailSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(host)?,
            MailSecurity::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?,
            MailSecurity::Plain => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host),
        }
        .port(settings.mail_server_port)
        .timeout(Some(SMTP_TIMEOUT));

        if !settings.mail_username.is_empty() {
            builder = builder.credentials(Credentials::new(
                settings.mail_username.clone(),
                settings.mail_password.clone(),
            ));
        }

        tracing::debug!(
            host,
            port = settings.mail_server_port,
            ?security,
            "mail: transport configured"
        );

        Ok(Self {
            transport: builder.build(),
            endpoint: format!("{}:{}", host, settings.mail_server_port),
            security,
        })
    }

    pub fn security(&self) -> MailSecurity {
        self.security
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Opens a connection and greets the server without sending mail.
    pub async fn check_connection(&self) -> Result<(), MailError> {
        if self.transport.test_connection().await? {
            Ok(())
        } else {
            Err(MailError::Rejected(self.endpoint.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn settings(tls: bool, ssl: bool) -> Settings {
        let mut settings = Settings::defaults(Path::new("/srv/avk"));
        settings.mail_use_tls = tls;
        settings.mail_use_ssl = ssl;
        settings
    }

    #[test]
    fn ssl_takes_precedence_over_tls() {
        assert_eq!(MailSecurity::from_settings(&settings(true, true)), MailSecurity::Tls);
        assert_eq!(MailSecurity::from_settings(&settings(false, true)), MailSecurity::Tls);
        assert_eq!(
            MailSecurity::from_settings(&settings(true, false)),
            MailSecurity::StartTls
        );
        assert_eq!(
            MailSecurity::from_settings(&settings(false, false)),
            MailSecurity::Plain
        );
    }

    #[test]
    fn defaults_resolve_to_starttls() {
        let settings = Settings::defaults(Path::new("/srv/avk"));
        assert_eq!(MailSecurity::from_settings(&settings), MailSecurity::StartTls);
    }

    #[test]
    fn plain_transport_builds_without_network() {
        let mut settings = settings(false, false);
        settings.mail_server_host = "localhost".to_string();
        settings.mail_server_port = 1025;
        let mailer = Mailer::new(&settings).unwrap();
        assert_eq!(mailer.security(), MailSecurity::Plain);
        assert_eq!(mailer.endpoint(), "localhost:1025");
    }

    #[tokio::test]
    async fn unreachable_server_fails_the_check() {
        let mut settings = settings(false, false);
        settings.mail_server_host = "127.0.0.1".to_string();
        settings.mail_server_port = 1;
        let mailer = Mailer::new(&settings).unwrap();
        assert!(mailer.check_connection().await.is_err());
    }
}

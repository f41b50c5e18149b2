use std::{
    fmt,
    path::{Path, PathBuf},
};

pub const ENV_SECRET_KEY: &str = "SECRET_KEY";
pub const ENV_MYSQL_HOST: &str = "MYSQL_HOST";
pub const ENV_MYSQL_USER: &str = "MYSQL_USER";
pub const ENV_MYSQL_PASSWORD: &str = "MYSQL_PASSWORD";
pub const ENV_MYSQL_DB: &str = "MYSQL_DB";
pub const ENV_MAX_CONTENT_LENGTH: &str = "MAX_CONTENT_LENGTH";
pub const ENV_MAIL_SERVER: &str = "MAIL_SERVER";
pub const ENV_MAIL_PORT: &str = "MAIL_PORT";
pub const ENV_MAIL_USE_TLS: &str = "MAIL_USE_TLS";
pub const ENV_MAIL_USE_SSL: &str = "MAIL_USE_SSL";
pub const ENV_MAIL_USERNAME: &str = "MAIL_USERNAME";
pub const ENV_MAIL_PASSWORD: &str = "MAIL_PASSWORD";
pub const ENV_PORT: &str = "PORT";

/// Placeholder signing key. The loader warns when it is still in use.
pub const DEFAULT_SECRET_KEY: &str = "your-secret-key-here";
pub const DEFAULT_MYSQL_HOST: &str = "localhost";
pub const DEFAULT_MYSQL_USER: &str = "root";
/// Credentials never ship with a usable default.
pub const DEFAULT_MYSQL_PASSWORD: &str = "";
pub const DEFAULT_MYSQL_DB: &str = "avk_events";
pub const DEFAULT_MAX_CONTENT_LENGTH: u64 = 50 * 1024 * 1024;
pub const DEFAULT_MAIL_SERVER: &str = "smtp.gmail.com";
pub const DEFAULT_MAIL_PORT: u16 = 587;
pub const DEFAULT_MAIL_USE_TLS: bool = true;
pub const DEFAULT_MAIL_USE_SSL: bool = false;
/// Credentials never ship with a usable default.
pub const DEFAULT_MAIL_USERNAME: &str = "";
/// Credentials never ship with a usable default.
pub const DEFAULT_MAIL_PASSWORD: &str = "";
pub const DEFAULT_PORT: u16 = 5000;

pub const UPLOADS_DIR_NAME: &str = "uploads";

/// Directory the upload folder hangs off when no other base is supplied.
pub fn default_base_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Immutable application settings, built once at startup and shared by `Arc`.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub secret_key: String,

    pub database_host: String,
    pub database_user: String,
    pub database_password: String,
    pub database_name: String,

    pub upload_directory: PathBuf,
    pub max_upload_bytes: u64,

    pub mail_server_host: String,
    pub mail_server_port: u16,
    pub mail_use_tls: bool,
    pub mail_use_ssl: bool,
    pub mail_username: String,
    pub mail_password: String,

    pub server_port: u16,
}

impl Settings {
    /// Settings with every field at its default, uploads under `base_dir`.
    pub fn defaults(base_dir: &Path) -> Self {
        Self {
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            database_host: DEFAULT_MYSQL_HOST.to_string(),
            database_user: DEFAULT_MYSQL_USER.to_string(),
            database_password: DEFAULT_MYSQL_PASSWORD.to_string(),
            database_name: DEFAULT_MYSQL_DB.to_string(),
            upload_directory: upload_directory(base_dir),
            max_upload_bytes: DEFAULT_MAX_CONTENT_LENGTH,
            mail_server_host: DEFAULT_MAIL_SERVER.to_string(),
            mail_server_port: DEFAULT_MAIL_PORT,
            mail_use_tls: DEFAULT_MAIL_USE_TLS,
            mail_use_ssl: DEFAULT_MAIL_USE_SSL,
            mail_username: DEFAULT_MAIL_USERNAME.to_string(),
            mail_password: DEFAULT_MAIL_PASSWORD.to_string(),
            server_port: DEFAULT_PORT,
        }
    }

    pub fn secret_key_bytes(&self) -> &[u8] {
        self.secret_key.as_bytes()
    }

    pub fn uses_placeholder_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }

    pub fn server_addr(&self) -> String {
        format!("0.0.0.0:{}", self.server_port)
    }
}

pub fn upload_directory(base_dir: &Path) -> PathBuf {
    base_dir.join(UPLOADS_DIR_NAME)
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() {
        "[EMPTY]"
    } else {
        "[REDACTED]"
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("secret_key", &redact(&self.secret_key))
            .field("database_host", &self.database_host)
            .field("database_user", &self.database_user)
            .field("database_password", &redact(&self.database_password))
            .field("database_name", &self.database_name)
            .field("upload_directory", &self.upload_directory)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("mail_server_host", &self.mail_server_host)
            .field("mail_server_port", &self.mail_server_port)
            .field("mail_use_tls", &self.mail_use_tls)
            .field("mail_use_ssl", &self.mail_use_ssl)
            .field("mail_username", &self.mail_username)
            .field("mail_password", &redact(&self.mail_password))
            .field("server_port", &self.server_port)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_secrets() {
        let mut settings = Settings::defaults(Path::new("/srv/avk"));
        settings.secret_key = "signing-key-1234".to_string();
        settings.database_password = "db-pass-5678".to_string();
        settings.mail_password = "smtp-pass-9012".to_string();

        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("signing-key-1234"));
        assert!(!rendered.contains("db-pass-5678"));
        assert!(!rendered.contains("smtp-pass-9012"));
        assert!(rendered.contains("[REDACTED]"));
        assert!(rendered.contains("localhost"));
    }

    #[test]
    fn upload_directory_hangs_off_base_dir() {
        let settings = Settings::defaults(Path::new("/srv/avk"));
        assert_eq!(settings.upload_directory, PathBuf::from("/srv/avk/uploads"));
    }

    #[test]
    fn placeholder_secret_is_detected() {
        let mut settings = Settings::defaults(Path::new("/srv/avk"));
        assert!(settings.uses_placeholder_secret());
        settings.secret_key = "rotated".to_string();
        assert!(!settings.uses_placeholder_secret());
        assert_eq!(settings.secret_key_bytes(), b"rotated");
    }
}

use std::{
    env::{self, VarError},
    path::Path,
    str::FromStr,
    sync::Arc,
};

use crate::{
    config::{self, Settings},
    error::ConfigError,
};

const TRUTHY: [&str; 3] = ["true", "1", "yes"];

pub trait ConfigService: Send + Sync {
    fn values(&self) -> &Settings;
}

pub struct ConfigServiceImpl {
    settings: Arc<Settings>,
}

impl ConfigServiceImpl {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }
}

impl ConfigService for ConfigServiceImpl {
    fn values(&self) -> &Settings {
        &self.settings
    }
}

/// Case-insensitive membership in `{"true", "1", "yes"}`; anything else is `false`.
pub fn parse_flag(value: &str) -> bool {
    let lowered = value.to_lowercase();
    TRUTHY.contains(&lowered.as_str())
}

/// Reads `Settings` from the process environment, uploads under the crate directory.
pub fn load() -> Result<Settings, ConfigError> {
    load_from(&config::default_base_dir(), read_env)
}

// Non-UTF-8 values are kept (lossily) so integer keys still fail to parse.
fn read_env(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) => Some(value),
        Err(VarError::NotUnicode(raw)) => Some(raw.to_string_lossy().into_owned()),
        Err(VarError::NotPresent) => None,
    }
}

/// Reads `Settings` through `lookup`, which returns the raw value for a key if it is set.
pub fn load_from<F>(base_dir: &Path, lookup: F) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let env = EnvReader { lookup };
    let defaults = Settings::defaults(base_dir);

    let settings = Settings {
        secret_key: env.string(config::ENV_SECRET_KEY, defaults.secret_key),
        database_host: env.string(config::ENV_MYSQL_HOST, defaults.database_host),
        database_user: env.string(config::ENV_MYSQL_USER, defaults.database_user),
        database_password: env.string(config::ENV_MYSQL_PASSWORD, defaults.database_password),
        database_name: env.string(config::ENV_MYSQL_DB, defaults.database_name),
        upload_directory: defaults.upload_directory,
        max_upload_bytes: env
            .integer(config::ENV_MAX_CONTENT_LENGTH, defaults.max_upload_bytes)?,
        mail_server_host: env.string(config::ENV_MAIL_SERVER, defaults.mail_server_host),
        mail_server_port: env.integer(config::ENV_MAIL_PORT, defaults.mail_server_port)?,
        mail_use_tls: env.flag(config::ENV_MAIL_USE_TLS, defaults.mail_use_tls),
        mail_use_ssl: env.flag(config::ENV_MAIL_USE_SSL, defaults.mail_use_ssl),
        mail_username: env.string(config::ENV_MAIL_USERNAME, defaults.mail_username),
        mail_password: env.string(config::ENV_MAIL_PASSWORD, defaults.mail_password),
        server_port: env.integer(config::ENV_PORT, defaults.server_port)?,
    };

    report(&settings);
    Ok(settings)
}

struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn nonempty(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|value| !value.is_empty())
    }

    fn string(&self, key: &str, default: String) -> String {
        self.nonempty(key).unwrap_or(default)
    }

    fn integer<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr<Err = std::num::ParseIntError>,
    {
        let Some(raw) = self.nonempty(key) else {
            return Ok(default);
        };
        raw.trim()
            .parse::<T>()
            .map_err(|source| ConfigError::InvalidInteger {
                key,
                value: raw.clone(),
                source,
            })
    }

    // A present but empty flag is still parsed, so it reads as `false`.
    fn flag(&self, key: &str, default: bool) -> bool {
        (self.lookup)(key)
            .map(|value| parse_flag(&value))
            .unwrap_or(default)
    }
}

fn report(settings: &Settings) {
    tracing::info!(
        database_host = %settings.database_host,
        database_user = %settings.database_user,
        database_name = %settings.database_name,
        upload_directory = %settings.upload_directory.display(),
        max_upload_bytes = settings.max_upload_bytes,
        mail_server_host = %settings.mail_server_host,
        mail_server_port = settings.mail_server_port,
        mail_use_tls = settings.mail_use_tls,
        mail_use_ssl = settings.mail_use_ssl,
        server_port = settings.server_port,
        "settings loaded"
    );

    if settings.uses_placeholder_secret() {
        tracing::warn!(
            "{} is not set, using the placeholder signing key",
            config::ENV_SECRET_KEY
        );
    }
    if settings.database_password.is_empty() {
        tracing::warn!(
            "{} is not set, connecting without a password",
            config::ENV_MYSQL_PASSWORD
        );
    }
    if !settings.mail_username.is_empty() && settings.mail_password.is_empty() {
        tracing::warn!(
            "{} is set but {} is not, SMTP login will fail",
            config::ENV_MAIL_USERNAME,
            config::ENV_MAIL_PASSWORD
        );
    }
}

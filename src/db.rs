use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tokio::net::lookup_host;

use crate::config::Settings;

const DEFAULT_MYSQL_PORT: u16 = 3306;

fn build_url(settings: &Settings, password: &str) -> String {
    let user = urlencoding::encode(&settings.database_user);
    let name = urlencoding::encode(&settings.database_name);
    if password.is_empty() {
        format!("mysql://{}@{}/{}", user, settings.database_host, name)
    } else {
        format!("mysql://{}:{}@{}/{}", user, password, settings.database_host, name)
    }
}

/// Connection URL with user, password and database name percent-encoded.
pub fn database_url(settings: &Settings) -> String {
    build_url(settings, &urlencoding::encode(&settings.database_password))
}

/// Same as [`database_url`] with the password masked, safe to log.
pub fn redacted_database_url(settings: &Settings) -> String {
    if settings.database_password.is_empty() {
        build_url(settings, "")
    } else {
        build_url(settings, "***")
    }
}

fn host_port(host: &str) -> (String, u16) {
    match host.rsplit_once(':') {
        Some((name, port)) => match port.parse::<u16>() {
            Ok(port) => (name.to_string(), port),
            Err(_) => (host.to_string(), DEFAULT_MYSQL_PORT),
        },
        None => (host.to_string(), DEFAULT_MYSQL_PORT),
    }
}

pub async fn connect(settings: &Settings) -> Result<DatabaseConnection, DbErr> {
    tracing::info!(url = %redacted_database_url(settings), "db: connecting");

    let (host, port) = host_port(&settings.database_host);
    match lookup_host((host.as_str(), port)).await {
        Ok(addrs) => {
            let list: Vec<String> = addrs.map(|addr| addr.to_string()).collect();
            tracing::debug!("db: lookup_host {}:{} => {:?}", host, port, list);
        }
        Err(err) => {
            tracing::warn!("db: lookup_host {}:{} failed: {}", host, port, err);
        }
    }

    let mut options = ConnectOptions::new(database_url(settings));
    options
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    Database::connect(options).await
}

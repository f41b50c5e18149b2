use std::sync::Arc;

use sea_orm::DatabaseConnection;

use avk_events_config::{
    service::{email::MailSecurity, uploads::UploadError},
    state::{AppState, SeaOrmDatabaseClient},
    Settings,
};

fn state_in(base: &std::path::Path, limit: u64) -> Arc<AppState> {
    let mut settings = Settings::defaults(base);
    settings.max_upload_bytes = limit;
    settings.mail_server_host = "localhost".to_string();
    settings.mail_use_tls = false;
    let db = Arc::new(SeaOrmDatabaseClient::from_connection(
        DatabaseConnection::Disconnected,
    ));
    AppState::with_database(settings, db).expect("state builds")
}

#[tokio::test]
async fn saves_uploads_under_settings_directory() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let state = state_in(tmp.path(), 64);
    let uploads = state.uploads();

    uploads.ensure_dir().await?;
    assert!(tmp.path().join("uploads").is_dir());

    let path = uploads.save("/marriage/photos/stage.jpg", b"jpeg-bytes").await?;
    assert_eq!(path, tmp.path().join("uploads/marriage/photos/stage.jpg"));
    assert_eq!(tokio::fs::read(&path).await?, b"jpeg-bytes");
    Ok(())
}

#[tokio::test]
async fn oversized_upload_is_not_written() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let state = state_in(tmp.path(), 4);

    let err = state.uploads().save("big.bin", b"12345").await.unwrap_err();
    assert!(matches!(err, UploadError::TooLarge { size: 5, limit: 4 }));
    assert!(!tmp.path().join("uploads/big.bin").exists());
    Ok(())
}

#[tokio::test]
async fn escaping_name_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let state = state_in(tmp.path(), 64);

    let err = state.uploads().save("../outside.txt", b"x").await.unwrap_err();
    assert!(matches!(err, UploadError::InvalidName(_)));
    assert!(!tmp.path().join("outside.txt").exists());
    Ok(())
}

#[test]
fn state_wires_collaborators_from_one_settings_value() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let state = state_in(tmp.path(), 64);

    assert_eq!(state.settings().max_upload_bytes, 64);
    assert_eq!(state.uploads().max_bytes(), 64);
    assert_eq!(state.uploads().root(), tmp.path().join("uploads"));
    assert_eq!(state.mailer().security(), MailSecurity::Plain);
    assert_eq!(state.config().values().max_upload_bytes, 64);
    assert!(matches!(state.db().conn(), DatabaseConnection::Disconnected));
}

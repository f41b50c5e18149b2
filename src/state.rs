use sea_orm::{DatabaseConnection, DbErr};
use std::sync::Arc;

use crate::{
    config::Settings,
    error::AppResult,
    service::{
        config::{ConfigService, ConfigServiceImpl},
        email::Mailer,
        uploads::UploadStore,
    },
};

pub trait DatabaseClient: Send + Sync {
    fn conn(&self) -> &DatabaseConnection;
}

pub struct SeaOrmDatabaseClient {
    conn: DatabaseConnection,
}

impl SeaOrmDatabaseClient {
    pub async fn new(settings: &Settings) -> Result<Self, DbErr> {
        let conn = crate::db::connect(settings).await?;
        Ok(Self { conn })
    }

    pub fn from_connection(conn: DatabaseConnection) -> Self {
        Self { conn }
    }
}

impl DatabaseClient for SeaOrmDatabaseClient {
    fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }
}

pub struct AppState {
    config: Arc<dyn ConfigService>,
    db: Arc<dyn DatabaseClient>,
    mailer: Arc<Mailer>,
    uploads: UploadStore,
}

impl AppState {
    /// Connects every collaborator from one loaded `Settings`.
    pub async fn new(settings: Settings) -> AppResult<Arc<Self>> {
        let db = Arc::new(SeaOrmDatabaseClient::new(&settings).await?);
        Self::with_database(settings, db)
    }

    pub fn with_database(settings: Settings, db: Arc<dyn DatabaseClient>) -> AppResult<Arc<Self>> {
        let mailer = Arc::new(Mailer::new(&settings)?);
        let uploads = UploadStore::new(&settings);
        let config = Arc::new(ConfigServiceImpl::new(settings));

        Ok(Arc::new(Self {
            config,
            db,
            mailer,
            uploads,
        }))
    }

    pub fn config(&self) -> &dyn ConfigService {
        self.config.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        self.config.values()
    }

    pub fn db(&self) -> &dyn DatabaseClient {
        self.db.as_ref()
    }

    pub fn mailer(&self) -> &Mailer {
        self.mailer.as_ref()
    }

    pub fn uploads(&self) -> &UploadStore {
        &self.uploads
    }
}

//! tests/support.rs
//! Utilidades compartidas por las pruebas: almacenes efímeros, fixtures y
//! despachadores de mentira.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tempfile::TempDir;

use crate::config::engine_config::EngineConfig;
use crate::errors::{EngineError, EngineResult};
use crate::models::campaign_model::CampaignAttributes;
use crate::services::bootstrap_service::BootstrapService;
use crate::services::campaign_service::CampaignDispatcher;
use crate::services::retention_service::RetentionService;
use crate::services::segmentation_service::SegmentationService;

/// SQL de churn tal como se embarca en sql/churn_analysis.sql: las pruebas
/// ejercitan el mismo predicado que corre en producción.
pub fn churn_query() -> String {
    include_str!("../../sql/churn_analysis.sql").to_string()
}

/// Pool sobre un archivo SQLite temporal, con el esquema ya creado.
/// El TempDir devuelto mantiene vivo el archivo.
pub async fn temp_store() -> (TempDir, Pool<Sqlite>) {
    let (dir, pool) = raw_store().await;
    BootstrapService::new(pool.clone())
        .ensure_schema()
        .await
        .expect("no se pudo crear el esquema de prueba");
    (dir, pool)
}

/// Pool sobre un archivo SQLite temporal SIN esquema, para probar los
/// caminos de almacén malformado.
pub async fn raw_store() -> (TempDir, Pool<Sqlite>) {
    let dir = tempfile::tempdir().expect("no se pudo crear el directorio temporal");
    let pool = connect(&dir.path().join("retention_test.db")).await;
    (dir, pool)
}

async fn connect(path: &Path) -> Pool<Sqlite> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .expect("no se pudo abrir la base temporal")
}

pub async fn insert_user(
    pool: &Pool<Sqlite>,
    email: &str,
    last_login: &str,
    total_spend: f64,
    status: &str,
) {
    sqlx::query("INSERT INTO users (email, last_login, total_spend, status) VALUES (?1, ?2, ?3, ?4)")
        .bind(email)
        .bind(last_login)
        .bind(total_spend)
        .bind(status)
        .execute(pool)
        .await
        .expect("no se pudo insertar el usuario de prueba");
}

pub async fn count_users(pool: &Pool<Sqlite>) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .expect("no se pudo contar los usuarios");
    count
}

/// Configuración de prueba: modo demo, concurrencia corta.
pub fn test_config() -> EngineConfig {
    EngineConfig {
        max_concurrent_dispatches: 4,
        ..EngineConfig::default()
    }
}

/// Arma el orquestador contra el SQL embarcado y el despachador dado.
pub fn build_engine(
    pool: &Pool<Sqlite>,
    dispatcher: Arc<dyn CampaignDispatcher>,
    config: EngineConfig,
) -> RetentionService {
    let segmentation = SegmentationService::new(pool.clone(), churn_query());
    RetentionService::new(segmentation, dispatcher, config)
}

/// Llamada registrada por el despachador de mentira.
pub struct RecordedCall {
    pub user_id: i64,
    pub campaign_id: String,
    pub ltv: f64,
}

/// Despachador que registra cada llamada y rechaza los user_id indicados.
pub struct RecordingDispatcher {
    pub calls: Mutex<Vec<RecordedCall>>,
    fail_user_ids: Vec<i64>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::failing(Vec::new())
    }

    pub fn failing(fail_user_ids: Vec<i64>) -> Self {
        RecordingDispatcher {
            calls: Mutex::new(Vec::new()),
            fail_user_ids,
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CampaignDispatcher for RecordingDispatcher {
    async fn trigger_campaign(
        &self,
        user_id: i64,
        campaign_id: &str,
        attributes: &CampaignAttributes,
    ) -> EngineResult<()> {
        self.calls.lock().unwrap().push(RecordedCall {
            user_id,
            campaign_id: campaign_id.to_string(),
            ltv: attributes.ltv,
        });

        if self.fail_user_ids.contains(&user_id) {
            return Err(EngineError::DispatchRejected {
                user_id,
                reason: "rechazo forzado por la prueba".to_string(),
            });
        }
        Ok(())
    }
}

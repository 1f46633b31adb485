use std::process::ExitCode;
use std::sync::Arc;

use dotenv::dotenv;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use crate::config::engine_config::EngineConfig;
use crate::errors::{EngineError, EngineResult};
use crate::logger::init_logger;
use crate::services::bootstrap_service::BootstrapService;
use crate::services::campaign_service::{BrazeClient, CampaignDispatcher, MockBrazeClient};
use crate::services::reporting_service::ReportingService;
use crate::services::retention_service::RetentionService;
use crate::services::segmentation_service::{self, SegmentationService};

mod config;
mod errors;
mod logger;
mod models;
mod services;
#[cfg(test)]
mod tests;

/// Abre el pool de SQLite con adquisición acotada: se abre al inicio de la
/// corrida y se cierra en todas las salidas, también las fatales. En modo
/// demo el archivo se crea si no existe.
async fn setup_database(config: &EngineConfig) -> EngineResult<Pool<Sqlite>> {
    log::info!("Conectando a SQLite en {:?}", config.database_path);

    let options = SqliteConnectOptions::new()
        .filename(&config.database_path)
        .create_if_missing(config.demo_mode);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| {
            EngineError::StoreUnavailable(format!(
                "No se pudo conectar a {:?}: {}",
                config.database_path, e
            ))
        })
}

/// Selecciona el despachador: cliente real con API key, simulado sin ella.
fn build_dispatcher(config: &EngineConfig) -> Arc<dyn CampaignDispatcher> {
    match &config.api_key {
        Some(api_key) => Arc::new(BrazeClient::new(&config.braze_base_url, api_key.clone())),
        None => {
            log::info!("Sin API_KEY: usando el cliente de campañas simulado");
            Arc::new(MockBrazeClient::new(&config.braze_base_url))
        }
    }
}

/// Prepara el almacén según el modo de operación.
async fn bootstrap_store(config: &EngineConfig, db_pool: &Pool<Sqlite>) -> EngineResult<()> {
    let bootstrap = BootstrapService::new(db_pool.clone());
    if config.demo_mode {
        bootstrap.ensure_schema().await?;
        bootstrap.seed_demo_users().await?;
    } else {
        bootstrap.verify_schema().await?;
    }
    Ok(())
}

/// Corrida nocturna: bootstrap → segmentar → despachar → resumir.
async fn run_engine(config: &EngineConfig, db_pool: &Pool<Sqlite>) -> EngineResult<()> {
    // 1) Bootstrap del almacén: sembrar en demo, verificar en producción.
    bootstrap_store(config, db_pool).await?;

    // 2) Recurso de consulta: falla rápido si el archivo no está, antes de
    //    consultar o despachar nada.
    let query_text = segmentation_service::load_query(&config.query_path)?;

    // 3) Cableado de servicios y corrida única.
    let segmentation = SegmentationService::new(db_pool.clone(), query_text);
    let dispatcher = build_dispatcher(config);
    let engine = RetentionService::new(segmentation, dispatcher, config.clone());

    let summary = engine.run().await?;

    // El motor no deduplica entre corridas: semántica al-menos-una-vez
    // sobre un almacén sin cambios.
    log::info!(
        "Enrolamiento en la campaña {} terminado: {} de {} usuarios",
        summary.campaign_id,
        summary.dispatched_ok,
        summary.segment_size
    );
    Ok(())
}

/// Modo `report`: vista de solo lectura, cero despachos.
async fn run_report(config: &EngineConfig, db_pool: &Pool<Sqlite>) -> anyhow::Result<()> {
    bootstrap_store(config, db_pool).await?;

    let query_text = segmentation_service::load_query(&config.query_path)?;
    let segmentation = SegmentationService::new(db_pool.clone(), query_text);
    let reporting = ReportingService::new(db_pool.clone(), segmentation);

    reporting.print_report(&config.criteria).await
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    init_logger();

    let config = match EngineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Configuración inválida: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let db_pool = match setup_database(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mode = std::env::args().nth(1);
    let result = match mode.as_deref() {
        Some("report") => run_report(&config, &db_pool)
            .await
            .map_err(|e| format!("{:#}", e)),
        _ => run_engine(&config, &db_pool)
            .await
            .map_err(|e| e.to_string()),
    };

    // Cierre garantizado del pool en todas las salidas.
    db_pool.close().await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("La corrida terminó con error fatal: {}", e);
            ExitCode::FAILURE
        }
    }
}

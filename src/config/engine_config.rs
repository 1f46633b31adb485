//! config/engine_config.rs
//! Configuración de corrida del motor, leída del entorno (.env o proceso).

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, EngineResult};
use crate::models::user_model::EligibilityCriteria;

/// Identificador de campaña usado cuando `CAMPAIGN_ID` no está definido.
pub const DEFAULT_CAMPAIGN_ID: &str = "reactivation-journey-v1";
const DEFAULT_DATABASE_PATH: &str = "marketplace.db";
const DEFAULT_SQL_PATH: &str = "sql/churn_analysis.sql";
const DEFAULT_BRAZE_BASE_URL: &str = "https://rest.iad-01.braze.com";
const DEFAULT_MAX_CONCURRENT_DISPATCHES: usize = 8;

/// Configuración explícita que se pasa al orquestador al construirlo.
/// Nada de estado global de módulo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub database_path: PathBuf,
    pub query_path: PathBuf,
    pub campaign_id: String,
    /// Secreta. Obligatoria fuera de modo demo; su ausencia en demo
    /// selecciona el cliente de campañas simulado.
    pub api_key: Option<String>,
    pub braze_base_url: String,
    /// En demo el motor crea y siembra el almacén; en producción solo
    /// verifica que sea consultable.
    pub demo_mode: bool,
    pub criteria: EligibilityCriteria,
    pub max_concurrent_dispatches: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            query_path: PathBuf::from(DEFAULT_SQL_PATH),
            campaign_id: DEFAULT_CAMPAIGN_ID.to_string(),
            api_key: None,
            braze_base_url: DEFAULT_BRAZE_BASE_URL.to_string(),
            demo_mode: true,
            criteria: EligibilityCriteria::default(),
            max_concurrent_dispatches: DEFAULT_MAX_CONCURRENT_DISPATCHES,
        }
    }
}

impl EngineConfig {
    /// Construye la configuración desde el entorno y la valida.
    /// `dotenv` ya debe haberse cargado en `main`.
    pub fn from_env() -> EngineResult<Self> {
        let criteria = EligibilityCriteria {
            inactivity_threshold_days: env_parsed("INACTIVITY_THRESHOLD_DAYS", 30),
            min_spend: env_parsed("MIN_SPEND", 50.0),
        };

        let config = EngineConfig {
            database_path: PathBuf::from(env_or("DATABASE_PATH", DEFAULT_DATABASE_PATH)),
            query_path: PathBuf::from(env_or("CHURN_SQL_PATH", DEFAULT_SQL_PATH)),
            campaign_id: env_or("CAMPAIGN_ID", DEFAULT_CAMPAIGN_ID),
            api_key: env_var("API_KEY"),
            braze_base_url: env_or("BRAZE_BASE_URL", DEFAULT_BRAZE_BASE_URL),
            demo_mode: env_var("DEMO_MODE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
            criteria,
            max_concurrent_dispatches: env_parsed(
                "MAX_CONCURRENT_DISPATCHES",
                DEFAULT_MAX_CONCURRENT_DISPATCHES,
            )
            .max(1),
        };

        config.validate()?;
        Ok(config)
    }

    /// Invariantes de configuración que deben fallar antes de consultar
    /// o despachar nada.
    pub fn validate(&self) -> EngineResult<()> {
        if self.campaign_id.trim().is_empty() {
            return Err(EngineError::ConfigMissing(
                "CAMPAIGN_ID no puede estar vacío".to_string(),
            ));
        }
        if !self.demo_mode && self.api_key.is_none() {
            return Err(EngineError::ConfigMissing(
                "API_KEY es obligatoria fuera de modo demo".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    env_var(key).unwrap_or_else(|| default.to_string())
}

fn env_parsed<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

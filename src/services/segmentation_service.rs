//! services/segmentation_service.rs
//! Fuente de segmentación: ejecuta la consulta de elegibilidad contra el
//! almacén de usuarios. Lectura pura, sin estado propio.

use std::path::Path;

use chrono::{DateTime, Utc};
use sqlx::{Pool, Sqlite};

use crate::errors::{EngineError, EngineResult};
use crate::models::user_model::{EligibilityCriteria, UserRecord};

/// Carga el SQL de análisis de churn desde disco. El predicado es dato
/// externo configurable: los operadores pueden cambiarlo sin recompilar.
pub fn load_query(path: &Path) -> EngineResult<String> {
    if !path.exists() {
        return Err(EngineError::ConfigMissing(format!(
            "No existe el archivo SQL en {:?}",
            path
        )));
    }
    std::fs::read_to_string(path).map_err(|e| {
        EngineError::ConfigMissing(format!("No se pudo leer el SQL en {:?}: {}", path, e))
    })
}

#[derive(Clone)]
pub struct SegmentationService {
    db_pool: Pool<Sqlite>,
    query_text: String,
}

impl SegmentationService {
    pub fn new(db_pool: Pool<Sqlite>, query_text: String) -> Self {
        SegmentationService {
            db_pool,
            query_text,
        }
    }

    /// Ejecuta la consulta de segmentación con el reloj actual.
    pub async fn select_at_risk_users(
        &self,
        criteria: &EligibilityCriteria,
    ) -> EngineResult<Vec<UserRecord>> {
        self.select_at_risk_users_as_of(criteria, Utc::now()).await
    }

    /// Variante con reloj explícito. Para un snapshot fijo del almacén y un
    /// corte fijo devuelve exactamente el conjunto de filas que cumplen el
    /// predicado: sin muestreo y sin pérdida por paginación.
    pub async fn select_at_risk_users_as_of(
        &self,
        criteria: &EligibilityCriteria,
        now: DateTime<Utc>,
    ) -> EngineResult<Vec<UserRecord>> {
        let cutoff = criteria.cutoff(now).to_rfc3339();

        log::info!(
            "(select_at_risk_users) Ejecutando análisis de churn con corte={} y gasto mínimo={}",
            cutoff,
            criteria.min_spend
        );

        let records: Vec<UserRecord> = sqlx::query_as(&self.query_text)
            .bind(&cutoff)
            .bind(criteria.min_spend)
            .fetch_all(&self.db_pool)
            .await
            .map_err(|e| {
                EngineError::StoreUnavailable(format!(
                    "Fallo ejecutando la consulta de segmentación: {}",
                    e
                ))
            })?;

        // Validación única en la frontera; aguas abajo nadie re-valida.
        for record in &records {
            if record.total_spend < 0.0 {
                return Err(EngineError::StoreUnavailable(format!(
                    "total_spend negativo ({}) para el usuario {}",
                    record.total_spend, record.user_id
                )));
            }
        }

        Ok(records)
    }
}

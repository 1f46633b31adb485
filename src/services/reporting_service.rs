//! services/reporting_service.rs
//! Vista de solo lectura sobre el mismo almacén que consume el pipeline.

use anyhow::{Context, Result};
use sqlx::{Pool, Sqlite};

use crate::models::user_model::EligibilityCriteria;
use crate::services::segmentation_service::SegmentationService;

#[derive(Clone)]
pub struct ReportingService {
    db_pool: Pool<Sqlite>,
    segmentation: SegmentationService,
}

impl ReportingService {
    pub fn new(db_pool: Pool<Sqlite>, segmentation: SegmentationService) -> Self {
        ReportingService {
            db_pool,
            segmentation,
        }
    }

    /// Imprime el panel de retención: métricas generales y el segmento en
    /// riesgo actual. El segmento sale del MISMO SegmentationService que
    /// usa el motor, con los mismos criterios: el predicado de la vista no
    /// puede divergir del predicado del pipeline.
    pub async fn print_report(&self, criteria: &EligibilityCriteria) -> Result<()> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db_pool)
            .await
            .context("No se pudo contar los usuarios")?;

        let (churned,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM users WHERE status = 'churned'")
                .fetch_one(&self.db_pool)
                .await
                .context("No se pudo contar los usuarios churned")?;

        let active = total - churned;

        println!("=== Centro de mando de retención ===");
        println!("Usuarios totales: {}", total);
        println!("Usuarios activos: {}", active);
        println!("Usuarios churned: {}", churned);
        println!();

        let segment = self
            .segmentation
            .select_at_risk_users(criteria)
            .await
            .context("No se pudo calcular el segmento en riesgo")?;

        println!(
            "Segmento objetivo: último login hace más de {} días y gasto mayor a {}",
            criteria.inactivity_threshold_days, criteria.min_spend
        );

        if segment.is_empty() {
            println!("Ningún usuario cumple el criterio de churn ahora mismo.");
            return Ok(());
        }

        println!(
            "{:<6} {:<26} {:<36} {:>12}",
            "id", "email", "last_login", "total_spend"
        );
        for user in &segment {
            println!(
                "{:<6} {:<26} {:<36} {:>12.2}",
                user.user_id, user.email, user.last_login, user.total_spend
            );
        }
        println!(
            "-> {} usuarios identificados para re-activación",
            segment.len()
        );

        Ok(())
    }
}

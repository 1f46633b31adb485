//! services/bootstrap_service.rs
//! Colaborador de arranque del almacén. En modo demo crea la tabla y
//! siembra los perfiles de demostración; en producción solo verifica que
//! el esquema sea consultable.

use chrono::{Duration, Utc};
use sqlx::{Pool, Sqlite};

use crate::errors::{EngineError, EngineResult};

/// Perfiles de demostración: (email, días sin login, gasto total, estado).
const DEMO_PROFILES: &[(&str, i64, f64, &str)] = &[
    ("alice@example.com", 10, 220.50, "active"),
    ("bob@example.com", 35, 120.00, "churned"),
    ("carol@example.com", 45, 55.25, "churned"),
    ("dave@example.com", 5, 15.00, "active"),
    ("erin@example.com", 75, 310.00, "churned"),
    ("frank@example.com", 25, 48.00, "active"),
    ("grace@example.com", 120, 540.10, "churned"),
    ("heidi@example.com", 32, 51.00, "churned"),
    ("ivan@example.com", 2, 5.00, "active"),
    ("judy@example.com", 90, 88.50, "churned"),
];

#[derive(Clone)]
pub struct BootstrapService {
    db_pool: Pool<Sqlite>,
}

impl BootstrapService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        BootstrapService { db_pool }
    }

    /// Crea la tabla `users` si no existe.
    pub async fn ensure_schema(&self) -> EngineResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                last_login TEXT NOT NULL,
                total_spend REAL NOT NULL DEFAULT 0,
                status TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.db_pool)
        .await
        .map_err(|e| {
            EngineError::StoreUnavailable(format!("No se pudo crear la tabla users: {}", e))
        })?;

        Ok(())
    }

    /// Siembra los perfiles demo si la tabla está vacía. Idempotente:
    /// con datos existentes no toca nada.
    pub async fn seed_demo_users(&self) -> EngineResult<()> {
        let (existing,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db_pool)
            .await?;

        if existing > 0 {
            log::info!(
                "(seed_demo_users) Base ya sembrada ({} usuarios)",
                existing
            );
            return Ok(());
        }

        let now = Utc::now();
        for (email, days_ago, spend, status) in DEMO_PROFILES {
            let last_login = (now - Duration::days(*days_ago)).to_rfc3339();
            sqlx::query(
                "INSERT INTO users (email, last_login, total_spend, status) VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(*email)
            .bind(&last_login)
            .bind(*spend)
            .bind(*status)
            .execute(&self.db_pool)
            .await?;
        }

        log::info!("(seed_demo_users) Datos demo sembrados en la tabla users");
        Ok(())
    }

    /// Sonda de alcance para modo producción: la tabla debe existir y ser
    /// consultable antes de segmentar.
    pub async fn verify_schema(&self) -> EngineResult<()> {
        sqlx::query("SELECT id FROM users LIMIT 1")
            .fetch_optional(&self.db_pool)
            .await
            .map_err(|e| {
                EngineError::StoreUnavailable(format!("La tabla users no es consultable: {}", e))
            })?;

        Ok(())
    }
}

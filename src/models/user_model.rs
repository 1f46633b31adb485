use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Estado del usuario, definido por la lógica de negocio upstream.
/// El pipeline nunca lo deriva ni lo modifica.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Churned,
}

/// Una fila del resultado de segmentación, deserializada una sola vez
/// en la frontera con el almacén. Todo registro emitido ya cumple el
/// predicado de elegibilidad; aguas abajo no se vuelve a filtrar.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRecord {
    pub user_id: i64,
    pub email: String,
    /// Timestamp ISO-8601 tal como está almacenado; solo lo usa el predicado.
    pub last_login: String,
    pub total_spend: f64,
    pub status: UserStatus,
}

/// Criterios de elegibilidad del segmento en riesgo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityCriteria {
    pub inactivity_threshold_days: i64,
    pub min_spend: f64,
}

impl Default for EligibilityCriteria {
    fn default() -> Self {
        EligibilityCriteria {
            inactivity_threshold_days: 30,
            min_spend: 50.0,
        }
    }
}

impl EligibilityCriteria {
    /// Fecha de corte para un reloj dado. Solo los logins estrictamente
    /// anteriores al corte son elegibles.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(self.inactivity_threshold_days)
    }
}

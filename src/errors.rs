//! errors.rs
//! Taxonomía de errores del motor de retención.

use thiserror::Error;

/// Alias de Result usando `EngineError`
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Errores a nivel de corrida. Solo `StoreUnavailable` y `ConfigMissing`
/// son fatales y llegan al exit status del proceso; `DispatchRejected`
/// queda contenido en el loop de despacho.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Almacén inalcanzable, esquema malformado o consulta inejecutable.
    #[error("Almacén de usuarios no disponible: {0}")]
    StoreUnavailable(String),

    /// Recurso de configuración requerido ausente (SQL, identidad de campaña).
    #[error("Configuración faltante: {0}")]
    ConfigMissing(String),

    /// El servicio de campañas rechazó un enrolamiento individual.
    #[error("Envío rechazado para el usuario {user_id}: {reason}")]
    DispatchRejected { user_id: i64, reason: String },
}

impl From<sqlx::Error> for EngineError {
    fn from(err: sqlx::Error) -> Self {
        EngineError::StoreUnavailable(err.to_string())
    }
}

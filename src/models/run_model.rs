use serde::Serialize;

/// Resultado de un intento de enrolamiento individual. Existe solo para
/// el resumen de la corrida; nada persiste el historial de despachos.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchOutcome {
    pub user_id: i64,
    pub succeeded: bool,
    /// Presente únicamente cuando `succeeded` es false.
    pub error: Option<String>,
}

impl DispatchOutcome {
    pub fn success(user_id: i64) -> Self {
        DispatchOutcome {
            user_id,
            succeeded: true,
            error: None,
        }
    }

    pub fn failure(user_id: i64, reason: impl Into<String>) -> Self {
        DispatchOutcome {
            user_id,
            succeeded: false,
            error: Some(reason.into()),
        }
    }
}

/// Resumen de una corrida completa del pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub campaign_id: String,
    pub segment_size: usize,
    pub dispatched_ok: usize,
    pub dispatch_failures: usize,
}

impl RunSummary {
    /// Resumen de un segmento vacío: estado terminal normal, cero despachos.
    pub fn empty(run_id: String, campaign_id: String) -> Self {
        RunSummary {
            run_id,
            campaign_id,
            segment_size: 0,
            dispatched_ok: 0,
            dispatch_failures: 0,
        }
    }

    pub fn from_outcomes(
        run_id: String,
        campaign_id: String,
        segment_size: usize,
        outcomes: &[DispatchOutcome],
    ) -> Self {
        let dispatched_ok = outcomes.iter().filter(|o| o.succeeded).count();
        RunSummary {
            run_id,
            campaign_id,
            segment_size,
            dispatched_ok,
            dispatch_failures: outcomes.len() - dispatched_ok,
        }
    }
}

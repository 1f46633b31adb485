//! services/retention_service.rs
//! Orquestador de retención: una pasada lineal por invocación.
//! segmentar → despachar en fan-out → resumir. Sin estado entre corridas.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use uuid::Uuid;

use crate::config::engine_config::EngineConfig;
use crate::errors::EngineResult;
use crate::models::campaign_model::CampaignAttributes;
use crate::models::run_model::{DispatchOutcome, RunSummary};
use crate::models::user_model::UserRecord;
use crate::services::campaign_service::CampaignDispatcher;
use crate::services::segmentation_service::SegmentationService;

pub struct RetentionService {
    segmentation: SegmentationService,
    dispatcher: Arc<dyn CampaignDispatcher>,
    config: EngineConfig,
}

impl RetentionService {
    pub fn new(
        segmentation: SegmentationService,
        dispatcher: Arc<dyn CampaignDispatcher>,
        config: EngineConfig,
    ) -> Self {
        RetentionService {
            segmentation,
            dispatcher,
            config,
        }
    }

    /// Ejecuta una corrida completa. Solo un fallo de segmentación vuelve
    /// fatal la corrida; los rechazos individuales quedan en el resumen.
    pub async fn run(&self) -> EngineResult<RunSummary> {
        let run_id = Uuid::new_v4().to_string();
        log::info!(
            "(run) Iniciando corrida {} para la campaña {}",
            run_id,
            self.config.campaign_id
        );

        // 1) Segmentar: exactamente una consulta. Si falla, se aborta con
        //    cero despachos.
        let segment = self
            .segmentation
            .select_at_risk_users(&self.config.criteria)
            .await?;

        let segment_size = segment.len();
        log::info!("(run) Se encontraron {} usuarios en riesgo", segment_size);

        // 2) Segmento vacío: estado terminal normal, no un error.
        if segment.is_empty() {
            log::info!("(run) Ningún usuario requiere re-activación esta noche");
            return Ok(RunSummary::empty(run_id, self.config.campaign_id.clone()));
        }

        // 3) Fan-out de despachos con concurrencia acotada.
        log::info!("(run) Sincronizando con el servicio de campañas...");
        let outcomes = self.dispatch_segment(segment).await;

        // 4) Resumir y terminar con éxito, fallos individuales incluidos.
        let summary = RunSummary::from_outcomes(
            run_id,
            self.config.campaign_id.clone(),
            segment_size,
            &outcomes,
        );
        log::info!(
            "(run) Corrida {} finalizada: {} segmentados, {} enrolados, {} fallidos",
            summary.run_id,
            summary.segment_size,
            summary.dispatched_ok,
            summary.dispatch_failures
        );
        Ok(summary)
    }

    /// Despacha el segmento con a lo sumo `max_concurrent_dispatches`
    /// llamadas en vuelo. Una señal de apagado deja de tomar usuarios del
    /// segmento mientras los vuelos en curso se completan; lo no despachado
    /// queda para la próxima corrida programada.
    async fn dispatch_segment(&self, segment: Vec<UserRecord>) -> Vec<DispatchOutcome> {
        let max_concurrent = self.config.max_concurrent_dispatches.max(1);

        stream::iter(segment)
            .take_until(shutdown_signal())
            .map(|record| self.dispatch_one(record))
            .buffer_unordered(max_concurrent)
            .collect::<Vec<_>>()
            .await
    }

    /// Un despacho = un usuario, a lo sumo una vez por corrida.
    async fn dispatch_one(&self, record: UserRecord) -> DispatchOutcome {
        let attributes = CampaignAttributes::from_record(&record);

        match self
            .dispatcher
            .trigger_campaign(record.user_id, &self.config.campaign_id, &attributes)
            .await
        {
            Ok(()) => DispatchOutcome::success(record.user_id),
            Err(e) => {
                // Reintentable, pero no se reintenta en esta corrida.
                log::warn!(
                    "(dispatch_one) Fallo reintentable para el usuario {}: {}",
                    record.user_id,
                    e
                );
                DispatchOutcome::failure(record.user_id, e.to_string())
            }
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Sin manejador de señal el fan-out simplemente corre hasta agotar
        // el segmento.
        log::error!(
            "(shutdown_signal) No se pudo instalar el manejador de ctrl-c: {}",
            e
        );
        futures::future::pending::<()>().await;
    }
    log::warn!("(shutdown_signal) Señal de apagado recibida; no se tomarán más usuarios del segmento");
}

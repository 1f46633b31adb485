//! services/campaign_service.rs
//! Despachador de campañas: enrola un usuario por llamada contra el
//! servicio externo. Cada llamada es independiente y NO es idempotente a
//! nivel de protocolo; repetirla puede duplicar enrolamientos aguas abajo.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::errors::{EngineError, EngineResult};
use crate::models::campaign_model::{CampaignAttributes, CampaignTriggerRequest};

/// Ruta lógica del disparo de campañas en el servicio externo.
const TRIGGER_ENDPOINT: &str = "/campaigns/trigger/send";
/// Tiempo máximo de una petición de enrolamiento.
const DISPATCH_TIMEOUT: Duration = Duration::from_secs(5);
/// Latencia simulada del cliente mock.
const MOCK_LATENCY: Duration = Duration::from_millis(200);

/// Capacidad de enrolar un usuario en una campaña externa. El orquestador
/// solo conoce este contrato; el transporte concreto vive detrás.
///
/// Un rechazo ordinario del servicio regresa como
/// `EngineError::DispatchRejected`, nunca como pánico: el orquestador lo
/// observa, lo registra y sigue con el resto del segmento.
#[async_trait]
pub trait CampaignDispatcher: Send + Sync {
    async fn trigger_campaign(
        &self,
        user_id: i64,
        campaign_id: &str,
        attributes: &CampaignAttributes,
    ) -> EngineResult<()>;
}

/// Cliente real contra la API de Braze.
#[derive(Clone)]
pub struct BrazeClient {
    base_url: String,
    api_key: String,
    http_client: Client,
}

impl BrazeClient {
    pub fn new(base_url: &str, api_key: String) -> Self {
        BrazeClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            http_client: Client::new(),
        }
    }
}

#[async_trait]
impl CampaignDispatcher for BrazeClient {
    async fn trigger_campaign(
        &self,
        user_id: i64,
        campaign_id: &str,
        attributes: &CampaignAttributes,
    ) -> EngineResult<()> {
        let endpoint = format!("{}{}", self.base_url, TRIGGER_ENDPOINT);
        let payload = CampaignTriggerRequest::single(campaign_id, user_id, attributes.clone());

        let response = self
            .http_client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .timeout(DISPATCH_TIMEOUT)
            .send()
            .await
            .map_err(|e| EngineError::DispatchRejected {
                user_id,
                reason: format!("Fallo de transporte hacia {}: {}", endpoint, e),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_txt = response.text().await.unwrap_or_default();
            return Err(EngineError::DispatchRejected {
                user_id,
                reason: format!("El servicio de campañas respondió {}: {}", status, body_txt),
            });
        }

        log::info!(
            "(trigger_campaign) Usuario {} enrolado en la campaña {}",
            user_id,
            campaign_id
        );
        Ok(())
    }
}

/// Cliente simulado para modo demo: registra la intención, espera la
/// latencia de ida y siempre acepta.
#[derive(Clone)]
pub struct MockBrazeClient {
    base_url: String,
}

impl MockBrazeClient {
    pub fn new(base_url: &str) -> Self {
        MockBrazeClient {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CampaignDispatcher for MockBrazeClient {
    async fn trigger_campaign(
        &self,
        user_id: i64,
        campaign_id: &str,
        attributes: &CampaignAttributes,
    ) -> EngineResult<()> {
        let endpoint = format!("{}{}", self.base_url, TRIGGER_ENDPOINT);
        let payload = CampaignTriggerRequest::single(campaign_id, user_id, attributes.clone());

        tokio::time::sleep(MOCK_LATENCY).await;

        log::info!(
            "(trigger_campaign) Simulando POST al API de Braze... Usuario {} agregado a la campaña {}",
            user_id,
            campaign_id
        );
        log::debug!(
            "(trigger_campaign) Endpoint: {} | Payload: {}",
            endpoint,
            serde_json::to_string(&payload).unwrap_or_default()
        );

        Ok(())
    }
}

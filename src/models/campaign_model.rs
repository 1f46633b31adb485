use serde::Serialize;

use crate::models::user_model::UserRecord;

/// Etiqueta de segmento que acompaña cada enrolamiento de este pipeline.
pub const AT_RISK_SEGMENT_LABEL: &str = "at-risk-high-value";

/// Atributos de personalización por destinatario. Llevan, como mínimo,
/// las señales de recencia y de valor que justificaron la elegibilidad.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignAttributes {
    pub last_login_date: String,
    pub ltv: f64,
    pub segment: String,
}

impl CampaignAttributes {
    pub fn from_record(record: &UserRecord) -> Self {
        CampaignAttributes {
            last_login_date: record.last_login.clone(),
            ltv: record.total_spend,
            segment: AT_RISK_SEGMENT_LABEL.to_string(),
        }
    }
}

/// Payload del endpoint `POST /campaigns/trigger/send` del servicio externo.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignTriggerRequest {
    pub campaign_id: String,
    pub recipients: Vec<CampaignRecipient>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignRecipient {
    pub external_user_id: String,
    pub attributes: CampaignAttributes,
}

impl CampaignTriggerRequest {
    /// Request con un único destinatario: un despacho = un usuario.
    pub fn single(campaign_id: &str, user_id: i64, attributes: CampaignAttributes) -> Self {
        CampaignTriggerRequest {
            campaign_id: campaign_id.to_string(),
            recipients: vec![CampaignRecipient {
                external_user_id: user_id.to_string(),
                attributes,
            }],
        }
    }
}

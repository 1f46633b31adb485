//! tests/config_tests.rs

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use crate::config::engine_config::{EngineConfig, DEFAULT_CAMPAIGN_ID};
    use crate::errors::EngineError;
    use crate::models::user_model::EligibilityCriteria;

    #[test]
    fn test_la_configuracion_por_defecto_es_valida() {
        let config = EngineConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.campaign_id, DEFAULT_CAMPAIGN_ID);
        assert!(config.demo_mode);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_fuera_de_demo_la_api_key_es_obligatoria() {
        let config = EngineConfig {
            demo_mode: false,
            api_key: None,
            ..EngineConfig::default()
        };

        assert!(matches!(
            config.validate(),
            Err(EngineError::ConfigMissing(_))
        ));

        let with_key = EngineConfig {
            demo_mode: false,
            api_key: Some("clave-secreta".to_string()),
            ..EngineConfig::default()
        };
        assert!(with_key.validate().is_ok());
    }

    #[test]
    fn test_campania_vacia_es_config_missing() {
        let config = EngineConfig {
            campaign_id: "   ".to_string(),
            ..EngineConfig::default()
        };

        assert!(matches!(
            config.validate(),
            Err(EngineError::ConfigMissing(_))
        ));
    }

    #[test]
    fn test_el_corte_resta_la_ventana_de_inactividad() {
        let criteria = EligibilityCriteria::default();
        let now = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();

        assert_eq!(criteria.cutoff(now), now - Duration::days(30));
    }
}

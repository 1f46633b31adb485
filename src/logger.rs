//! logger.rs
//! Configuración del logger del motor usando env_logger.

pub fn init_logger() {
    // RUST_LOG controla el nivel de logs; si no está definido usamos "info"
    // para que cada corrida deje su traza de segmentación y despachos.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();
}

//! services/mod.rs
//! Módulo que agrupa los "servicios" o "capas de negocio" del motor.

pub mod bootstrap_service;
pub mod campaign_service;
pub mod reporting_service;
pub mod retention_service;
pub mod segmentation_service;

//! tests/mod.rs
//! Pruebas del motor de retención.

mod config_tests;
mod support;

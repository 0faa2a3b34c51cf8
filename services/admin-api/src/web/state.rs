//! services/admin-api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::adapters::JsonExporter;
use crate::config::Config;
use connectia_core::ports::AdminDatabase;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all
/// handlers. The pool lives inside the `AdminDatabase` implementation; no
/// other long-lived mutable state exists.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn AdminDatabase>,
    pub exporter: JsonExporter,
    pub config: Arc<Config>,
}

//! Shared types for the API layer.

use std::sync::Arc;

use serde::Serialize;

use crate::db::SpecialistStore;
use crate::specialists::SpecialistService;

/// Shared context for all routes.
#[derive(Clone)]
pub struct ApiContext {
    pub specialists: Arc<SpecialistService>,
}

impl ApiContext {
    pub fn new(store: Arc<dyn SpecialistStore>) -> Self {
        Self {
            specialists: Arc::new(SpecialistService::new(store)),
        }
    }
}

/// `{"message": ...}` body returned by the lifecycle endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

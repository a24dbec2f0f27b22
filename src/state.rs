//! Application state for Axum web framework.
//!
//! Contains shared services and resources that are accessible
//! across all request handlers.

use std::sync::Arc;

use crate::config::Settings;
use crate::pagination::PaginationOptions;
use crate::repositories::Repositories;
use crate::services::Services;

/// Application state containing all shared services and resources.
///
/// Cloning is cheap since services and options are shared through `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// All business logic services
    pub services: Services,
    /// Options the pagination middleware parses requests with
    pub pagination: Arc<PaginationOptions>,
    /// Application name reported by the health endpoint
    pub app_name: String,
}

impl AppState {
    /// Creates state over empty in-memory collections.
    pub fn new(pagination: PaginationOptions, app_name: impl Into<String>) -> Self {
        Self {
            services: Services::new(Repositories::new()),
            pagination: Arc::new(pagination),
            app_name: app_name.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.pagination.clone(), settings.application.name.clone())
    }
}

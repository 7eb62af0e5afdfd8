//! Application state module

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};

use crate::domain::communication::dispatch::DispatchService;

/// Number of campaign errors returned to API clients
pub const ERROR_PREVIEW_LIMIT: usize = 10;

/// Application configuration
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// How many per-recipient errors a campaign send response includes
    pub error_preview_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            error_preview_limit: ERROR_PREVIEW_LIMIT,
        }
    }
}

/// Global application state
#[derive(Clone)]
pub struct AppState<D: DispatchService> {
    /// The time the server started
    pub start_time: DateTime<Utc>,

    /// The application configuration
    pub config: AppConfig,

    /// Email dispatch service
    pub dispatch: Arc<D>,
}

impl<D> AppState<D>
where
    D: DispatchService,
{
    /// Create a new application state
    pub fn new(config: AppConfig, dispatch: D) -> Self {
        Self {
            start_time: Utc::now(),
            config,
            dispatch: Arc::new(dispatch),
        }
    }
}

impl<D> fmt::Debug for AppState<D>
where
    D: DispatchService,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("start_time", &self.start_time)
            .field("config", &self.config)
            .field("dispatch", &"DispatchService")
            .finish()
    }
}

#[cfg(test)]
use crate::domain::communication::dispatch::tests::MockDispatchService;

#[cfg(test)]
pub fn test_state(dispatch: Option<MockDispatchService>) -> AppState<MockDispatchService> {
    AppState::new(
        AppConfig::default(),
        dispatch.unwrap_or_else(MockDispatchService::new),
    )
}

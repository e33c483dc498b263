use std::sync::Arc;
use std::time::Duration;

use aether_core::RootConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RootConfig>,
    /// Deadline for each blocking filesystem job; the job's token is cancelled when it passes.
    pub request_timeout: Duration,
}

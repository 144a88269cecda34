use std::sync::Arc;

use crate::services::poller::SnapshotStore;
use crate::services::solar_processor::SolarDataProcessor;

#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<SolarDataProcessor>,
    pub latest: SnapshotStore,
}

use std::sync::Arc;

use crate::services::ScheduleService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ScheduleService>,
}

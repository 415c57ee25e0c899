use std::sync::Arc;

use crate::services::RegistrationService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RegistrationService>,
}

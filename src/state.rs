use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::services::mpesa_service::MpesaService;

#[derive(Clone)]
pub struct AppState {
    pub mpesa_service: Arc<MpesaService>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let mpesa_service = Arc::new(MpesaService::new(Arc::new(config))?);

        Ok(AppState { mpesa_service })
    }
}

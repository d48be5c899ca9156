//! Application state shared by all handlers.

use imgvault_core::Config;
use imgvault_processing::UploadProcessor;
use imgvault_storage::ImageStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn ImageStore>,
    pub processor: UploadProcessor,
}

impl AppState {
    /// Build state around a store; the processor writes into the same store.
    pub fn new(config: Config, store: Arc<dyn ImageStore>) -> Self {
        let processor = UploadProcessor::new(Arc::clone(&store));
        Self {
            config,
            store,
            processor,
        }
    }
}

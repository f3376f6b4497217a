use std::sync::Arc;

use libro_service::LibroService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<LibroService>,
}
impl AppState {
	pub fn new(config: libro_config::Config) -> Self {
		Self::with_service(LibroService::new(config))
	}

	pub fn with_service(service: LibroService) -> Self {
		Self { service: Arc::new(service) }
	}
}

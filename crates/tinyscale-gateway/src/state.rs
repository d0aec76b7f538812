use std::sync::Arc;

use tinyscale_core::{Redirector, Shortener};

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    redirector: Arc<dyn Redirector>,
}

impl AppState {
    pub fn new(shortener: Arc<dyn Shortener>, redirector: Arc<dyn Redirector>) -> Self {
        Self {
            shortener,
            redirector,
        }
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    pub fn redirector(&self) -> &dyn Redirector {
        self.redirector.as_ref()
    }
}

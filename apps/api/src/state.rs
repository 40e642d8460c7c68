use std::sync::Arc;

use sqlx::AnyPool;

use crate::config::Config;
use crate::locations::search::PlaceSearch;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: AnyPool,
    pub config: Config,
    /// Location lookup for `/api/autocomplete`. Default: `CatalogPlaceSearch`.
    pub places: Arc<dyn PlaceSearch>,
}

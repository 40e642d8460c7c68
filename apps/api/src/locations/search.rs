//! Location lookup behind a trait so the catalog search can be swapped for
//! an external places provider without touching the handler.

use async_trait::async_trait;
use profile_board_common::LocationRef;
use sqlx::AnyPool;

use crate::errors::AppError;
use crate::locations::queries::search_locations;

const MAX_SUGGESTIONS: i64 = 10;

/// Carried in `AppState` as `Arc<dyn PlaceSearch>`.
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    async fn search(&self, value: &str) -> Result<Vec<LocationRef>, AppError>;
}

/// Prefix search over the `locations` table.
pub struct CatalogPlaceSearch {
    pool: AnyPool,
}

impl CatalogPlaceSearch {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlaceSearch for CatalogPlaceSearch {
    async fn search(&self, value: &str) -> Result<Vec<LocationRef>, AppError> {
        Ok(search_locations(&self.pool, value, MAX_SUGGESTIONS).await?)
    }
}

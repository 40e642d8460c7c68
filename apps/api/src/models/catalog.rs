use profile_board_common::{LocationRef, SkillRef};
use sqlx::FromRow;

/// A row of either name catalog (`locations` or `skills`).
#[derive(Debug, Clone, FromRow)]
pub struct CatalogRow {
    pub id: i64,
    pub name: String,
}

impl From<CatalogRow> for LocationRef {
    fn from(row: CatalogRow) -> Self {
        LocationRef {
            id: row.id,
            name: row.name,
        }
    }
}

impl From<CatalogRow> for SkillRef {
    fn from(row: CatalogRow) -> Self {
        SkillRef {
            id: row.id,
            name: row.name,
        }
    }
}

use anyhow::anyhow;
use profile_board_common::{SkillForReview, SkillKind};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct SkillForReviewRow {
    pub id: i64,
    pub skill_for_review: String,
    pub user_id: i64,
    pub skill_type: String,
}

impl TryFrom<SkillForReviewRow> for SkillForReview {
    type Error = anyhow::Error;

    fn try_from(row: SkillForReviewRow) -> Result<Self, Self::Error> {
        let kind = SkillKind::from_table(&row.skill_type)
            .ok_or_else(|| anyhow!("unknown skill_type '{}' on review row {}", row.skill_type, row.id))?;
        Ok(SkillForReview {
            id: row.id,
            skill_for_review: row.skill_for_review,
            user_id: row.user_id,
            kind,
        })
    }
}

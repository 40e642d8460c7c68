use profile_board_common::ExperienceRecord;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct ExperienceRow {
    pub id: i64,
    pub user_id: i64,
    pub company_name: String,
    pub job_title: String,
    pub job_description: String,
    pub job_dates: String,
}

impl From<ExperienceRow> for ExperienceRecord {
    fn from(row: ExperienceRow) -> Self {
        ExperienceRecord {
            id: row.id,
            company_name: row.company_name,
            job_title: row.job_title,
            job_description: row.job_description,
            job_dates: row.job_dates,
        }
    }
}

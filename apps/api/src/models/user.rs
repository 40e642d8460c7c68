use profile_board_common::{Profile, ProfileCard};
use sqlx::FromRow;

/// A `users` row. The nullable text columns are selected through
/// `COALESCE(.., '')` (see `users::queries::USER_COLUMNS`) since the `Any`
/// driver cannot decode a NULL into `Option<String>`; empty means unset.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub summary: String,
    pub desired_title: String,
    pub area_of_work: String,
    pub image: String,
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

impl From<UserRow> for ProfileCard {
    fn from(row: UserRow) -> Self {
        ProfileCard {
            id: row.id,
            first_name: non_empty(row.first_name),
            last_name: non_empty(row.last_name),
            summary: non_empty(row.summary),
            desired_title: non_empty(row.desired_title),
            area_of_work: non_empty(row.area_of_work),
            image: non_empty(row.image),
        }
    }
}

impl From<UserRow> for Profile {
    /// Scalar fields only; collections are attached by the caller.
    fn from(row: UserRow) -> Self {
        let card = ProfileCard::from(row);
        Profile {
            id: card.id,
            first_name: card.first_name,
            last_name: card.last_name,
            summary: card.summary,
            desired_title: card.desired_title,
            area_of_work: card.area_of_work,
            image: card.image,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_columns_become_none() {
        let row = UserRow {
            id: 4,
            first_name: "Ada".into(),
            last_name: String::new(),
            summary: String::new(),
            desired_title: "Engineer".into(),
            area_of_work: String::new(),
            image: String::new(),
        };
        let profile = Profile::from(row);
        assert_eq!(profile.first_name.as_deref(), Some("Ada"));
        assert_eq!(profile.last_name, None);
        assert_eq!(profile.summary, None);
        assert_eq!(profile.desired_title.as_deref(), Some("Engineer"));
    }
}

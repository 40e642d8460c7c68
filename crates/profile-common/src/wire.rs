use serde::{Deserialize, Serialize};

/// `err` value the gateway reports when a lookup matched nothing.
pub const ZERO_RESULTS: &str = "Zero results found";

/// Which of a user's two skill sets a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillKind {
    #[serde(rename = "user_top_skills")]
    Top,
    #[serde(rename = "user_additional_skills")]
    Additional,
}

impl SkillKind {
    /// Join table backing this skill set. Also the value sent as `type`.
    pub fn table(self) -> &'static str {
        match self {
            SkillKind::Top => "user_top_skills",
            SkillKind::Additional => "user_additional_skills",
        }
    }

    pub fn from_table(table: &str) -> Option<Self> {
        match table {
            "user_top_skills" => Some(SkillKind::Top),
            "user_additional_skills" => Some(SkillKind::Additional),
            _ => None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Resources
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceRecord {
    pub id: i64,
    pub company_name: String,
    pub job_title: String,
    pub job_description: String,
    pub job_dates: String,
}

/// A user's profile with every collection attached, as returned by
/// `GET /users/get-extras/:id`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub summary: Option<String>,
    pub desired_title: Option<String>,
    pub area_of_work: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub locations: Vec<LocationRef>,
    #[serde(default)]
    pub top_skills: Vec<SkillRef>,
    #[serde(default)]
    pub additional_skills: Vec<SkillRef>,
    #[serde(default)]
    pub experience: Vec<ExperienceRecord>,
}

/// Scalar profile fields shown on a feed card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileCard {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub summary: Option<String>,
    pub desired_title: Option<String>,
    pub area_of_work: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedPage {
    pub users: Vec<ProfileCard>,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillForReview {
    pub id: i64,
    pub skill_for_review: String,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub kind: SkillKind,
}

// ────────────────────────────────────────────────────────────────────────────
// Request bodies
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutocompleteQuery {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLocation {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUserLocations {
    pub locations: Vec<NewLocation>,
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteUserLocation {
    pub location_id: i64,
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUserSkills {
    pub skills: Vec<SkillRef>,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub kind: SkillKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteUserSkill {
    pub skill_id: i64,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub kind: SkillKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSkillForReview {
    pub skill_for_review: String,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub kind: SkillKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExperience {
    pub company_name: String,
    pub job_dates: String,
    pub job_title: String,
    pub job_description: String,
    pub user_id: i64,
}

/// Partial experience update; absent fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExperienceChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_dates: Option<String>,
}

impl ExperienceChanges {
    pub fn is_empty(&self) -> bool {
        self.company_name.is_none()
            && self.job_title.is_none()
            && self.job_description.is_none()
            && self.job_dates.is_none()
    }
}

/// Partial profile update sent as the body of `PUT /users/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProfileChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_of_work: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.summary.is_none()
            && self.desired_title.is_none()
            && self.area_of_work.is_none()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Envelopes
// ────────────────────────────────────────────────────────────────────────────

/// Success envelope: every gateway response body is `{"data": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiData<T> {
    pub data: T,
}

/// Failure envelope: `{"mssg": <what failed>, "err": <why>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiFailure {
    pub mssg: String,
    pub err: String,
}

//! Submit plans: what a form wants the gateway to do, as data.
//!
//! A form never issues requests itself. It builds a `SubmitPlan` out of
//! `Intent`s, and `batch::execute_batch` turns the plan into HTTP calls.

use profile_board_common::{
    DeleteUserLocation, DeleteUserSkill, ExperienceChanges, NewExperience, NewLocation,
    NewSkillForReview, NewUserLocations, NewUserSkills, ProfileChanges, SkillKind, SkillRef,
};
use serde::Serialize;

use crate::gateway::ApiRequest;
use crate::ids::EntityId;

/// One gateway operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    UpdateProfile(ProfileChanges),
    AddLocations(Vec<NewLocation>),
    RemoveLocation {
        location_id: i64,
    },
    AddSkills {
        kind: SkillKind,
        skills: Vec<SkillRef>,
    },
    RemoveSkill {
        kind: SkillKind,
        skill_id: i64,
    },
    ReviewSkill {
        kind: SkillKind,
        name: String,
    },
    CreateExperience {
        /// Form entry the record is created for. Not sent.
        entry: EntityId,
        company_name: String,
        job_title: String,
        job_description: String,
        job_dates: String,
    },
    UpdateExperience {
        id: i64,
        changes: ExperienceChanges,
    },
    DeleteExperience {
        id: i64,
    },
}

impl Intent {
    pub fn to_request(&self, user_id: i64) -> Result<ApiRequest, serde_json::Error> {
        let request = match self {
            Intent::UpdateProfile(changes) => {
                ApiRequest::put(format!("/users/{user_id}"), body(changes)?)
            }
            Intent::AddLocations(locations) => ApiRequest::post(
                "/locations/new",
                body(&NewUserLocations {
                    locations: locations.clone(),
                    user_id,
                })?,
            ),
            Intent::RemoveLocation { location_id } => ApiRequest::post(
                "/locations/delete-user-location",
                body(&DeleteUserLocation {
                    location_id: *location_id,
                    user_id,
                })?,
            ),
            Intent::AddSkills { kind, skills } => ApiRequest::post(
                "/skills/new-user-skill",
                body(&NewUserSkills {
                    skills: skills.clone(),
                    user_id,
                    kind: *kind,
                })?,
            ),
            Intent::RemoveSkill { kind, skill_id } => ApiRequest::post(
                "/skills/delete-user-skill",
                body(&DeleteUserSkill {
                    skill_id: *skill_id,
                    user_id,
                    kind: *kind,
                })?,
            ),
            Intent::ReviewSkill { kind, name } => ApiRequest::post(
                "/skills-for-review/new",
                body(&NewSkillForReview {
                    skill_for_review: name.clone(),
                    user_id,
                    kind: *kind,
                })?,
            ),
            Intent::CreateExperience {
                company_name,
                job_title,
                job_description,
                job_dates,
                ..
            } => ApiRequest::post(
                "/extras/new/experience",
                body(&NewExperience {
                    company_name: company_name.clone(),
                    job_dates: job_dates.clone(),
                    job_title: job_title.clone(),
                    job_description: job_description.clone(),
                    user_id,
                })?,
            ),
            Intent::UpdateExperience { id, changes } => {
                ApiRequest::put(format!("/extras/experience/{id}"), body(changes)?)
            }
            Intent::DeleteExperience { id } => {
                ApiRequest::delete(format!("/extras/experience/{id}"))
            }
        };
        Ok(request)
    }
}

fn body<T: Serialize>(value: &T) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(value)
}

/// Ordered intents for one user. Order is the order requests are issued in.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubmitPlan {
    pub user_id: i64,
    pub intents: Vec<Intent>,
}

impl SubmitPlan {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            intents: Vec::new(),
        }
    }

    pub fn push(&mut self, intent: Intent) {
        self.intents.push(intent);
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn requests(&self) -> Result<Vec<ApiRequest>, serde_json::Error> {
        self.intents
            .iter()
            .map(|intent| intent.to_request(self.user_id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Method;
    use serde_json::json;

    #[test]
    fn test_review_intent_targets_review_queue() {
        let request = Intent::ReviewSkill {
            kind: SkillKind::Top,
            name: "Zig".into(),
        }
        .to_request(4)
        .unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path, "/skills-for-review/new");
        assert_eq!(
            request.body,
            Some(json!({"skill_for_review": "Zig", "user_id": 4, "type": "user_top_skills"}))
        );
    }

    #[test]
    fn test_profile_update_is_put_on_user() {
        let request = Intent::UpdateProfile(ProfileChanges {
            summary: Some("Hi".into()),
            ..Default::default()
        })
        .to_request(12)
        .unwrap();
        assert_eq!(request.method, Method::Put);
        assert_eq!(request.path, "/users/12");
        assert_eq!(request.body, Some(json!({"summary": "Hi"})));
    }

    #[test]
    fn test_delete_experience_has_no_body() {
        let request = Intent::DeleteExperience { id: 3 }.to_request(1).unwrap();
        assert_eq!(request.method, Method::Delete);
        assert_eq!(request.path, "/extras/experience/3");
        assert!(request.body.is_none());
    }

    #[test]
    fn test_plan_keeps_intent_order() {
        let mut plan = SubmitPlan::new(2);
        plan.push(Intent::RemoveLocation { location_id: 5 });
        plan.push(Intent::AddLocations(vec![NewLocation {
            name: "Berlin".into(),
        }]));
        let paths: Vec<_> = plan
            .requests()
            .unwrap()
            .into_iter()
            .map(|r| r.path)
            .collect();
        assert_eq!(paths, vec!["/locations/delete-user-location", "/locations/new"]);
    }
}

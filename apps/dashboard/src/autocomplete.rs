//! Typeahead lookups for the skill and location pickers.

use profile_board_common::{AutocompleteQuery, LocationRef, SkillRef};
use serde::de::DeserializeOwned;

use crate::about_you::AboutYouForm;
use crate::delta::Choice;
use crate::gateway::{fetch, ApiRequest, Gateway, GatewayError};

const SKILLS_PATH: &str = "/skills/autocomplete";
const LOCATIONS_PATH: &str = "/api/autocomplete";

/// Skill suggestions for `value`, minus skills already chosen in either set.
///
/// When the gateway knows no matching skill, the typed name itself is offered
/// with a fresh provisional id so it can be sent for review, unless the user
/// already picked it.
pub async fn suggest_skills(
    gateway: &dyn Gateway,
    form: &mut AboutYouForm,
    value: &str,
) -> Result<Vec<Choice>, GatewayError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(Vec::new());
    }
    let chosen = form.chosen_skill_names();

    match lookup::<SkillRef>(gateway, SKILLS_PATH, value).await? {
        Some(skills) => Ok(skills
            .iter()
            .map(Choice::from)
            .filter(|c| !is_chosen(&chosen, &c.name))
            .collect()),
        None if is_chosen(&chosen, value) => Ok(Vec::new()),
        None => Ok(vec![Choice {
            id: form.next_provisional_id(),
            name: value.to_string(),
        }]),
    }
}

/// Location suggestions for `value`, minus locations already chosen. No
/// match means no suggestions.
pub async fn suggest_locations(
    gateway: &dyn Gateway,
    form: &AboutYouForm,
    value: &str,
) -> Result<Vec<Choice>, GatewayError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(Vec::new());
    }
    let chosen = form.chosen_location_names();
    let locations = lookup::<LocationRef>(gateway, LOCATIONS_PATH, value)
        .await?
        .unwrap_or_default();
    Ok(locations
        .iter()
        .map(Choice::from)
        .filter(|c| !is_chosen(&chosen, &c.name))
        .collect())
}

/// `None` when the gateway reports zero results.
async fn lookup<T: DeserializeOwned>(
    gateway: &dyn Gateway,
    path: &str,
    value: &str,
) -> Result<Option<Vec<T>>, GatewayError> {
    let body = serde_json::to_value(AutocompleteQuery {
        value: value.to_string(),
    })?;
    match fetch::<Vec<T>>(gateway, &ApiRequest::post(path, body)).await {
        Ok(items) => Ok(Some(items)),
        Err(e) if e.is_zero_results() => Ok(None),
        Err(e) => Err(e),
    }
}

fn is_chosen(chosen: &[String], name: &str) -> bool {
    chosen.iter().any(|c| c.eq_ignore_ascii_case(name))
}

//! Prompt composition
//!
//! Turns a stored template plus one client's preferences into the final
//! prompt string. Pure functions of their inputs: each job works from its
//! own preference snapshot, never from shared mutable state.

use std::fmt::Write;

use serde_json::Value;

use crate::domain::errors::{PlannerError, PlannerResult};
use crate::domain::preferences::TripPreferences;

/// Fixed closing instruction appended after the preference clauses
const CLOSING_INSTRUCTION: &str = "Please prepare a vacation plan. ";

/// Prefix used when asking the model to rework an answer against the shared
/// general template
const IMPROVE_PREFIX: &str = "Please improve your answer according to: ";

/// Composes the final prompt for a generation job
///
/// Appends the conditional preference clauses to the category template in a
/// fixed order, substitutes the named placeholders, and closes with the
/// shared general template and instruction suffix.
///
/// # Guarantees
/// The returned string contains no unresolved placeholders; a template
/// referencing an unknown placeholder fails with `TemplateMismatch`.
pub fn compose(
    template: &str,
    prefs: &TripPreferences,
    general_template: &str,
    instructions: &str,
) -> PlannerResult<String> {
    let mut text = template.to_string();
    append_preference_clauses(&mut text, prefs);

    let mut prompt = substitute_placeholders(&text, prefs)?;
    prompt.push_str(CLOSING_INSTRUCTION);
    prompt.push_str(IMPROVE_PREFIX);
    prompt.push_str(general_template);
    prompt.push_str(instructions);
    Ok(prompt)
}

/// Builds the prompt that re-submits an existing plan for improvement
pub fn improvement_prompt(plan: &Value, general_template: &str, instructions: &str) -> String {
    format!("{}{}{}{}", plan, IMPROVE_PREFIX, general_template, instructions)
}

/// Appends one clause per supplied optional preference, in a fixed order
fn append_preference_clauses(text: &mut String, prefs: &TripPreferences) {
    if prefs.another_city_checked && !prefs.return_country.is_empty() {
        let _ = write!(
            text,
            "We would like to return from the country {}. \
             When the trip will include travel to this country. ",
            prefs.return_country
        );
    }
    if !prefs.cities.is_empty() {
        let _ = write!(
            text,
            "In {} we would like to travel in the cities {}. ",
            prefs.dest_country,
            prefs.cities.join(", ")
        );
    }
    if let Some(adults) = prefs.adults_amount {
        // the couple category counts per pair
        let amount = if prefs.vacation_type.is_couple() {
            adults * 2
        } else {
            adults
        };
        let _ = write!(text, "We are {} adults. ", amount);
    }
    if let Some(children) = prefs.children_amount {
        let _ = write!(text, "Please includes {} children. ", children);
    }
    if !prefs.car_rental_company.is_empty() {
        let _ = write!(
            text,
            "In addition, notice that {} - for rent a car. ",
            prefs.car_rental_company
        );
    }
    if !prefs.dietary_preferences.is_empty() {
        let _ = write!(
            text,
            "Notice that I have dietary preferences - {}, so take this figure into account \
             when you suggest me recommended restaurants and dishes. ",
            prefs.dietary_preferences
        );
    }
    if !prefs.bars.is_empty() {
        let _ = write!(text, "About bars - {}. ", prefs.bars);
    }
    if !prefs.beach.is_empty() {
        let _ = write!(text, "About beach - {}. ", prefs.beach);
    }
    if !prefs.parking.is_empty() {
        let _ = write!(text, "About parking - {}. ", prefs.parking);
    }
    if !prefs.restaurants.is_empty() {
        let _ = write!(text, "About restaurants - {}. ", prefs.restaurants);
    }
    if !prefs.hotel.is_empty() {
        let _ = write!(text, "About the hotel - {}. ", prefs.hotel);
    }
    for note in &prefs.additional_data {
        let _ = write!(text, "In addition, it is important - {}. ", note);
    }
}

/// Substitutes every `{name}` token with the matching preference field
fn substitute_placeholders(text: &str, prefs: &TripPreferences) -> PlannerResult<String> {
    let values: [(&str, String); 8] = [
        ("ages", prefs.ages.clone()),
        ("date1", prefs.dates[0].to_string()),
        ("date2", prefs.dates[1].to_string()),
        ("from_country", prefs.origin_country.clone()),
        ("to_country", prefs.dest_country.clone()),
        ("budget1", prefs.budget[0].to_string()),
        ("budget2", prefs.budget[1].to_string()),
        ("stars", prefs.stars.map(|s| s.to_string()).unwrap_or_default()),
    ];

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after.find('}').ok_or_else(|| {
            PlannerError::TemplateMismatch("unterminated placeholder".to_string())
        })?;
        let name = &after[..end];
        let value = values
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, value)| value.as_str())
            .ok_or_else(|| {
                PlannerError::TemplateMismatch(format!(
                    "placeholder `{}` is not a known field",
                    name
                ))
            })?;
        out.push_str(value);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Vacation categories with a stored prompt template
///
/// The wire representation matches the category names used by stored
/// templates, e.g. `"Family Vacation"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VacationType {
    #[serde(rename = "Family Vacation")]
    Family,
    #[serde(rename = "Couple Vacation")]
    Couple,
    #[serde(rename = "Solo Vacation")]
    Solo,
    #[serde(rename = "Friends Vacation")]
    Friends,
    #[serde(rename = "Business Vacation")]
    Business,
}

impl VacationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VacationType::Family => "Family Vacation",
            VacationType::Couple => "Couple Vacation",
            VacationType::Solo => "Solo Vacation",
            VacationType::Friends => "Friends Vacation",
            VacationType::Business => "Business Vacation",
        }
    }

    /// The couple category counts the adult figure per pair, so it is
    /// doubled during prompt composition.
    pub fn is_couple(&self) -> bool {
        matches!(self, VacationType::Couple)
    }
}

impl std::fmt::Display for VacationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A client's trip-planning input
///
/// Each generation job carries its own immutable snapshot of this record;
/// it is never shared between jobs.
///
/// # Invariants
/// - `dates` holds exactly the outbound and return date, in non-decreasing order
/// - `budget` holds exactly the lower and upper bound, in non-decreasing order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPreferences {
    pub vacation_type: VacationType,
    pub origin_country: String,
    pub dest_country: String,
    pub dates: [NaiveDate; 2],
    pub ages: String,
    pub budget: [Decimal; 2],
    #[serde(default)]
    pub another_city_checked: bool,
    #[serde(default)]
    pub return_country: String,
    #[serde(default)]
    pub cities: Vec<String>,
    #[serde(default)]
    pub hotel: String,
    #[serde(default)]
    pub stars: Option<u8>,
    #[serde(default)]
    pub parking: String,
    #[serde(default)]
    pub beach: String,
    #[serde(default)]
    pub restaurants: String,
    #[serde(default)]
    pub bars: String,
    #[serde(default)]
    pub car_rental_company: String,
    #[serde(default)]
    pub dietary_preferences: String,
    #[serde(default)]
    pub additional_data: Vec<String>,
    #[serde(default)]
    pub adults_amount: Option<u32>,
    #[serde(default)]
    pub children_amount: Option<u32>,
}

impl TripPreferences {
    /// Checks the range invariants that deserialization cannot express
    ///
    /// # Returns
    /// * `Ok(())` - If both ranges are in non-decreasing order
    /// * `Err(String)` - Naming the offending range
    pub fn validate(&self) -> Result<(), String> {
        if self.dates[0] > self.dates[1] {
            return Err("dates must be in non-decreasing order".to_string());
        }
        if self.budget[0] > self.budget[1] {
            return Err("budget bounds must be in non-decreasing order".to_string());
        }
        Ok(())
    }
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use validator::Validate;

/// Caller-supplied constraints narrowing a facility search
///
/// `Default` means "no constraints". The serialized form is stable (fields in
/// declaration order, sets sorted) and is used as part of the cache key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFilters {
    #[serde(rename = "type")]
    pub facility_type: Option<String>,
    #[validate(range(min = 0.0))]
    pub max_distance_km: Option<f64>,
    pub emergency_only: bool,
    #[serde(rename = "hours24")]
    pub hours_24: bool,
    pub insurance: BTreeSet<String>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub min_rating: Option<f64>,
    pub search_query: Option<String>,
    pub specialties: BTreeSet<String>,
}

impl SearchFilters {
    /// Facility type constraint, ignoring blank values and the `all` sentinel
    pub fn active_type(&self) -> Option<&str> {
        self.facility_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty() && !t.eq_ignore_ascii_case("all"))
    }

    pub fn active_max_distance(&self) -> Option<f64> {
        self.max_distance_km.filter(|d| *d > 0.0)
    }

    pub fn active_min_rating(&self) -> Option<f64> {
        self.min_rating.filter(|r| *r > 0.0)
    }

    pub fn active_query(&self) -> Option<&str> {
        self.search_query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}

/// Latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Parse a `"lat,lng"` location string
    ///
    /// Returns `None` for anything that isn't two finite numbers within valid
    /// latitude/longitude ranges.
    pub fn parse(location: &str) -> Option<Self> {
        let mut parts = location.split(',');
        let lat: f64 = parts.next()?.trim().parse().ok()?;
        let lng: f64 = parts.next()?.trim().parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return None;
        }
        Some(Self { lat, lng })
    }
}

/// One healthcare provider location
///
/// Upstream records name the distance field `distance` and may carry it as a
/// number or as a string with units; it is normalized to kilometers on the
/// way in and serialized as `distanceKm`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthcareFacility {
    pub name: String,
    #[serde(rename = "type")]
    pub facility_type: String,
    #[serde(default)]
    pub address: String,
    #[serde(
        rename(serialize = "distanceKm", deserialize = "distance"),
        alias = "distanceKm",
        default,
        deserialize_with = "crate::core::distance::deserialize_distance_km"
    )]
    pub distance_km: Option<f64>,
    #[serde(default, deserialize_with = "crate::core::parser::deserialize_rating")]
    pub rating: f64,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub hours: String,
    #[serde(default)]
    pub services: Vec<String>,
    pub coordinates: Coordinates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(
        rename(serialize = "reviewCount", deserialize = "reviews"),
        alias = "reviewCount",
        default,
        deserialize_with = "crate::core::parser::deserialize_review_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub review_count: Option<u32>,
}

impl HealthcareFacility {
    /// Helper to get the emergency flag, defaulting to false
    pub fn has_emergency(&self) -> bool {
        self.emergency.unwrap_or(false)
    }
}

/// Where a search result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    Live,
    Fallback,
}

/// Facility search result envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub facilities: Vec<HealthcareFacility>,
    pub source: ResultSource,
    pub cached: bool,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

impl SearchResult {
    pub fn live(facilities: Vec<HealthcareFacility>) -> Self {
        Self {
            facilities,
            source: ResultSource::Live,
            cached: false,
            generated_at: chrono::Utc::now(),
        }
    }

    pub fn fallback(facilities: Vec<HealthcareFacility>) -> Self {
        Self {
            facilities,
            source: ResultSource::Fallback,
            cached: false,
            generated_at: chrono::Utc::now(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == ResultSource::Fallback
    }
}

/// Patient history section of a symptom analysis request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MedicalHistory {
    pub conditions: Vec<String>,
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
    pub surgeries: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Lifestyle {
    pub smoking: bool,
    pub alcohol: String,
    pub exercise: String,
    pub diet: String,
    pub stress: String,
    pub sleep: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Probability {
    High,
    Moderate,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UrgencyLevel {
    Emergency,
    Urgent,
    Soon,
    Routine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PossibleCondition {
    pub condition: String,
    pub probability: Probability,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub reasoning: Vec<String>,
    #[serde(default)]
    pub common_symptoms: Vec<String>,
    #[serde(default)]
    pub risk_factors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_tests: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Urgency {
    pub level: UrgencyLevel,
    #[serde(default)]
    pub reasoning: Vec<String>,
    #[serde(default)]
    pub timeframe: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifestyleImpact {
    pub factor: String,
    #[serde(default)]
    pub impact: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationConsideration {
    #[serde(rename = "type")]
    pub medication_type: String,
    #[serde(default)]
    pub warning: String,
    #[serde(default)]
    pub recommendation: String,
}

/// Structured assessment returned by symptom analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub conditions: Vec<PossibleCondition>,
    pub urgency_level: Urgency,
    #[serde(default)]
    pub lifestyle_impact: Vec<LifestyleImpact>,
    #[serde(default)]
    pub medication_considerations: Vec<MedicationConsideration>,
    #[serde(default)]
    pub preventive_measures: Vec<String>,
    #[serde(default)]
    pub follow_up_recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialist_referrals: Option<Vec<String>>,
    #[serde(default)]
    pub red_flags: Vec<String>,
    #[serde(default)]
    pub disclaimer: String,
}

/// Who said a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    #[serde(alias = "bot")]
    Assistant,
}

/// One earlier turn of a chat conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// Assistant answer plus whether it points the user at emergency care
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    pub emergency: bool,
}

use crate::models::{HealthcareFacility, SearchFilters};

/// Check if a facility satisfies the structural filters
///
/// Structural filters are the ones that can be evaluated against local data
/// without asking the provider: facility type, emergency-only and minimum
/// rating. Applied to fallback data so degraded results still honor them.
#[inline]
pub fn matches_structural(facility: &HealthcareFacility, filters: &SearchFilters) -> bool {
    // Type match is a case-insensitive substring test ("urgent" matches "Urgent Care")
    if let Some(wanted) = filters.active_type() {
        let wanted = wanted.to_lowercase();
        if !facility.facility_type.to_lowercase().contains(&wanted) {
            return false;
        }
    }

    if filters.emergency_only && !facility.has_emergency() {
        return false;
    }

    if let Some(min_rating) = filters.active_min_rating() {
        if facility.rating < min_rating {
            return false;
        }
    }

    true
}

/// Check if a facility lies within the requested maximum distance
///
/// Facilities with an unknown distance are kept.
#[inline]
pub fn within_max_distance(facility: &HealthcareFacility, filters: &SearchFilters) -> bool {
    match (filters.active_max_distance(), facility.distance_km) {
        (Some(max), Some(distance)) => distance <= max,
        _ => true,
    }
}

use crate::core::distance::{haversine_km, offset_km};
use crate::core::filters::{matches_structural, within_max_distance};
use crate::models::{Coordinates, HealthcareFacility, SearchFilters};

/// Origin used when the location is not a coordinate pair (lower Manhattan)
pub const DEFAULT_ORIGIN: Coordinates = Coordinates { lat: 40.7128, lng: -74.0060 };

/// Static facility record, positioned relative to the search origin
struct FallbackTemplate {
    name: &'static str,
    facility_type: &'static str,
    street: &'static str,
    north_km: f64,
    east_km: f64,
    rating: f64,
    phone: &'static str,
    hours: &'static str,
    open_24h: bool,
    services: &'static [&'static str],
    description: &'static str,
    emergency: bool,
    insurance: &'static [&'static str],
    website: &'static str,
    reviews: u32,
}

const CATALOG: &[FallbackTemplate] = &[
    FallbackTemplate {
        name: "City General Hospital",
        facility_type: "Hospital",
        street: "123 Healthcare Ave",
        north_km: 1.2,
        east_km: 1.4,
        rating: 4.5,
        phone: "(555) 123-4567",
        hours: "8:00 AM - 8:00 PM",
        open_24h: true,
        services: &["Emergency Care", "Surgery", "General Medicine"],
        description: "Full-service hospital with comprehensive care",
        emergency: true,
        insurance: &["Medicare", "Medicaid", "Private Insurance"],
        website: "https://citygeneralhospital.com",
        reviews: 524,
    },
    FallbackTemplate {
        name: "Riverside Urgent Care",
        facility_type: "Urgent Care",
        street: "48 River Rd",
        north_km: -0.8,
        east_km: 0.6,
        rating: 4.2,
        phone: "(555) 234-5678",
        hours: "7:00 AM - 11:00 PM",
        open_24h: false,
        services: &["Walk-in Care", "X-Ray", "Minor Injuries"],
        description: "Walk-in urgent care for non-life-threatening conditions",
        emergency: false,
        insurance: &["Medicare", "Private Insurance"],
        website: "https://riversideurgentcare.com",
        reviews: 212,
    },
    FallbackTemplate {
        name: "Community Health Clinic",
        facility_type: "Clinic",
        street: "9 Elm St",
        north_km: 0.5,
        east_km: -0.9,
        rating: 3.9,
        phone: "(555) 345-6789",
        hours: "9:00 AM - 5:00 PM",
        open_24h: false,
        services: &["Primary Care", "Vaccinations", "Preventive Care"],
        description: "Sliding-scale primary care for the neighborhood",
        emergency: false,
        insurance: &["Medicaid", "Private Insurance"],
        website: "https://communityhealthclinic.org",
        reviews: 98,
    },
    FallbackTemplate {
        name: "St. Mary's Medical Center",
        facility_type: "Hospital",
        street: "700 Cathedral Blvd",
        north_km: 3.1,
        east_km: -2.2,
        rating: 4.7,
        phone: "(555) 456-7890",
        hours: "24/7",
        open_24h: true,
        services: &["Emergency Care", "Cardiology", "Maternity", "Pediatrics"],
        description: "Regional medical center with a level II trauma unit",
        emergency: true,
        insurance: &["Medicare", "Medicaid", "Private Insurance"],
        website: "https://stmarysmedical.org",
        reviews: 1310,
    },
    FallbackTemplate {
        name: "Main Street Pharmacy",
        facility_type: "Pharmacy",
        street: "215 Main St",
        north_km: 0.3,
        east_km: 0.2,
        rating: 4.0,
        phone: "(555) 567-8901",
        hours: "8:00 AM - 10:00 PM",
        open_24h: false,
        services: &["Prescriptions", "Vaccinations", "Health Screenings"],
        description: "Neighborhood pharmacy with a walk-in vaccination desk",
        emergency: false,
        insurance: &["Medicare", "Private Insurance"],
        website: "https://mainstreetpharmacy.com",
        reviews: 76,
    },
    FallbackTemplate {
        name: "Harbor Behavioral Health",
        facility_type: "Mental Health Center",
        street: "31 Harbor View",
        north_km: -2.4,
        east_km: -1.7,
        rating: 4.4,
        phone: "(555) 678-9012",
        hours: "8:00 AM - 7:00 PM",
        open_24h: false,
        services: &["Counseling", "Psychiatry", "Crisis Support"],
        description: "Outpatient mental health services and crisis counseling",
        emergency: false,
        insurance: &["Medicaid", "Private Insurance"],
        website: "https://harborbehavioral.org",
        reviews: 143,
    },
];

/// Build the fallback result set for a search
///
/// Applies the caller's structural filters (type, emergency-only, minimum
/// rating) and maximum distance, sorts by distance and keeps at most `limit`
/// entries. May be empty when the filters exclude the whole catalog.
pub fn fallback_facilities(
    location: &str,
    filters: &SearchFilters,
    limit: usize,
) -> Vec<HealthcareFacility> {
    let parsed_origin = Coordinates::parse(location);
    let origin = parsed_origin.unwrap_or(DEFAULT_ORIGIN);

    // Free-text locations get their first segment appended to the street
    let locality = match parsed_origin {
        Some(_) => None,
        None => location
            .split(',')
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty()),
    };

    let mut facilities: Vec<HealthcareFacility> = CATALOG
        .iter()
        .map(|template| build_facility(template, origin, locality, filters))
        .filter(|facility| matches_structural(facility, filters))
        .filter(|facility| within_max_distance(facility, filters))
        .collect();

    facilities.sort_by(|a, b| {
        a.distance_km
            .partial_cmp(&b.distance_km)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    facilities.truncate(limit);

    facilities
}

fn build_facility(
    template: &FallbackTemplate,
    origin: Coordinates,
    locality: Option<&str>,
    filters: &SearchFilters,
) -> HealthcareFacility {
    let coordinates = offset_km(origin, template.north_km, template.east_km);

    let address = match locality {
        Some(locality) => format!("{}, {}", template.street, locality),
        None => template.street.to_string(),
    };

    let hours = if filters.hours_24 && template.open_24h {
        "24/7".to_string()
    } else {
        template.hours.to_string()
    };

    let insurance = if filters.insurance.is_empty() {
        template.insurance.iter().map(|s| s.to_string()).collect()
    } else {
        filters.insurance.iter().cloned().collect()
    };

    HealthcareFacility {
        name: template.name.to_string(),
        facility_type: template.facility_type.to_string(),
        address,
        distance_km: Some(haversine_km(origin, coordinates)),
        rating: template.rating,
        phone: template.phone.to_string(),
        hours,
        services: template.services.iter().map(|s| s.to_string()).collect(),
        coordinates,
        description: Some(template.description.to_string()),
        emergency: Some(template.emergency),
        insurance: Some(insurance),
        website: Some(template.website.to_string()),
        review_count: Some(template.reviews),
    }
}

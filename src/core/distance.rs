use crate::models::Coordinates;
use geo::{HaversineDistance, Point};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// Kilometers per statute mile
const KM_PER_MILE: f64 = 1.609_344;

/// Calculate the Haversine distance between two coordinates in kilometers
#[inline]
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    // geo points are (x = longitude, y = latitude)
    let a = Point::new(from.lng, from.lat);
    let b = Point::new(to.lng, to.lat);
    a.haversine_distance(&b) / 1000.0
}

/// Offset a point by the given distances north and east, in kilometers
///
/// 1° latitude ≈ 111km, 1° longitude ≈ 111km * cos(latitude). Good enough for
/// the short hops used to place nearby facilities.
pub fn offset_km(origin: Coordinates, north_km: f64, east_km: f64) -> Coordinates {
    let lat = origin.lat + north_km / 111.0;
    let cos_lat = origin.lat.to_radians().cos().abs().max(0.01);
    let lng = origin.lng + east_km / (111.0 * cos_lat);
    Coordinates::new(lat, lng)
}

/// Parse a free-form distance into kilometers
///
/// Accepts strings such as `"1.2 miles"`, `"3 km from provided location"`,
/// `"800 m"` or a bare `"2.5"`. Bare numbers are taken as kilometers.
pub fn parse_distance_km(text: &str) -> Option<f64> {
    let text = text.trim();
    let number_end = text
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || *c == '.' || (*i == 0 && *c == '-')))
        .map(|(i, _)| i)
        .unwrap_or(text.len());

    let value: f64 = text[..number_end].parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }

    // Ranges, thousands separators and bracketed units are not trusted
    let rest = text[number_end..].trim_start();
    if rest.chars().next().is_some_and(|c| !c.is_ascii_alphabetic()) {
        return None;
    }

    let unit = rest
        .split(|c: char| !c.is_ascii_alphabetic())
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();

    let km = match unit.as_str() {
        "" | "km" | "kms" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => value,
        "mi" | "mile" | "miles" => value * KM_PER_MILE,
        "m" | "meter" | "meters" | "metre" | "metres" => value / 1000.0,
        _ => return None,
    };

    Some(km)
}

/// Deserialize a distance that may arrive as a number or a string with units
pub fn deserialize_distance_km<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDistance {
        Number(f64),
        Text(String),
        Other(IgnoredAny),
    }

    let raw = Option::<RawDistance>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawDistance::Number(n)) if n.is_finite() && n >= 0.0 => Some(n),
        Some(RawDistance::Text(s)) => parse_distance_km(&s),
        _ => None,
    })
}

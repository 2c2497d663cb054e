// Core logic exports
pub mod distance;
pub mod fallback;
pub mod filters;
pub mod parser;
pub mod prompt;

pub use distance::{haversine_km, offset_km, parse_distance_km};
pub use fallback::fallback_facilities;
pub use filters::{matches_structural, within_max_distance};
pub use parser::{clean_response, parse_facilities, parse_object, ParseError};
pub use prompt::{analysis_prompt, chat_prompt, facility_prompt, FACILITIES_PER_RESPONSE};

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

/// Builds the tee-time search page URL for a facility.
///
/// The id is percent-encoded so a malformed id cannot escape its path segment.
#[must_use]
pub fn facility_url(host: &str, facility_id: &str) -> String {
    let id = utf8_percent_encode(facility_id, NON_ALPHANUMERIC);
    format!("https://{host}/tee-times/facility/{id}/search")
}

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime};
use regex::Regex;

use super::extract::RawListing;
use crate::db::ListingRow;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$([0-9]*)").unwrap());
static LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\((.*)\)").unwrap());
static BEDROOMS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9]*)br").unwrap());
static SIZE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9]*)ft2").unwrap());
static LATITUDE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@([0-9.-]*),").unwrap());
static LONGITUDE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",([0-9.-]*),").unwrap());

/// Group 1 of `re` applied to `field`. None when the field is absent or the
/// pattern does not match; a matched-but-empty group stays Some("") so the
/// two cases remain distinguishable.
fn capture_first(field: Option<&str>, re: &Regex) -> Option<String> {
    let value = field?;
    let caps = re.captures(value)?;
    caps.get(1).map(|m| m.as_str().to_string())
}

fn to_json_array(values: Option<&[String]>) -> String {
    match values {
        Some(v) => serde_json::to_string(v).unwrap_or_else(|_| "[]".to_string()),
        None => "[]".to_string(),
    }
}

/// Reformat a source timestamp to `YYYY-MM-DD HH:mm:ss`. Offset-carrying
/// inputs keep their source offset (the wall-clock time as posted); naive
/// inputs are formatted as given. Unparseable input degrades to None.
fn format_date_posted(datetime: &str) -> Option<String> {
    let s = datetime.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.format(DATE_FORMAT).to_string());
    }
    // Postings carry offsets without a colon, e.g. 2019-11-21T09:15:03-0500
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.format(DATE_FORMAT).to_string());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.format(DATE_FORMAT).to_string());
        }
    }
    None
}

/// Raw page fields → normalized row. Pure; absent or malformed input
/// degrades to None / 0 / "[]", never an error.
pub fn transform(raw: &RawListing) -> ListingRow {
    ListingRow {
        title: raw.title.clone(),
        price: capture_first(raw.price.as_deref(), &PRICE_RE)
            .and_then(|digits| digits.parse().ok())
            .unwrap_or(0),
        location: capture_first(raw.location.as_deref(), &LOCATION_RE),
        bedroom_count: capture_first(raw.housing.as_deref(), &BEDROOMS_RE),
        size: capture_first(raw.housing.as_deref(), &SIZE_RE),
        date_posted: raw.datetime.as_deref().and_then(format_date_posted),
        attributes: to_json_array(raw.attributes.as_deref()),
        images: to_json_array(raw.images.as_deref()),
        description: raw.description.clone(),
        latitude: capture_first(raw.google_maps_link.as_deref(), &LATITUDE_RE),
        longitude: capture_first(raw.google_maps_link.as_deref(), &LONGITUDE_RE),
    }
}

//! Domain resources decoded from upstream responses
//!
//! Only the fields the access layer reasons about are typed; everything else
//! the upstream sends is kept in `extra` and passed through untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_code: String,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub product_status: Option<String>,
    #[serde(default)]
    pub product_description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub site_code: String,
    #[serde(default)]
    pub site_name: Option<String>,
    #[serde(default)]
    pub site_type: Option<String>,
    #[serde(default)]
    pub domain_code: Option<String>,
    #[serde(default)]
    pub state_code: Option<String>,
    #[serde(default)]
    pub site_latitude: Option<f64>,
    #[serde(default)]
    pub site_longitude: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A named location: a site, plot, tower, or any other registered structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub location_name: String,
    #[serde(default)]
    pub location_description: Option<String>,
    /// Inconsistently populated across the catalog
    #[serde(default)]
    pub location_type: Option<String>,
    #[serde(default)]
    pub site_code: Option<String>,
    #[serde(default)]
    pub domain_code: Option<String>,
    #[serde(default)]
    pub location_decimal_latitude: Option<f64>,
    #[serde(default)]
    pub location_decimal_longitude: Option<f64>,
    #[serde(default)]
    pub location_elevation: Option<f64>,
    #[serde(default)]
    pub location_parent: Option<String>,
    #[serde(default)]
    pub location_children: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Location {
    /// Whether the location belongs to `site` (case insensitive).
    pub fn belongs_to(&self, site: &str) -> bool {
        self.site_code
            .as_deref()
            .is_some_and(|code| code.eq_ignore_ascii_case(site))
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.location_decimal_latitude
            .zip(self.location_decimal_longitude)
    }
}

/// A location with its children expanded to a bounded depth.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationNode {
    pub location: Location,
    pub children: Vec<LocationNode>,
    /// Set when children were left out because of the per-node cap
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomyEntry {
    #[serde(rename = "taxonID", default)]
    pub taxon_id: Option<String>,
    #[serde(default)]
    pub scientific_name: Option<String>,
    #[serde(default)]
    pub taxon_rank: Option<String>,
    #[serde(default)]
    pub vernacular_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleView {
    #[serde(default)]
    pub sample_uuid: Option<String>,
    #[serde(default)]
    pub sample_tag: Option<String>,
    #[serde(default)]
    pub sample_class: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result of a sample lookup, including its chain of custody.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    #[serde(default)]
    pub sample_views: Vec<SampleView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    pub release: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub generation_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataFile {
    pub name: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub md5: Option<String>,
    /// Signed and time limited
    pub url: String,
}

/// Files published for one product, site, and month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFiles {
    #[serde(default)]
    pub product_code: Option<String>,
    #[serde(default)]
    pub site_code: Option<String>,
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub release: Option<String>,
    #[serde(default)]
    pub files: Vec<DataFile>,
}

/// Metadata for a downloadable file, obtained without transferring it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadDescriptor {
    pub url: String,
    pub size: Option<u64>,
    pub checksum: Option<String>,
    pub content_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_decodes_and_keeps_extra_fields() {
        let raw = r#"{
            "locationName": "TOWER104454",
            "locationDescription": "Santa Rita Tower",
            "locationType": "TOWER",
            "siteCode": "SRER",
            "locationDecimalLatitude": 31.91068,
            "locationDecimalLongitude": -110.83549,
            "locationChildren": ["TOWER104454.1"],
            "locationProperties": [{"locationPropertyName": "Value for Site type"}]
        }"#;

        let location: Location = serde_json::from_str(raw).unwrap();

        assert!(location.belongs_to("srer"));
        assert!(!location.belongs_to("HARV"));
        assert_eq!(location.coordinates(), Some((31.91068, -110.83549)));
        assert!(location.extra.contains_key("locationProperties"));

        let back = serde_json::to_value(&location).unwrap();
        assert_eq!(back["locationName"], "TOWER104454");
        assert!(back.get("locationProperties").is_some());
    }

    #[test]
    fn test_location_without_site_belongs_nowhere() {
        let location: Location = serde_json::from_str(r#"{"locationName": "X"}"#).unwrap();
        assert!(!location.belongs_to("SRER"));
        assert!(location.location_children.is_empty());
    }

    #[test]
    fn test_release_generation_date() {
        let release: Release = serde_json::from_str(
            r#"{"release": "RELEASE-2024", "generationDate": "2024-01-26T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(release.generation_date.unwrap().to_rfc3339(), "2024-01-26T00:00:00+00:00");
    }
}

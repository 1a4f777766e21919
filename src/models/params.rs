//! Parameter objects accepted by the client operations

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::client::Params;

// == Site Selector ==
/// Which sites a data query covers.
///
/// Transport follows the variant, not the number of codes: a `Multiple`
/// holding a single site is still sent as a multi-site query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SiteSelector {
    All,
    Single(String),
    Multiple(Vec<String>),
}

impl SiteSelector {
    /// Picks the variant from a list of codes: more than one is `Multiple`.
    pub fn from_codes(mut codes: Vec<String>) -> Self {
        match codes.len() {
            0 => SiteSelector::All,
            1 => SiteSelector::Single(codes.remove(0)),
            _ => SiteSelector::Multiple(codes),
        }
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, SiteSelector::Multiple(_))
    }

    pub fn codes(&self) -> Vec<&str> {
        match self {
            SiteSelector::All => Vec::new(),
            SiteSelector::Single(code) => vec![code.as_str()],
            SiteSelector::Multiple(codes) => codes.iter().map(String::as_str).collect(),
        }
    }
}

// == Data Query ==
/// Data availability query for one product over a month range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataQuery {
    pub product_code: String,
    pub sites: SiteSelector,
    /// `YYYY-MM`
    pub start_date_month: Option<String>,
    /// `YYYY-MM`
    pub end_date_month: Option<String>,
    pub release: Option<String>,
    pub include_provisional: Option<bool>,
    pub package: Option<String>,
}

impl DataQuery {
    pub fn new(product_code: impl Into<String>, sites: SiteSelector) -> Self {
        Self {
            product_code: product_code.into(),
            sites,
            start_date_month: None,
            end_date_month: None,
            release: None,
            include_provisional: None,
            package: None,
        }
    }

    /// Builds a query whose transport is chosen by site count.
    pub fn for_sites(product_code: impl Into<String>, sites: Vec<String>) -> Self {
        Self::new(product_code, SiteSelector::from_codes(sites))
    }

    pub fn months(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_date_month = Some(start.into());
        self.end_date_month = Some(end.into());
        self
    }

    pub fn to_params(&self) -> Params {
        Params::new()
            .with("productCode", &self.product_code)
            .with_all("siteCode", self.sites.codes())
            .with_opt("startDateMonth", self.start_date_month.as_ref())
            .with_opt("endDateMonth", self.end_date_month.as_ref())
            .with_opt("release", self.release.as_ref())
            .with_opt("includeProvisional", self.include_provisional)
            .with_opt("package", self.package.as_ref())
    }

    /// JSON body for the multi-site form of the query.
    pub fn to_body(&self) -> Value {
        let mut body = json!({
            "productCode": self.product_code,
            "siteCodes": self.sites.codes(),
        });
        let optional = [
            ("startDateMonth", self.start_date_month.clone().map(Value::from)),
            ("endDateMonth", self.end_date_month.clone().map(Value::from)),
            ("release", self.release.clone().map(Value::from)),
            ("includeProvisional", self.include_provisional.map(Value::from)),
            ("package", self.package.clone().map(Value::from)),
        ];
        if let Some(map) = body.as_object_mut() {
            for (name, value) in optional {
                if let Some(value) = value {
                    map.insert(name.to_string(), value);
                }
            }
        }
        body
    }
}

// == Location Options ==
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct LocationOptions {
    /// Include parent and child names
    #[serde(default)]
    pub hierarchy: bool,
    /// Include the location's history of positions
    #[serde(default)]
    pub history: bool,
}

impl LocationOptions {
    pub fn to_params(&self) -> Params {
        Params::new()
            .with_flag("hierarchy", self.hierarchy)
            .with_flag("history", self.history)
    }
}

// == Taxonomy Query ==
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomyQuery {
    /// e.g. `BIRD`, `PLANT`, `SMALL_MAMMAL`
    pub taxon_type_code: Option<String>,
    pub scientific_name: Option<String>,
    pub family: Option<String>,
    pub genus: Option<String>,
    pub verbose: Option<bool>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl TaxonomyQuery {
    pub fn to_params(&self) -> Params {
        Params::new()
            .with_opt("taxonTypeCode", self.taxon_type_code.as_ref())
            .with_opt("scientificname", self.scientific_name.as_ref())
            .with_opt("family", self.family.as_ref())
            .with_opt("genus", self.genus.as_ref())
            .with_opt("verbose", self.verbose)
            .with_opt("limit", self.limit)
            .with_opt("offset", self.offset)
    }
}

// == Sample Query ==
/// Identifies a sample by uuid, barcode, or tag plus class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleQuery {
    pub sample_uuid: Option<String>,
    pub barcode: Option<String>,
    pub sample_tag: Option<String>,
    pub sample_class: Option<String>,
    pub archive_guid: Option<String>,
}

impl SampleQuery {
    pub fn to_params(&self) -> Params {
        Params::new()
            .with_opt("sampleUuid", self.sample_uuid.as_ref())
            .with_opt("barcode", self.barcode.as_ref())
            .with_opt("sampleTag", self.sample_tag.as_ref())
            .with_opt("sampleClass", self.sample_class.as_ref())
            .with_opt("archiveGuid", self.archive_guid.as_ref())
    }
}

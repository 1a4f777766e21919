//! Request DTOs for the gateway HTTP surface
//!
//! Shapes accepted from tool-calling clients, converted into the parameter
//! objects the client operations take.

use serde::Deserialize;

use crate::models::params::{DataQuery, SiteSelector};

/// Query string for `GET /data/query`; `sites` is comma separated.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQueryRequest {
    pub product_code: String,
    pub sites: Option<String>,
    pub start_date_month: Option<String>,
    pub end_date_month: Option<String>,
    pub release: Option<String>,
    pub include_provisional: Option<bool>,
    pub package: Option<String>,
}

impl DataQueryRequest {
    /// Site codes from the comma separated list, upper-cased.
    pub fn site_codes(&self) -> Vec<String> {
        self.sites
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(|code| code.trim().to_uppercase())
            .filter(|code| !code.is_empty())
            .collect()
    }

    pub fn into_query(self) -> DataQuery {
        let sites = SiteSelector::from_codes(self.site_codes());
        DataQuery {
            product_code: self.product_code,
            sites,
            start_date_month: self.start_date_month,
            end_date_month: self.end_date_month,
            release: self.release,
            include_provisional: self.include_provisional,
            package: self.package,
        }
    }
}

/// JSON body for `POST /data/query`. Always a multi-site query.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiSiteQueryRequest {
    pub product_code: String,
    pub site_codes: Vec<String>,
    pub start_date_month: Option<String>,
    pub end_date_month: Option<String>,
    pub release: Option<String>,
    pub include_provisional: Option<bool>,
    pub package: Option<String>,
}

impl MultiSiteQueryRequest {
    pub fn into_query(self) -> DataQuery {
        DataQuery {
            product_code: self.product_code,
            sites: SiteSelector::Multiple(self.site_codes),
            start_date_month: self.start_date_month,
            end_date_month: self.end_date_month,
            release: self.release,
            include_provisional: self.include_provisional,
            package: self.package,
        }
    }
}

/// Query string for `GET /locations/:name/tree`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TreeRequest {
    pub depth: Option<usize>,
}

/// Query string for `GET /download`.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadRequest {
    pub url: String,
}

/// Query string for `GET /structures`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StructureRequest {
    /// Omit to search across sites
    pub site: Option<String>,
}

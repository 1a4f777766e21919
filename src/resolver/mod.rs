//! Location Resolver
//!
//! Finds structures of a given kind at a site when the upstream hierarchy
//! cannot be relied on. Strategies run in order and stop at the first one
//! that finds something:
//!
//! 1. Known identifier for the site, accepted only if its site matches
//! 2. Filter of the full site-location catalog
//! 3. Guessed identifiers, each accepted only if its site matches
//!
//! "Not found" is an empty `Vec`, never an error. Guessing is best effort:
//! an empty result does not prove the structure is absent.

mod kind;

pub use kind::StructureKind;

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::client::NeonClient;
use crate::config::Config;
use crate::models::{Location, LocationOptions};

/// Sites scanned by default when no site is given.
pub const DEFAULT_CROSS_SITE_CAP: usize = 10;

// == Location Resolver ==
#[derive(Debug, Clone)]
pub struct LocationResolver {
    client: Arc<NeonClient>,
    towers: StructureKind,
    cross_site_cap: usize,
}

impl LocationResolver {
    pub fn new(client: Arc<NeonClient>, towers: StructureKind) -> Self {
        Self {
            client,
            towers,
            cross_site_cap: DEFAULT_CROSS_SITE_CAP,
        }
    }

    pub fn from_config(client: Arc<NeonClient>, config: &Config) -> Self {
        let towers = StructureKind::tower()
            .with_known(config.known_structures.clone())
            .with_recurring(config.recurring_structures.clone());
        Self::new(client, towers).with_cross_site_cap(config.cross_site_cap)
    }

    pub fn with_cross_site_cap(mut self, cap: usize) -> Self {
        self.cross_site_cap = cap;
        self
    }

    /// Finds tower structures at `site`, or across the first sites of the
    /// catalog when `site` is `None` or blank.
    pub async fn find_towers(&self, site: Option<&str>) -> Vec<Location> {
        self.find_structures(site, &self.towers).await
    }

    pub async fn find_structures(&self, site: Option<&str>, kind: &StructureKind) -> Vec<Location> {
        match site.map(str::trim).filter(|site| !site.is_empty()) {
            Some(site) => self.find_at_site(&site.to_uppercase(), kind).await,
            None => self.find_across_sites(kind).await,
        }
    }

    async fn find_at_site(&self, site: &str, kind: &StructureKind) -> Vec<Location> {
        if let Some(found) = self.known_lookup(site, kind).await {
            info!(site, structure = %found.location_name, "resolved from known identifier");
            return vec![found];
        }

        let catalog = match self.client.list_site_locations().await {
            Ok(catalog) => catalog,
            Err(e) => {
                error!(site, "location catalog unavailable, giving up: {}", e);
                return Vec::new();
            }
        };

        let sites = HashSet::from([site.to_string()]);
        let filtered = filter_catalog(catalog, &sites, kind);
        if !filtered.is_empty() {
            info!(site, count = filtered.len(), "resolved from location catalog");
            return filtered;
        }

        let guessed = self.guess_lookup(site, kind).await;
        if guessed.is_empty() {
            info!(site, kind = %kind.type_tag, "no structures found");
        } else {
            info!(site, count = guessed.len(), "resolved from guessed identifiers");
        }
        guessed
    }

    /// Catalog filter over the first `cross_site_cap` sites only.
    async fn find_across_sites(&self, kind: &StructureKind) -> Vec<Location> {
        let sites: HashSet<String> = match self.client.list_sites().await {
            Ok(sites) => sites
                .into_iter()
                .take(self.cross_site_cap)
                .map(|site| site.site_code.to_uppercase())
                .collect(),
            Err(e) => {
                error!("site list unavailable, giving up: {}", e);
                return Vec::new();
            }
        };

        match self.client.list_site_locations().await {
            Ok(catalog) => filter_catalog(catalog, &sites, kind),
            Err(e) => {
                error!("location catalog unavailable, giving up: {}", e);
                Vec::new()
            }
        }
    }

    async fn known_lookup(&self, site: &str, kind: &StructureKind) -> Option<Location> {
        let id = kind.known_for(site)?;
        match self.client.get_location(id, LocationOptions::default()).await {
            Ok(location) if location.belongs_to(site) => Some(location),
            Ok(location) => {
                debug!(
                    site,
                    id,
                    actual = location.site_code.as_deref().unwrap_or("none"),
                    "known identifier belongs to another site"
                );
                None
            }
            Err(e) => {
                debug!(site, id, "known identifier lookup failed: {}", e);
                None
            }
        }
    }

    /// Tries each guessed identifier in turn. A failed lookup only rules out
    /// that guess.
    async fn guess_lookup(&self, site: &str, kind: &StructureKind) -> Vec<Location> {
        let mut found: Vec<Location> = Vec::new();

        for id in kind.guesses(site) {
            match self.client.get_location(&id, LocationOptions::default()).await {
                Ok(location) if location.belongs_to(site) => {
                    if !found.iter().any(|l| l.location_name == location.location_name) {
                        found.push(location);
                    }
                }
                Ok(_) => debug!(site, id = %id, "guessed identifier belongs to another site"),
                Err(e) => debug!(site, id = %id, "guessed identifier not found: {}", e),
            }
        }
        found
    }
}

/// Keeps catalog entries in one of `sites` that look like `kind`.
fn filter_catalog(catalog: Vec<Location>, sites: &HashSet<String>, kind: &StructureKind) -> Vec<Location> {
    catalog
        .into_iter()
        .filter(|location| {
            location
                .site_code
                .as_deref()
                .is_some_and(|code| sites.contains(&code.to_uppercase()))
        })
        .filter(|location| kind.matches(location))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_catalog_requires_site_and_signal() {
        let catalog: Vec<Location> = serde_json::from_value(json!([
            {"locationName": "TOWER104454", "siteCode": "SRER", "locationType": "TOWER"},
            {"locationName": "SRER_PLOT_1", "siteCode": "SRER", "locationType": "PLOT"},
            {"locationName": "TOWER200", "siteCode": "HARV", "locationType": "TOWER"},
            {"locationName": "X9", "siteCode": "srer", "locationDescription": "flux measurements"},
        ]))
        .unwrap();

        let sites = HashSet::from(["SRER".to_string()]);
        let names: Vec<_> = filter_catalog(catalog, &sites, &StructureKind::tower())
            .into_iter()
            .map(|l| l.location_name)
            .collect();

        assert_eq!(names, vec!["TOWER104454", "X9"]);
    }
}

//! Structure kinds and the signals used to recognize them

use std::collections::HashMap;

use crate::models::Location;

/// A kind of structure to look for, plus what is known about where it lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureKind {
    /// Value of `locationType` when the catalog has it filled in
    pub type_tag: String,
    /// Lower-case token searched for in names and descriptions
    pub token: String,
    /// Other description words for the same kind
    pub synonyms: Vec<String>,
    /// Site code -> previously confirmed identifier
    pub known: HashMap<String, String>,
    /// Identifiers seen at more than one site
    pub recurring: Vec<String>,
}

impl StructureKind {
    pub fn new(type_tag: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            type_tag: type_tag.into(),
            token: token.into().to_lowercase(),
            synonyms: Vec::new(),
            known: HashMap::new(),
            recurring: Vec::new(),
        }
    }

    /// Eddy-covariance towers; descriptions often say "flux" instead.
    pub fn tower() -> Self {
        Self::new("TOWER", "tower").with_synonyms(["flux"])
    }

    pub fn with_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms = synonyms.into_iter().map(|s| s.into().to_lowercase()).collect();
        self
    }

    pub fn with_known(mut self, known: HashMap<String, String>) -> Self {
        self.known = known
            .into_iter()
            .map(|(site, id)| (site.to_uppercase(), id))
            .collect();
        self
    }

    pub fn with_recurring(mut self, recurring: Vec<String>) -> Self {
        self.recurring = recurring;
        self
    }

    pub fn known_for(&self, site: &str) -> Option<&str> {
        self.known.get(&site.to_uppercase()).map(String::as_str)
    }

    /// Whether any signal marks `location` as this kind.
    ///
    /// The type tag is unreliable on its own, so name and description are
    /// checked too.
    pub fn matches(&self, location: &Location) -> bool {
        let tagged = location
            .location_type
            .as_deref()
            .is_some_and(|tag| tag.eq_ignore_ascii_case(&self.type_tag));
        if tagged {
            return true;
        }

        if location.location_name.to_lowercase().contains(&self.token) {
            return true;
        }

        location.location_description.as_deref().is_some_and(|description| {
            let description = description.to_lowercase();
            description.contains(&self.token)
                || self.synonyms.iter().any(|s| description.contains(s.as_str()))
        })
    }

    /// Identifiers to try when the catalog has nothing for `site`.
    pub fn guesses(&self, site: &str) -> Vec<String> {
        let site = site.to_uppercase();
        let token = self.token.to_uppercase();

        let mut guesses = vec![
            format!("{}_{}", site, token),
            format!("{}_{}", token, site),
            format!("{}{}", site, token),
            format!("{}{}", token, site),
        ];
        for id in &self.recurring {
            if !guesses.contains(id) {
                guesses.push(id.clone());
            }
        }
        guesses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn location(name: &str, kind: Option<&str>, description: Option<&str>) -> Location {
        serde_json::from_value(json!({
            "locationName": name,
            "locationType": kind,
            "locationDescription": description,
            "siteCode": "SRER",
        }))
        .unwrap()
    }

    #[test]
    fn test_matches_on_any_signal() {
        let tower = StructureKind::tower();

        assert!(tower.matches(&location("X1", Some("tower"), None)));
        assert!(tower.matches(&location("SRER_TOWER_1", None, None)));
        assert!(tower.matches(&location("X2", None, Some("Tower base plot"))));
        assert!(tower.matches(&location("X3", Some("OTHER"), Some("Eddy Flux site"))));
        assert!(!tower.matches(&location("PLOT_7", Some("PLOT"), Some("soil plot"))));
    }

    #[test]
    fn test_guesses_include_patterns_and_recurring() {
        let tower = StructureKind::tower().with_recurring(vec!["TOWER".into(), "SRER_TOWER".into()]);
        let guesses = tower.guesses("srer");

        assert_eq!(&guesses[..4], &["SRER_TOWER", "TOWER_SRER", "SRERTOWER", "TOWERSRER"]);
        assert_eq!(guesses.len(), 5, "duplicates are not tried twice");
        assert_eq!(guesses[4], "TOWER");
    }

    #[test]
    fn test_known_lookup_is_case_insensitive() {
        let tower = StructureKind::tower()
            .with_known(HashMap::from([("srer".to_string(), "TOWER104454".to_string())]));
        assert_eq!(tower.known_for("SRER"), Some("TOWER104454"));
        assert_eq!(tower.known_for("HARV"), None);
    }
}

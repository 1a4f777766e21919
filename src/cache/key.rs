//! Cache Key Module
//!
//! Deterministic request fingerprints.

use std::fmt;

use sha2::{Digest, Sha256};

// == Cache Key ==
/// Fingerprint of an operation and its parameters.
///
/// Parameters are sorted before hashing, so the order in which a caller
/// supplies them never changes the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(operation: &str, params: &[(String, String)]) -> Self {
        let mut sorted: Vec<&(String, String)> = params.iter().collect();
        sorted.sort();

        let mut hasher = Sha256::new();
        hasher.update(operation.as_bytes());
        for (name, value) in sorted {
            // Length prefixes keep ("ab", "c") and ("a", "bc") apart
            hasher.update((name.len() as u64).to_be_bytes());
            hasher.update(name.as_bytes());
            hasher.update((value.len() as u64).to_be_bytes());
            hasher.update(value.as_bytes());
        }

        Self(format!("{}:{}", operation, hex::encode(hasher.finalize())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CacheKey {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

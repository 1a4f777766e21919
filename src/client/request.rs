//! Request descriptors
//!
//! The planner describes each outbound call with a [`RequestDescriptor`]; the
//! executor turns it into an HTTP request.

use std::fmt;
use std::time::Duration;

use serde_json::Value;

// == Params ==
/// Flattened query parameters.
///
/// Array-valued parameters repeat their name once per element. Absent
/// optional values are never recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl ToString) -> Self {
        self.0.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_opt<T: ToString>(self, name: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.with(name, value),
            None => self,
        }
    }

    /// Adds `name=value` once per element.
    pub fn with_all<I, T>(self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        values
            .into_iter()
            .fold(self, |params, value| params.with(name, value))
    }

    /// Adds `name=true` only when `flag` is set.
    pub fn with_flag(self, name: &str, flag: bool) -> Self {
        if flag {
            self.with(name, true)
        } else {
            self
        }
    }

    pub fn as_slice(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// == Method ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    /// Existence probe: headers only, no body transfer
    Head,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Head => reqwest::Method::HEAD,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Head => "HEAD",
        })
    }
}

// == Request Descriptor ==
/// One planned outbound call. Built per call and never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    /// Path under the base URL, or an absolute URL
    pub endpoint: String,
    pub method: Method,
    /// Logical parameters; sent as the query string unless `body` is set
    pub params: Params,
    /// JSON body for POST requests
    pub body: Option<Value>,
    pub cacheable: bool,
    /// `None` means the cache default
    pub ttl: Option<Duration>,
}

impl RequestDescriptor {
    pub fn get(endpoint: impl Into<String>, params: Params) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: Method::Get,
            params,
            body: None,
            cacheable: true,
            ttl: None,
        }
    }

    pub fn post(endpoint: impl Into<String>, params: Params, body: Value) -> Self {
        Self {
            method: Method::Post,
            body: Some(body),
            ..Self::get(endpoint, params)
        }
    }

    pub fn head(url: impl Into<String>) -> Self {
        Self {
            method: Method::Head,
            cacheable: false,
            ..Self::get(url, Params::new())
        }
    }

    /// Applies a cache policy: `None` disables caching.
    pub fn with_cache(mut self, policy: Option<Option<Duration>>) -> Self {
        match policy {
            Some(ttl) => {
                self.cacheable = true;
                self.ttl = ttl;
            }
            None => {
                self.cacheable = false;
                self.ttl = None;
            }
        }
        self
    }
}

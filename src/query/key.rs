//! Query keys: the identity of a cacheable fetch.

use std::fmt;

/// Logical name plus ordered parameters.
///
/// Two keys with the same name and parameters address the same cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    name: String,
    params: Vec<String>,
}

impl QueryKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Append a parameter.
    pub fn with(mut self, param: impl fmt::Display) -> Self {
        self.params.push(param.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for p in &self.params {
            write!(f, ":{}", p)?;
        }
        Ok(())
    }
}

impl From<&str> for QueryKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

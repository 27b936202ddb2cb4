//! Navigation targets requested by directives

use std::fmt;

/// A dashboard route plus optional query parameters (Value Object)
///
/// Renders as `route?key=value&...`. Query values come from directive
/// arguments and are written as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTarget {
    route: String,
    query: Vec<(String, String)>,
}

impl NavigationTarget {
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            query: Vec::new(),
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_parameterized(&self) -> bool {
        !self.query.is_empty()
    }
}

impl fmt::Display for NavigationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.route)?;
        for (i, (key, value)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, key, value)?;
        }
        Ok(())
    }
}

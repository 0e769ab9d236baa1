//! Method constraints on routes.

use std::fmt;

use crate::request::Method;

/// The HTTP method a route accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MethodFilter {
    /// Any method. The default for routes registered without a method.
    #[default]
    Any,
    /// Exactly this method.
    Only(Method),
}

impl MethodFilter {
    /// Returns `true` if a request with `method` may reach the handler.
    pub fn allows(self, method: Method) -> bool {
        check(method, self)
    }
}

impl From<Method> for MethodFilter {
    fn from(method: Method) -> Self {
        Self::Only(method)
    }
}

impl fmt::Display for MethodFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::Only(method) => fmt::Display::fmt(method, f),
        }
    }
}

/// Compares a request method against a route's constraint.
///
/// [`Method`] values are parsed case-insensitively, so plain equality here
/// gives the case-insensitive comparison.
pub fn check(method: Method, filter: MethodFilter) -> bool {
    match filter {
        MethodFilter::Any => true,
        MethodFilter::Only(expected) => method == expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_allows_everything() {
        for method in Method::ALL {
            assert!(check(method, MethodFilter::Any));
        }
    }

    #[test]
    fn test_only_requires_equal_method() {
        let filter = MethodFilter::from(Method::Post);
        assert!(filter.allows(Method::Post));
        assert!(!filter.allows(Method::Get));
    }

    #[test]
    fn test_case_insensitive_via_parse() {
        let method = Method::parse("delete").unwrap();
        assert!(check(method, MethodFilter::Only(Method::Delete)));
    }

    #[test]
    fn test_display() {
        assert_eq!(MethodFilter::Any.to_string(), "*");
        assert_eq!(MethodFilter::Only(Method::Put).to_string(), "PUT");
    }
}

//! Route template compilation and matching.
//!
//! A template is split on `/` into segments. A segment starting with `:`
//! is a parameter and must carry a constraint in `:name(regex)` form;
//! anything else is matched literally.
//!
//! Constraints are anchored at the start of the path segment only, so
//! `:id([a-z]+)` accepts `abc123`. Write `:id([a-z]+$)` to require the
//! whole segment to match.

use regex::Regex;

use crate::error::{Result, RouterError};
use crate::request::PathParams;

/// Marks a parameter segment.
pub const PARAM_SIGIL: char = ':';

/// One `/`-separated piece of a route template.
#[derive(Debug, Clone)]
pub enum Segment {
    /// Must equal the path segment exactly.
    Literal(String),
    /// Binds the path segment to `name` when `constraint` matches its start.
    Param {
        /// Parameter name.
        name: String,
        /// Compiled constraint, anchored with `^`.
        constraint: Regex,
    },
}

impl Segment {
    fn matches(&self, segment: &str) -> bool {
        match self {
            Self::Literal(text) => text == segment,
            Self::Param { constraint, .. } => constraint.is_match(segment),
        }
    }
}

/// A compiled route template.
///
/// The segment list is fixed once compiled.
#[derive(Debug, Clone)]
pub struct RouteTemplate {
    template: String,
    segments: Vec<Segment>,
}

impl RouteTemplate {
    /// Compiles a template string.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::MalformedPattern`] when a parameter segment has
    /// no name, no `(regex)` constraint, an unterminated constraint, or a
    /// constraint that is not a valid regular expression.
    ///
    /// # Example
    ///
    /// ```
    /// use waypost::RouteTemplate;
    ///
    /// let template = RouteTemplate::compile("/posts/:id([0-9]+)").unwrap();
    /// let segments: Vec<String> = "/posts/42".split('/').map(String::from).collect();
    /// let params = template.match_segments(&segments).unwrap();
    /// assert_eq!(params.get("id"), Some("42"));
    ///
    /// assert!(RouteTemplate::compile("/posts/:id").is_err());
    /// ```
    pub fn compile(template: &str) -> Result<Self> {
        let segments = template
            .split('/')
            .map(|part| compile_segment(template, part))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            template: template.to_string(),
            segments,
        })
    }

    /// Returns the template string this was compiled from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns the compiled segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments, counting the empty one before a leading `/`.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` for a template with no segments. Never the case for
    /// compiled templates, which always have at least one.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns `true` if any segment is a parameter.
    pub fn is_parametric(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Param { .. }))
    }

    /// Reconciles the template with a split request path.
    ///
    /// The segment counts must be equal. Every literal must equal its path
    /// segment and every parameter constraint must match its path segment,
    /// which is then bound under the parameter name.
    pub fn match_segments<S: AsRef<str>>(&self, path: &[S]) -> Option<PathParams> {
        if path.len() != self.segments.len() {
            return None;
        }

        let mut params = PathParams::new();
        for (segment, value) in self.segments.iter().zip(path) {
            let value: &str = value.as_ref();
            if !segment.matches(value) {
                return None;
            }
            if let Segment::Param { name, .. } = segment {
                params.insert(name.as_str(), value);
            }
        }

        Some(params)
    }
}

fn compile_segment(template: &str, part: &str) -> Result<Segment> {
    let Some(param) = part.strip_prefix(PARAM_SIGIL) else {
        return Ok(Segment::Literal(part.to_string()));
    };

    let Some((name, rest)) = param.split_once('(') else {
        return Err(RouterError::malformed(
            template,
            format!(
                "regex is missing from '{part}'; url parameters require a regex in \"/:param(regex)\" format"
            ),
        ));
    };
    if name.is_empty() {
        return Err(RouterError::malformed(template, format!("parameter '{part}' has no name")));
    }
    let Some(constraint) = rest.strip_suffix(')') else {
        return Err(RouterError::malformed(
            template,
            format!("constraint of '{part}' is not closed with ')'"),
        ));
    };
    if constraint.is_empty() {
        return Err(RouterError::malformed(
            template,
            format!("constraint of '{part}' is empty"),
        ));
    }

    let constraint = Regex::new(&format!("^(?:{constraint})"))
        .map_err(|e| RouterError::malformed(template, format!("invalid regex in '{part}': {e}")))?;

    Ok(Segment::Param {
        name: name.to_string(),
        constraint,
    })
}

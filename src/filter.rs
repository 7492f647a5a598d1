//! Include/exclude rule matching for asset paths.
//!
//! Rules deliberately mirror the loose shapes bundler configs use: a bare
//! string (exact path or glob), a compiled regex, or a list of either. Lists
//! match per element, so nesting a list inside a list behaves the same as
//! flattening it.

use std::path::Path;

use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Deserializer};

use crate::error::{TransformError, TransformResult};

/// A single include or exclude rule.
#[derive(Debug, Clone)]
pub enum FilterRule {
    /// Exact path string or glob pattern, e.g. `**/*.png`.
    Pattern(String),
    /// Compiled regular expression tested against the normalized path.
    Regex(Regex),
    /// Any-of list of rules.
    Many(Vec<FilterRule>),
}

impl From<&str> for FilterRule {
    fn from(value: &str) -> Self {
        FilterRule::Pattern(value.to_string())
    }
}

impl From<String> for FilterRule {
    fn from(value: String) -> Self {
        FilterRule::Pattern(value)
    }
}

impl From<Regex> for FilterRule {
    fn from(value: Regex) -> Self {
        FilterRule::Regex(value)
    }
}

impl From<Vec<FilterRule>> for FilterRule {
    fn from(value: Vec<FilterRule>) -> Self {
        FilterRule::Many(value)
    }
}

// Config files can only express string and list rules; regex rules are
// programmatic.
impl<'de> Deserialize<'de> for FilterRule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            One(String),
            Many(Vec<Repr>),
        }

        fn convert(repr: Repr) -> FilterRule {
            match repr {
                Repr::One(pattern) => FilterRule::Pattern(pattern),
                Repr::Many(rules) => FilterRule::Many(rules.into_iter().map(convert).collect()),
            }
        }

        Ok(convert(Repr::deserialize(deserializer)?))
    }
}

#[derive(Debug, Clone)]
enum CompiledRule {
    Pattern { text: String, glob: Pattern },
    Regex(Regex),
    Many(Vec<CompiledRule>),
}

impl CompiledRule {
    fn compile(rule: &FilterRule) -> TransformResult<Self> {
        match rule {
            FilterRule::Pattern(text) => {
                let glob = Pattern::new(text).map_err(|err| {
                    TransformError::Configuration(format!("invalid filter pattern {text:?}: {err}"))
                })?;
                Ok(CompiledRule::Pattern {
                    text: text.clone(),
                    glob,
                })
            }
            FilterRule::Regex(regex) => Ok(CompiledRule::Regex(regex.clone())),
            FilterRule::Many(rules) => Ok(CompiledRule::Many(
                rules.iter().map(Self::compile).collect::<TransformResult<_>>()?,
            )),
        }
    }

    fn matches(&self, path: &str) -> bool {
        match self {
            // Absolute paths still match patterns rooted at any depth, so try
            // the glob both with and without the leading separator.
            CompiledRule::Pattern { text, glob } => {
                text == path || glob.matches(path) || glob.matches(path.trim_start_matches('/'))
            }
            CompiledRule::Regex(regex) => regex.is_match(path),
            // Lists recurse per element, never against the list itself.
            CompiledRule::Many(rules) => rules.iter().any(|rule| rule.matches(path)),
        }
    }
}

/// Compiled include/exclude filter, immutable for the build's lifetime.
#[derive(Debug, Clone)]
pub struct Filter {
    include: Vec<CompiledRule>,
    exclude: Vec<CompiledRule>,
}

impl Filter {
    /// Compile the rule lists, failing fast on an invalid glob pattern.
    pub fn new(include: &[FilterRule], exclude: &[FilterRule]) -> TransformResult<Self> {
        Ok(Self {
            include: include.iter().map(CompiledRule::compile).collect::<TransformResult<_>>()?,
            exclude: exclude.iter().map(CompiledRule::compile).collect::<TransformResult<_>>()?,
        })
    }

    /// `true` when the path matches at least one include rule and no exclude
    /// rule. An empty include list matches every path.
    pub fn matches(&self, path: &Path) -> bool {
        let text = path.to_string_lossy().replace('\\', "/");
        let included =
            self.include.is_empty() || self.include.iter().any(|rule| rule.matches(&text));
        included && !self.exclude.iter().any(|rule| rule.matches(&text))
    }
}

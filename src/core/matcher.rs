//! Keyword matching over message bodies.
//!
//! [`KeywordMatcher`] compiles a [`KeywordSpec`] into one regular expression.
//! Literal keywords are escaped and joined by alternation; regex-mode
//! keywords are used as given. The position policy adds the anchors:
//!
//! | Position | Pattern |
//! |----------|---------|
//! | `prefix` | `^\s*(?:k1\|k2)` |
//! | `anywhere` | `(?:k1\|k2)` |
//! | `suffix` | `(?:k1\|k2)\s*$` |
//!
//! # Example
//!
//! ```
//! use checkin::config::{KeywordPosition, KeywordSpec};
//! use checkin::core::matcher::KeywordMatcher;
//!
//! # fn main() -> checkin::Result<()> {
//! let prefix = KeywordMatcher::new(&KeywordSpec::new(["打卡"]))?;
//! assert!(prefix.is_match("打卡 已完成"));
//! assert!(!prefix.is_match("今天打卡"));
//!
//! let anywhere = KeywordMatcher::new(
//!     &KeywordSpec::new(["打卡"]).with_position(KeywordPosition::Anywhere),
//! )?;
//! assert!(anywhere.is_match("今天打卡"));
//! # Ok(())
//! # }
//! ```

use regex::Regex;

use crate::config::{KeywordMode, KeywordPosition, KeywordSpec};
use crate::error::{CheckinError, Result};

/// Compiled keyword matcher.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    regex: Regex,
    position: KeywordPosition,
}

impl KeywordMatcher {
    /// Compiles the spec.
    ///
    /// # Errors
    ///
    /// [`CheckinError::Configuration`] when the spec has no usable keyword or
    /// a regex-mode pattern does not compile.
    pub fn new(spec: &KeywordSpec) -> Result<Self> {
        let alternatives: Vec<String> = spec
            .patterns
            .iter()
            .filter(|p| !p.trim().is_empty())
            .map(|p| match spec.mode {
                KeywordMode::Literal => regex::escape(p.trim()),
                KeywordMode::Regex => format!("(?:{p})"),
            })
            .collect();

        if alternatives.is_empty() {
            return Err(CheckinError::configuration(
                "keyword",
                "at least one keyword is required",
            ));
        }

        let alternation = alternatives.join("|");
        let pattern = match spec.position {
            KeywordPosition::Prefix => format!(r"^\s*(?P<kw>{alternation})"),
            KeywordPosition::Anywhere => format!(r"(?P<kw>{alternation})"),
            KeywordPosition::Suffix => format!(r"(?P<kw>{alternation})\s*$"),
        };

        let regex = Regex::new(&pattern)
            .map_err(|e| CheckinError::configuration("keyword", e.to_string()))?;

        Ok(Self {
            regex,
            position: spec.position,
        })
    }

    /// Returns `true` if the body satisfies the keyword policy.
    pub fn is_match(&self, body: &str) -> bool {
        self.regex.is_match(body)
    }

    /// Returns the matched keyword fragments, in body order.
    ///
    /// Anchoring whitespace is not part of a fragment. Prefix and suffix
    /// policies yield at most one fragment.
    pub fn extract<'b>(&self, body: &'b str) -> Vec<&'b str> {
        self.regex
            .captures_iter(body)
            .filter_map(|caps| caps.name("kw"))
            .map(|m| m.as_str())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Matched fragments joined by a single space, or `None` without a match.
    ///
    /// A pattern that only matches the empty string yields `Some("")`.
    pub fn fragment_text(&self, body: &str) -> Option<String> {
        if !self.is_match(body) {
            return None;
        }
        Some(self.extract(body).join(" "))
    }

    /// Position policy this matcher was built with.
    pub fn position(&self) -> KeywordPosition {
        self.position
    }

    /// The compiled pattern, for diagnostics.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

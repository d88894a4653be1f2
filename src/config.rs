//! Configuration types for keyword matching and the audit window.
//!
//! The library consumes already-parsed values ([`KeywordSpec`],
//! [`SaveMode`], a week count). [`CheckinConfig`] bundles them and can be
//! loaded from a small TOML file:
//!
//! ```toml
//! [general]
//! keyword = "打卡, 签到"
//! week = 2
//! keyword_position = "prefix"   # prefix | anywhere | suffix
//! keyword_mode = "literal"      # literal | regex
//! save_mode = "all"             # all | match
//! ```
//!
//! `keyword` and `week` are required. The three policy fields are optional
//! and fall back to their defaults, with a warning, when absent or unknown.
//!
//! # Example
//!
//! ```rust
//! use checkin::config::{CheckinConfig, KeywordPosition, SaveMode};
//!
//! let config = CheckinConfig::from_toml_str("[general]\nkeyword = \"打卡，签到\"\nweek = 3\n")?;
//! assert_eq!(config.keywords.patterns, vec!["打卡", "签到"]);
//! assert_eq!(config.keywords.position, KeywordPosition::Prefix);
//! assert_eq!(config.save_mode, SaveMode::All);
//! assert_eq!(config.weeks, 3);
//! # Ok::<(), checkin::CheckinError>(())
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::encoding::{decode, normalize_line_endings};
use crate::error::{CheckinError, Result};

/// Where in a message body a keyword has to appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordPosition {
    /// At the start of the body, leading whitespace ignored (default).
    #[default]
    Prefix,
    /// Anywhere in the body.
    Anywhere,
    /// At the end of the body, trailing whitespace ignored.
    Suffix,
}

impl KeywordPosition {
    /// Returns all accepted names including aliases.
    pub fn all_names() -> &'static [&'static str] {
        &["prefix", "start", "anywhere", "any", "contains", "suffix", "end"]
    }
}

impl fmt::Display for KeywordPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeywordPosition::Prefix => write!(f, "prefix"),
            KeywordPosition::Anywhere => write!(f, "anywhere"),
            KeywordPosition::Suffix => write!(f, "suffix"),
        }
    }
}

impl FromStr for KeywordPosition {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "prefix" | "start" => Ok(KeywordPosition::Prefix),
            "anywhere" | "any" | "contains" => Ok(KeywordPosition::Anywhere),
            "suffix" | "end" => Ok(KeywordPosition::Suffix),
            _ => Err(format!(
                "Unknown keyword position: '{}'. Expected one of: {}",
                s,
                KeywordPosition::all_names().join(", ")
            )),
        }
    }
}

/// How configured keywords are turned into a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordMode {
    /// Keywords are plain text; regex metacharacters match literally (default).
    #[default]
    Literal,
    /// Keywords are regular expressions used as given.
    ///
    /// The configuration file is trusted: patterns are not escaped or
    /// otherwise sanitized.
    Regex,
}

impl fmt::Display for KeywordMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeywordMode::Literal => write!(f, "literal"),
            KeywordMode::Regex => write!(f, "regex"),
        }
    }
}

impl FromStr for KeywordMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "literal" | "text" => Ok(KeywordMode::Literal),
            "regex" | "re" => Ok(KeywordMode::Regex),
            _ => Err(format!(
                "Unknown keyword mode: '{s}'. Expected one of: literal, regex"
            )),
        }
    }
}

/// What a stored check-in keeps of the original message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveMode {
    /// Keep the full message body (default).
    #[default]
    All,
    /// Keep only the matched keyword fragments, space-joined.
    Match,
}

impl fmt::Display for SaveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveMode::All => write!(f, "all"),
            SaveMode::Match => write!(f, "match"),
        }
    }
}

impl FromStr for SaveMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "full" => Ok(SaveMode::All),
            "match" | "matched" => Ok(SaveMode::Match),
            _ => Err(format!(
                "Unknown save mode: '{s}'. Expected one of: all, match"
            )),
        }
    }
}

/// Keyword set plus the policy used to match it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeywordSpec {
    /// Keywords (or regex patterns), in configuration order.
    pub patterns: Vec<String>,

    /// Where the keyword must appear.
    #[serde(default)]
    pub position: KeywordPosition,

    /// Literal text or raw regex.
    #[serde(default)]
    pub mode: KeywordMode,

    /// Keyword entries as configured, before splitting.
    #[serde(skip)]
    entries: Option<Vec<String>>,
}

impl KeywordSpec {
    /// Creates a literal prefix spec from the given keywords.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
            position: KeywordPosition::default(),
            mode: KeywordMode::default(),
            entries: None,
        }
    }

    /// Creates a literal prefix spec from configured keyword entries.
    ///
    /// In literal mode every entry is split on `,` and `，` and trimmed. In
    /// regex mode every non-blank entry is one pattern, kept verbatim.
    /// [`with_mode`](Self::with_mode) re-derives the patterns, so a mode
    /// chosen later still sees the unsplit entries.
    ///
    /// ```
    /// use checkin::config::{KeywordMode, KeywordSpec};
    ///
    /// let spec = KeywordSpec::from_entries([r"第\d{1,3}天, 打卡"]);
    /// assert_eq!(spec.patterns, vec![r"第\d{1", "3}天", "打卡"]);
    ///
    /// let spec = spec.with_mode(KeywordMode::Regex);
    /// assert_eq!(spec.patterns, vec![r"第\d{1,3}天, 打卡"]);
    /// ```
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<String> = entries.into_iter().map(Into::into).collect();
        let mode = KeywordMode::default();
        Self {
            patterns: patterns_for(&entries, mode),
            position: KeywordPosition::default(),
            mode,
            entries: Some(entries),
        }
    }

    /// Sets the match position.
    #[must_use]
    pub fn with_position(mut self, position: KeywordPosition) -> Self {
        self.position = position;
        self
    }

    /// Sets the pattern mode.
    #[must_use]
    pub fn with_mode(mut self, mode: KeywordMode) -> Self {
        self.mode = mode;
        if let Some(entries) = &self.entries {
            self.patterns = patterns_for(entries, mode);
        }
        self
    }
}

fn patterns_for(entries: &[String], mode: KeywordMode) -> Vec<String> {
    match mode {
        KeywordMode::Literal => entries.iter().flat_map(|e| split_keywords(e)).collect(),
        KeywordMode::Regex => entries
            .iter()
            .filter(|e| !e.trim().is_empty())
            .cloned()
            .collect(),
    }
}

/// Everything a run needs besides the log itself and today's date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckinConfig {
    /// Keywords and how to match them.
    pub keywords: KeywordSpec,

    /// Number of weeks in the audit window (at least 1).
    pub weeks: u32,

    /// What to keep of matching messages.
    pub save_mode: SaveMode,
}

impl CheckinConfig {
    /// Creates a configuration with default policies.
    pub fn new(keywords: KeywordSpec, weeks: u32) -> Self {
        Self {
            keywords,
            weeks,
            save_mode: SaveMode::default(),
        }
    }

    /// Sets the save mode.
    #[must_use]
    pub fn with_save_mode(mut self, save_mode: SaveMode) -> Self {
        self.save_mode = save_mode;
        self
    }

    /// Sets the number of weeks.
    #[must_use]
    pub fn with_weeks(mut self, weeks: u32) -> Self {
        self.weeks = weeks;
        self
    }

    /// Loads and validates a configuration file.
    ///
    /// The file goes through the same decoding as chat logs, so GBK and
    /// UTF-16 files are accepted.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CheckinError::missing_input(path));
        }
        let bytes = std::fs::read(path)?;
        let text = decode(&bytes)?;
        Self::from_toml_str(&normalize_line_endings(&text))
    }

    /// Parses and validates configuration text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(text)?;
        let general = raw.general.ok_or_else(|| {
            CheckinError::configuration("general", "missing [general] section")
        })?;
        general.into_config()
    }

    /// Checks the invariants that `from_toml_str` enforces.
    ///
    /// Useful after overriding fields programmatically.
    pub fn validate(&self) -> Result<()> {
        if self.keywords.patterns.iter().all(|p| p.trim().is_empty()) {
            return Err(CheckinError::configuration(
                "keyword",
                "at least one keyword is required",
            ));
        }
        if self.weeks == 0 {
            return Err(CheckinError::configuration("week", "must be at least 1"));
        }
        Ok(())
    }
}

/// Splits a keyword list on ASCII and full-width commas.
///
/// Entries are trimmed and empty entries dropped.
///
/// ```
/// use checkin::config::split_keywords;
///
/// assert_eq!(split_keywords(" 打卡，签到,, check "), vec!["打卡", "签到", "check"]);
/// ```
pub fn split_keywords(list: &str) -> Vec<String> {
    list.split([',', '，'])
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .collect()
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(alias = "General")]
    general: Option<RawGeneral>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawKeywords {
    List(String),
    Array(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct RawGeneral {
    #[serde(alias = "keywords")]
    keyword: Option<RawKeywords>,
    #[serde(alias = "weeks")]
    week: Option<i64>,
    keyword_position: Option<String>,
    keyword_mode: Option<String>,
    save_mode: Option<String>,
}

impl RawGeneral {
    fn into_config(self) -> Result<CheckinConfig> {
        let entries = match self.keyword {
            Some(RawKeywords::List(list)) => vec![list],
            Some(RawKeywords::Array(items)) => items,
            None => return Err(CheckinError::configuration("keyword", "missing")),
        };

        let week = self
            .week
            .ok_or_else(|| CheckinError::configuration("week", "missing"))?;
        let weeks = u32::try_from(week)
            .map_err(|_| CheckinError::configuration("week", format!("{week} is out of range")))?;

        let keywords = KeywordSpec::from_entries(entries)
            .with_position(or_default("keyword_position", self.keyword_position.as_deref()))
            .with_mode(or_default("keyword_mode", self.keyword_mode.as_deref()));

        let config = CheckinConfig::new(keywords, weeks)
            .with_save_mode(or_default("save_mode", self.save_mode.as_deref()));
        config.validate()?;
        Ok(config)
    }
}

fn or_default<T>(field: &str, value: Option<&str>) -> T
where
    T: FromStr<Err = String> + Default + fmt::Display,
{
    let Some(value) = value else {
        return T::default();
    };
    value.parse().unwrap_or_else(|err: String| {
        let fallback = T::default();
        warn!(field, %fallback, "{err}; using default");
        fallback
    })
}

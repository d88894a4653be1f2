//! Command-line interface definition using clap.
//!
//! [`Args`] holds the raw flags. Everything else the binary needs from them
//! ([`Args::today`], [`Args::output_path`], [`Args::apply_overrides`]) lives
//! here too, so it can be tested without spawning the process.
//!
//! ```rust
//! use checkin::cli::Args;
//! use clap::Parser;
//!
//! let args = Args::try_parse_from(["checkin", "log.txt", "--weeks", "3"]).unwrap();
//! assert_eq!(args.input.to_str(), Some("log.txt"));
//! assert_eq!(args.weeks, Some(3));
//! ```

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::config::{CheckinConfig, KeywordMode, KeywordPosition, SaveMode};
use crate::error::{CheckinError, Result};
use crate::format::OutputFormat;

/// Audit a QQ group chat export for daily check-in messages.
#[derive(Parser, Debug, Clone)]
#[command(name = "checkin")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    checkin
    checkin chat.txt -c club.toml
    checkin chat.txt --weeks 4 --position anywhere
    checkin chat.txt --today 2024-03-20 -f json -o report.json")]
pub struct Args {
    /// Path to the exported chat log
    #[arg(default_value = "data.txt")]
    pub input: PathBuf,

    /// Path to the configuration file
    #[arg(short, long, default_value = "checkin.toml")]
    pub config: PathBuf,

    /// Path to the export file [default: checkin_MM-DD.<format>]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export format: csv (UTF-8 with BOM, opens in spreadsheet apps) or json.
    /// No .xls workbook is written
    #[arg(short, long, default_value = "csv")]
    pub format: OutputFormat,

    /// Audit as if today were this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub today: Option<String>,

    /// Number of weeks to audit (overrides the config file)
    #[arg(long, value_name = "N")]
    pub weeks: Option<u32>,

    /// Where the keyword must appear: prefix, anywhere, suffix
    #[arg(long, value_name = "POSITION")]
    pub position: Option<KeywordPosition>,

    /// Keyword interpretation: literal, regex
    #[arg(long, value_name = "MODE")]
    pub mode: Option<KeywordMode>,

    /// What to keep of matching messages: all, match
    #[arg(long, value_name = "MODE")]
    pub save_mode: Option<SaveMode>,

    /// Replace non-ASCII characters in the console table
    #[arg(long)]
    pub ascii: bool,

    /// Print the table only, do not write an export file
    #[arg(long)]
    pub no_export: bool,

    /// Diagnostic log file
    #[arg(long, value_name = "PATH", default_value = "debug.log")]
    pub log_file: PathBuf,

    /// Log filter for the diagnostic file (e.g. debug, checkin=trace)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Show all log messages on stderr, not only warnings
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Parses `--today`, if given.
    pub fn today(&self) -> Result<Option<NaiveDate>> {
        self.today.as_deref().map(parse_date).transpose()
    }

    /// Export path: `--output`, or `checkin_MM-DD.<ext>` for the given day.
    pub fn output_path(&self, today: NaiveDate) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            PathBuf::from(format!(
                "checkin_{}.{}",
                today.format("%m-%d"),
                self.format.extension()
            ))
        })
    }

    /// Applies command-line overrides on top of the file configuration.
    pub fn apply_overrides(&self, mut config: CheckinConfig) -> Result<CheckinConfig> {
        if let Some(weeks) = self.weeks {
            config.weeks = weeks;
        }
        if let Some(position) = self.position {
            config.keywords.position = position;
        }
        if let Some(mode) = self.mode {
            config.keywords = config.keywords.with_mode(mode);
        }
        if let Some(save_mode) = self.save_mode {
            config.save_mode = save_mode;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| CheckinError::invalid_date(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeywordSpec;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("checkin").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.input, PathBuf::from("data.txt"));
        assert_eq!(args.config, PathBuf::from("checkin.toml"));
        assert_eq!(args.format, OutputFormat::Csv);
        assert_eq!(args.log_file, PathBuf::from("debug.log"));
        assert!(args.today().unwrap().is_none());
        assert!(!args.ascii && !args.no_export && !args.verbose);
    }

    #[test]
    fn test_policy_flags_use_aliases() {
        let args = parse(&["--position", "any", "--mode", "re", "--save-mode", "matched"]);
        assert_eq!(args.position, Some(KeywordPosition::Anywhere));
        assert_eq!(args.mode, Some(KeywordMode::Regex));
        assert_eq!(args.save_mode, Some(SaveMode::Match));
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let result = Args::try_parse_from(["checkin", "--position", "middle"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_today() {
        let args = parse(&["--today", "2024-03-20"]);
        assert_eq!(args.today().unwrap(), NaiveDate::from_ymd_opt(2024, 3, 20));

        let bad = parse(&["--today", "20/03/2024"]);
        assert!(matches!(bad.today(), Err(CheckinError::InvalidDate { .. })));
    }

    #[test]
    fn test_default_output_path() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(parse(&[]).output_path(today), PathBuf::from("checkin_03-05.csv"));
        assert_eq!(
            parse(&["-f", "json"]).output_path(today),
            PathBuf::from("checkin_03-05.json")
        );
        assert_eq!(
            parse(&["-o", "out.csv"]).output_path(today),
            PathBuf::from("out.csv")
        );
    }

    #[test]
    fn test_overrides() {
        let config = CheckinConfig::new(KeywordSpec::new(["打卡"]), 2);
        let args = parse(&["--weeks", "4", "--position", "suffix", "--save-mode", "match"]);
        let config = args.apply_overrides(config).unwrap();
        assert_eq!(config.weeks, 4);
        assert_eq!(config.keywords.position, KeywordPosition::Suffix);
        assert_eq!(config.keywords.mode, KeywordMode::Literal);
        assert_eq!(config.save_mode, SaveMode::Match);
    }

    #[test]
    fn test_regex_mode_override_keeps_commas() {
        let config =
            CheckinConfig::from_toml_str("[general]\nkeyword = '第\\d{1,3}天'\nweek = 1\n").unwrap();
        let config = parse(&["--mode", "regex"]).apply_overrides(config).unwrap();
        assert_eq!(config.keywords.mode, KeywordMode::Regex);
        assert_eq!(config.keywords.patterns, vec![r"第\d{1,3}天"]);
    }

    #[test]
    fn test_zero_weeks_override_fails_validation() {
        let config = CheckinConfig::new(KeywordSpec::new(["打卡"]), 2);
        let err = parse(&["--weeks", "0"]).apply_overrides(config).unwrap_err();
        assert!(err.is_configuration());
    }
}

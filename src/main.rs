//! # checkin CLI
//!
//! Command-line front end: reads the chat export, audits it against the
//! configuration and prints/exports the calendar.

use std::process;
use std::time::Instant;

use chrono::Local;
use clap::Parser as ClapParser;
use tracing::{error, info};

use checkin::cli::Args;
use checkin::config::CheckinConfig;
use checkin::core::{Aggregator, KeywordMatcher, Report, TableOptions, TargetWindow, render_table};
use checkin::encoding::read_log;
use checkin::format::write_report;
use checkin::logging::setup_logging;
use checkin::parser::extract;
use checkin::{CheckinError, Result};

fn main() {
    let args = <Args as ClapParser>::parse();

    if let Err(e) = setup_logging(&args.log_file, args.log_level.as_deref(), args.verbose) {
        eprintln!("⚠️  Diagnostic log disabled: {e}");
    }

    if let Err(e) = run(&args) {
        error!(error = %e, "run aborted");
        eprintln!("❌ Error: {e}");
        if let CheckinError::MissingInput { path } = &e {
            if *path == args.config {
                eprintln!("   Create it with a [general] section holding `keyword` and `week`.");
            } else {
                eprintln!("   Export the group chat from QQ as a .txt file and save it there,");
                eprintln!("   or pass the export's path as the first argument.");
            }
        }
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let total_start = Instant::now();
    let today = args.today()?.unwrap_or_else(|| Local::now().date_naive());

    let config = args.apply_overrides(CheckinConfig::load(&args.config)?)?;
    let matcher = KeywordMatcher::new(&config.keywords)?;
    let window = TargetWindow::ending_this_week(today, config.weeks)?;
    let output_path = args.output_path(today);
    info!(
        input = %args.input.display(),
        config = %args.config.display(),
        pattern = matcher.as_str(),
        "starting audit"
    );

    println!("📋 checkin v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Input:    {}", args.input.display());
    println!("🔑 Keywords: {}", config.keywords.patterns.join(", "));
    println!(
        "🎯 Policy:   {} / {} / save {}",
        config.keywords.position, config.keywords.mode, config.save_mode
    );
    println!(
        "📅 Window:   {} → {} ({} weeks)",
        window.first(),
        window.last(),
        config.weeks
    );
    println!();

    println!("⏳ Reading chat log...");
    let read_start = Instant::now();
    let text = read_log(&args.input)?;
    println!(
        "   {} bytes ({:.2}s)",
        text.len(),
        read_start.elapsed().as_secs_f64()
    );

    println!("🔍 Extracting check-ins...");
    let parse_start = Instant::now();
    let mut records = extract(&text);
    let mut aggregator = Aggregator::new(&matcher, &window, config.save_mode);
    aggregator.extend(records.by_ref());
    let skipped = records.skipped();
    let (index, stats) = aggregator.finish();
    println!(
        "   {} messages, {} check-ins ({:.2}s)",
        stats.total,
        stats.accepted,
        parse_start.elapsed().as_secs_f64()
    );

    let report = Report::build(&index, &window);
    let options = TableOptions::new().with_ascii_only(args.ascii);
    println!();
    print!("{}", render_table(&report, &options));

    if args.no_export {
        println!("⏭️  Skipping export (--no-export)");
    } else {
        write_report(&report, &output_path, args.format)?;
        info!(path = %output_path.display(), format = %args.format, "report written");
        println!();
        println!("✅ Done! {} saved to {}", args.format, output_path.display());
    }

    println!();
    println!("📊 Summary:");
    println!("   Messages:       {}", stats.total);
    println!("   Outside window: {}", stats.out_of_window);
    println!("   No keyword:     {}", stats.unmatched);
    println!(
        "   Check-ins:      {} ({:.1}%)",
        stats.accepted,
        stats.acceptance_ratio()
    );
    println!("   Members:        {}", stats.senders);
    if skipped > 0 {
        println!("   ⚠️  Skipped:     {skipped} malformed headers (see {})", args.log_file.display());
    }
    println!(
        "   Total time:     {:.2}s",
        total_start.elapsed().as_secs_f64()
    );

    Ok(())
}

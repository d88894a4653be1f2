//! Integration tests: whole audits over realistic chat exports on disk.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use checkin::prelude::*;
use encoding_rs::GBK;
use tempfile::{TempDir, tempdir};

const CHAT_LOG: &str = "\
消息记录（此消息记录为文本格式，不支持重新导入）

================================================================
消息分组:我的群聊
================================================================
消息对象:跑步打卡群
================================================================

2024-03-10 23:59:59 Alice(10001)
打卡 too early

2024-03-11 0:00:00 Alice(10001)
打卡 day 1

2024-03-11 7:30:00 小明(20001)
今天打卡
跑了 5km

2024-03-11 21:00:00 小明(20001)
打卡 evening
配速 6'30

2024-03-12 8:00:00 Bob<bob@example.com>
签到

2024-03-12 9:00:00 Alice(10001)
[图片]

2024-03-18 8:00:00 Alice Cooper(10001)
打卡 renamed

2024-03-24 23:59:59 Bob<bob@example.com>
打卡

2024-03-25 0:00:00 Alice(10001)
打卡 too late
";

const CONFIG: &str = "\
[general]
keyword = \"打卡, 签到\"
week = 2
";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

fn setup(log: &[u8]) -> (TempDir, PathBuf, PathBuf) {
    let dir = tempdir().unwrap();
    let log_path = dir.path().join("data.txt");
    let config_path = dir.path().join("checkin.toml");
    fs::write(&log_path, log).unwrap();
    fs::write(&config_path, CONFIG).unwrap();
    (dir, log_path, config_path)
}

fn audit(text: &str, config: &CheckinConfig) -> (Report, AggregationStats) {
    let matcher = KeywordMatcher::new(&config.keywords).unwrap();
    let window = TargetWindow::ending_this_week(today(), config.weeks).unwrap();
    let (index, stats) = aggregate(extract(text), &matcher, &window, config.save_mode);
    (Report::build(&index, &window), stats)
}

#[test]
fn test_full_audit_from_files() {
    let (_dir, log_path, config_path) = setup(CHAT_LOG.as_bytes());

    let config = CheckinConfig::load(&config_path).unwrap();
    let text = read_log(&log_path).unwrap();
    let (report, stats) = audit(&text, &config);

    assert_eq!(stats.total, 9);
    assert_eq!(stats.out_of_window, 2);
    assert_eq!(stats.unmatched, 2);
    assert_eq!(stats.accepted, 5);
    assert_eq!(stats.senders, 3);

    assert_eq!(report.days.len(), 14);
    assert_eq!(report.days[0], day(11));
    assert_eq!(report.days[13], day(24));

    let ids: Vec<&str> = report.rows.iter().map(|r| r.sender_id.as_str()).collect();
    assert_eq!(ids, ["10001", "20001", "bob@example.com"]);

    let alice = &report.rows[0];
    assert_eq!(alice.display_name, "Alice Cooper(10001)");
    assert_eq!(alice.cells[0].messages(), ["打卡 day 1"]);
    assert_eq!(alice.cells[7].messages(), ["打卡 renamed"]);
    assert_eq!(alice.present_days(), 2);

    let xiaoming = &report.rows[1];
    assert_eq!(xiaoming.cells[0].messages(), ["打卡 evening\n配速 6'30"]);

    let bob = &report.rows[2];
    assert_eq!(bob.display_name, "Bob(bob@example.com)");
    assert!(bob.cells[1].is_present());
    assert!(bob.cells[13].is_present());
}

#[test]
fn test_same_day_messages_accumulate() {
    let config = CheckinConfig::new(
        KeywordSpec::new(["打卡"]).with_position(KeywordPosition::Anywhere),
        2,
    );
    let (report, _) = audit(CHAT_LOG, &config);

    let xiaoming = &report.rows[1];
    assert_eq!(
        xiaoming.cells[0].messages(),
        ["今天打卡\n跑了 5km", "打卡 evening\n配速 6'30"]
    );
}

#[test]
fn test_match_save_mode_keeps_fragments() {
    let config = CheckinConfig::new(KeywordSpec::new(["打卡", "签到"]), 2)
        .with_save_mode(SaveMode::Match);
    let (report, stats) = audit(CHAT_LOG, &config);

    assert_eq!(stats.accepted, 5);
    assert_eq!(report.rows[0].cells[0].messages(), ["打卡"]);
    assert_eq!(report.rows[2].cells[1].messages(), ["签到"]);
}

#[test]
fn test_gbk_export_reads_like_utf8() {
    let (gbk_bytes, _, unmappable) = GBK.encode(CHAT_LOG);
    assert!(!unmappable);
    let (_dir, log_path, _) = setup(&gbk_bytes);

    let decoded = read_log(&log_path).unwrap();
    assert_eq!(decoded, CHAT_LOG);
    assert_eq!(parse_records(&decoded), parse_records(CHAT_LOG));
}

#[test]
fn test_utf16_crlf_export() {
    let crlf = CHAT_LOG.replace('\n', "\r\n");
    let mut bytes = vec![0xFF, 0xFE];
    bytes.extend(crlf.encode_utf16().flat_map(u16::to_le_bytes));
    let (_dir, log_path, _) = setup(&bytes);

    let decoded = read_log(&log_path).unwrap();
    assert_eq!(decoded, CHAT_LOG);
}

#[test]
fn test_parse_file_helper() {
    let (_dir, log_path, _) = setup(CHAT_LOG.as_bytes());
    let records = checkin::parser::parse_file(&log_path).unwrap();
    assert_eq!(records.len(), 9);
    assert_eq!(records[0].timestamp.date(), day(10));
}

#[test]
fn test_spans_reconstruct_source() {
    let records = parse_records(CHAT_LOG);
    let first = records.first().unwrap().span.start;
    let last = records.last().unwrap().span.end;

    for pair in records.windows(2) {
        assert_eq!(pair[0].span.end, pair[1].span.start);
        let joined = format!(
            "{}{}",
            &CHAT_LOG[pair[0].span.clone()],
            &CHAT_LOG[pair[1].span.clone()]
        );
        assert_eq!(joined, CHAT_LOG[pair[0].span.start..pair[1].span.end]);
    }

    let rebuilt: String = records.iter().map(|r| &CHAT_LOG[r.span.clone()]).collect();
    assert_eq!(rebuilt, CHAT_LOG[first..last]);
    assert_eq!(last, CHAT_LOG.len());
    assert!(CHAT_LOG[..first].starts_with("消息记录"));
}

#[test]
fn test_report_sinks_agree() {
    let config = CheckinConfig::from_toml_str(CONFIG).unwrap();
    let (report, _) = audit(CHAT_LOG, &config);

    let table = render_table(&report, &TableOptions::new());
    assert!(table.contains("Alice Cooper(10"));
    assert!(table.contains("03-11(Mon)"));
    assert_eq!(table.matches(" OK ").count(), 5);

    let json: serde_json::Value =
        serde_json::from_str(&to_format_string(&report, OutputFormat::Json).unwrap()).unwrap();
    assert_eq!(json["rows"].as_array().unwrap().len(), 3);
    assert_eq!(json["rows"][0]["days"]["2024-03-18"][0], "打卡 renamed");

    let csv = to_format_string(&report, OutputFormat::Csv).unwrap();
    let mut reader = csv::Reader::from_reader(csv.trim_start_matches('\u{feff}').as_bytes());
    assert_eq!(reader.headers().unwrap().len(), 15);
    assert_eq!(reader.records().count(), 3);
}

#[test]
fn test_incremental_aggregator_matches_one_shot() {
    let config = CheckinConfig::from_toml_str(CONFIG).unwrap();
    let matcher = KeywordMatcher::new(&config.keywords).unwrap();
    let window = TargetWindow::ending_this_week(today(), config.weeks).unwrap();

    let mut aggregator = Aggregator::new(&matcher, &window, config.save_mode);
    let mut records = extract(CHAT_LOG);
    for record in records.by_ref() {
        aggregator.ingest(record);
    }
    assert_eq!(records.yielded(), 9);
    assert_eq!(records.skipped(), 0);

    let (index, stats) = aggregator.finish();
    let (expected_index, expected_stats) =
        aggregate(extract(CHAT_LOG), &matcher, &window, config.save_mode);
    assert_eq!(index, expected_index);
    assert_eq!(stats, expected_stats);
}

fn parse_records(text: &str) -> Vec<MessageRecord> {
    extract(text).collect()
}

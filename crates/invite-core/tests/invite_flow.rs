use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use invite_core::cli::Command;
use invite_core::commands::dispatch;
use invite_core::config::Config;
use invite_core::{CalendarEvent, build_ics, countdown_parts};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

const CUSTOM_CONFIG: &str = r#"
datetime_text = "Saturday, June 6, 2026 at 4pm"
starts_at = "2026-06-06T16:00:00-04:00"
duration_minutes = 180
timezone_id = "America/Toronto"
venue_name = "Lakeside Hall"
address = "1 Harbour Rd, Toronto"
photos = ["/cover.jpg"]

[groom]
name = "Alex"

[bride]
name = "Sam"
name_en = "Samantha"

[calendar]
week_start = "monday"
"#;

fn write_config(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("invite.toml");
    std::fs::write(&path, CUSTOM_CONFIG).expect("write config");
    path
}

fn run_command(cfg: &Config, command: Command, now: DateTime<Utc>) -> String {
    let mut out = Vec::new();
    dispatch(cfg, command, now, &mut out).expect("command succeeds");
    String::from_utf8(out).expect("utf8 output")
}

#[test]
fn loads_a_config_file_and_applies_defaults() {
    let temp = tempdir().expect("tempdir");
    let cfg = Config::load(Some(write_config(temp.path()).as_path())).expect("load config");

    assert_eq!(cfg.invitation.couple(), "Alex ♥ Sam");
    assert_eq!(cfg.invitation.couple_en(), "Alex & Samantha");
    assert_eq!(cfg.invitation.share_title_suffix, "Wedding Invitation");
    assert!(cfg.invitation.gallery_photos().is_empty());
    assert_eq!(cfg.invitation.calendar_focus(), (2026, 6, 6));
    assert!(cfg.loaded_file.is_some());
}

#[test]
fn missing_config_file_is_an_error() {
    let temp = tempdir().expect("tempdir");
    let err = Config::load(Some(temp.path().join("absent.toml").as_path())).expect_err("missing file");
    assert!(format!("{err:#}").contains("failed to read"));
}

#[test]
fn countdown_command_reports_remaining_time() {
    let cfg = Config::embedded().expect("embedded");
    let now = Utc
        .with_ymd_and_hms(2026, 2, 18, 23, 59, 59)
        .single()
        .expect("valid now");

    let text = run_command(&cfg, Command::Countdown { now: None, json: false }, now);
    assert!(text.contains("1 days 00:00:01 left"), "{text}");

    let json = run_command(&cfg, Command::Countdown { now: None, json: true }, now);
    let parsed: serde_json::Value = serde_json::from_str(&json).expect("json output");
    assert_eq!(parsed["days"], 1);
    assert_eq!(parsed["seconds"], 1);
}

#[test]
fn countdown_after_the_ceremony_is_finished() {
    let cfg = Config::embedded().expect("embedded");
    let now = Utc
        .with_ymd_and_hms(2027, 1, 1, 0, 0, 0)
        .single()
        .expect("valid now");

    let text = run_command(&cfg, Command::Countdown { now: None, json: false }, now);
    assert!(text.contains("The day has arrived."));
}

#[test]
fn calendar_command_uses_configured_week_start() {
    let temp = tempdir().expect("tempdir");
    let cfg = Config::load(Some(write_config(temp.path()).as_path())).expect("load config");

    let json = run_command(
        &cfg,
        Command::Calendar {
            year: None,
            month: None,
            week_start: None,
            json: true,
        },
        Utc::now(),
    );
    let parsed: serde_json::Value = serde_json::from_str(&json).expect("json output");

    assert_eq!(parsed["highlight"], 6);
    assert_eq!(parsed["week_start"], "Mon");
    // 2026-06-01 is a Monday
    assert_eq!(parsed["weeks"][0][0], 1);
    assert_eq!(parsed["weeks"][0][5], 6);
}

#[test]
fn calendar_for_another_month_has_no_highlight() {
    let cfg = Config::embedded().expect("embedded");
    let text = run_command(
        &cfg,
        Command::Calendar {
            year: Some(2026),
            month: Some(3),
            week_start: Some("sunday".to_string()),
            json: false,
        },
        Utc::now(),
    );

    assert!(text.contains("March 2026"));
    assert!(!text.contains('*'));
}

#[test]
fn ics_command_writes_into_a_directory() {
    let temp = tempdir().expect("tempdir");
    let cfg = Config::load(Some(write_config(temp.path()).as_path())).expect("load config");

    let printed = run_command(
        &cfg,
        Command::Ics {
            out: Some(temp.path().to_path_buf()),
        },
        Utc::now(),
    );
    let written = temp.path().join("alex-sam.ics");
    assert_eq!(printed.trim(), written.display().to_string());

    let doc = std::fs::read_to_string(&written).expect("read ics");
    assert!(doc.contains("DTSTART;TZID=America/Toronto:20260606T160000\r\n"));
    assert!(doc.contains("DTEND;TZID=America/Toronto:20260606T190000\r\n"));
    assert!(doc.contains("LOCATION:Lakeside Hall\\, 1 Harbour Rd\\, Toronto\r\n"));
    assert!(doc.contains("DESCRIPTION:Lakeside Hall\\n1 Harbour Rd\\, Toronto\r\n"));
}

#[test]
fn ics_command_refuses_an_unknown_zone() {
    let mut cfg = Config::embedded().expect("embedded");
    cfg.apply_overrides([("timezone_id".to_string(), "Nowhere/Special".to_string())])
        .expect("override applies");

    let mut out = Vec::new();
    let err = dispatch(&cfg, Command::Ics { out: None }, Utc::now(), &mut out)
        .expect_err("invalid zone");
    assert!(format!("{err:#}").contains("unknown timezone id"));
    assert!(out.is_empty());
}

#[test]
fn ics_document_matches_exactly() {
    let day = NaiveDate::from_ymd_opt(2026, 2, 19).expect("valid date");
    let event = CalendarEvent {
        title: "Test Event".to_string(),
        start_local: day.and_hms_opt(19, 0, 0).expect("valid time"),
        end_local: day.and_hms_opt(21, 0, 0).expect("valid time"),
        timezone_id: "America/Toronto".to_string(),
        location: "Hall".to_string(),
        description: "Line1\nLine2".to_string(),
    };

    let expected = [
        "BEGIN:VCALENDAR",
        "VERSION:2.0",
        "CALSCALE:GREGORIAN",
        "BEGIN:VEVENT",
        "DTSTART;TZID=America/Toronto:20260219T190000",
        "DTEND;TZID=America/Toronto:20260219T210000",
        "SUMMARY:Test Event",
        "DESCRIPTION:Line1\\nLine2",
        "LOCATION:Hall",
        "END:VEVENT",
        "END:VCALENDAR",
        "",
    ]
    .join("\r\n");

    assert_eq!(build_ics(&event), expected);
}

#[test]
fn links_and_share_text_are_printed() {
    let cfg = Config::embedded().expect("embedded");

    let links = run_command(&cfg, Command::Links, Utc::now());
    assert!(links.contains("https://www.google.com/maps/search/?api=1&query=8018%20Yonge"));
    assert!(links.contains("https://calendar.google.com/calendar/render?action=TEMPLATE"));

    let share = run_command(&cfg, Command::ShareText, Utc::now());
    assert!(share.starts_with("남궁혁 ♥ 최예슬 | 모바일 청첩장\n\n"));
}

#[test]
fn countdown_and_event_agree_on_the_start() {
    let cfg = Config::embedded().expect("embedded");
    let event = cfg.invitation.calendar_event();
    let start = cfg.invitation.wedding_instant();

    assert_eq!(event.start_local, start.naive_local());
    assert!(countdown_parts(&start, &start).is_finished());
}

// Aggregates the bundled demo data the way the binary does.

use chrono::NaiveDate;
use std::collections::HashSet;
use std::path::PathBuf;

use rota::agenda::Agenda;
use rota::datetime::{CalendarTz, MonthIndex};
use rota::model::Viewer;
use rota::provider::{load_provider, FixtureProvider, Provider};
use rota::ui::day_detail;
use rota::window::{MonthWindow, ScrollMetrics};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("portal.toml")
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn berlin() -> CalendarTz {
    "Europe/Berlin".parse().unwrap()
}

#[test]
fn staff_view() {
    let provider = FixtureProvider::from_file(&fixture_path()).unwrap();
    assert_eq!(provider.name(), "portal");

    let agenda =
        Agenda::from_provider(&provider, &Viewer::new("staff1", false), &berlin()).unwrap();

    // 05-04 event+meeting+shifts, 05-18 event, 05-22 own absence
    assert_eq!(agenda.len(), 3);

    let busy = agenda.day(&ymd(2024, 5, 4)).unwrap();
    assert!(busy.has_event() && busy.has_meeting() && busy.has_shift());
    assert!(!busy.has_staff_availability());
    assert_eq!(busy.shifts().len(), 2);
    assert_eq!(busy.meeting().unwrap().attending_count(), 2);

    let open_air = agenda.day(&ymd(2024, 5, 18)).unwrap();
    assert!(open_air.has_event() && !open_air.has_shift());

    let off = agenda.day(&ymd(2024, 5, 22)).unwrap();
    assert!(off.has_availability() && !off.has_staff_availability());
}

#[test]
fn owner_view() {
    let provider = load_provider(&fixture_path()).unwrap();
    let agenda =
        Agenda::from_provider(provider.as_ref(), &Viewer::new("staff1", true), &berlin()).unwrap();

    let busy = agenda.day(&ymd(2024, 5, 4)).unwrap();
    assert!(busy.has_staff_availability());
    assert_eq!(busy.staff_availability().unwrap().user_id, "staff2");

    let off = agenda.day(&ymd(2024, 5, 22)).unwrap();
    assert!(off.has_availability() && off.has_staff_availability());

    let days = agenda.into_days();
    let unique: HashSet<&str> = days.iter().map(|d| d.date_string()).collect();
    assert_eq!(unique.len(), days.len());
}

#[test]
fn scroll_session_over_fixture() {
    let provider = load_provider(&fixture_path()).unwrap();
    let agenda =
        Agenda::from_provider(provider.as_ref(), &Viewer::new("staff1", false), &berlin()).unwrap();

    let today = ymd(2024, 5, 15);
    let mut window = MonthWindow::new(today);
    let mut len = window.len();
    for top in (0..3000).step_by(150) {
        window.on_scroll(ScrollMetrics::new(top as f64, 3000.0, 600.0));
        assert!(window.len() >= len);
        len = window.len();
    }

    let may = MonthIndex::from(today);
    assert!(window.contains(&may));
    assert_eq!(agenda.days_of_month(may).count(), 3);
    assert_eq!(window.jump_to_today(today).anchor, "month-2024-05");

    let detail = day_detail(ymd(2024, 5, 4), &agenda);
    assert!(detail.contains("[shift] Bar 22:30 - 02:00 (event event1)"));
    assert!(detail.contains("[shift] Garderobe 02:00 - 06:00 (event event1)"));
    assert!(!detail.contains("Kasse"));
}

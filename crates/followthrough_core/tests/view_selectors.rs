use chrono::NaiveDate;
use followthrough_core::view::{counters, first_overdue_id, visible};
use followthrough_core::{
    Counters, Followup, FollowupStatus, SortDir, SortKey, StatusFilter, ViewState,
};

fn day(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

fn item(id: &str, company: &str, due_at: &str, status: FollowupStatus, created_at: &str) -> Followup {
    Followup {
        id: id.to_string(),
        workspace_id: "w_demo".to_string(),
        owner_id: "u_demo".to_string(),
        contact_name: format!("Contact {id}"),
        company_name: company.to_string(),
        next_step: "Send recap".to_string(),
        due_at: due_at.to_string(),
        status,
        created_at: created_at.to_string(),
    }
}

fn sample() -> Vec<Followup> {
    vec![
        item("a", "northwind", "2026-01-08", FollowupStatus::Sent, "2026-01-01 10:00:00"),
        item("b", "AltoSoft", "2026-01-10", FollowupStatus::Open, "2026-01-03 10:00:00"),
        item("c", "Brightline", "2026-01-13", FollowupStatus::Waiting, "2026-01-02 10:00:00"),
        item("d", "Zephyr", "2026-01-01", FollowupStatus::Done, "2026-01-04 10:00:00"),
        item("e", "Copper", "2026-01-12", FollowupStatus::Followup, "2026-01-05 10:00:00"),
    ]
}

fn ids(items: &[&Followup]) -> Vec<String> {
    items.iter().map(|item| item.id.clone()).collect()
}

#[test]
fn default_view_sorts_by_due_ascending() {
    let items = sample();
    let shown = visible(&items, &ViewState::default(), day("2026-01-10"));
    assert_eq!(ids(&shown), vec!["d", "a", "b", "e", "c"]);
}

#[test]
fn status_filter_and_query_combine() {
    let items = sample();
    let state = ViewState {
        query: "  ALTO ".to_string(),
        ..ViewState::default()
    };
    assert_eq!(ids(&visible(&items, &state, day("2026-01-10"))), vec!["b"]);

    let state = ViewState {
        status_filter: StatusFilter::Only(FollowupStatus::Waiting),
        ..ViewState::default()
    };
    assert_eq!(ids(&visible(&items, &state, day("2026-01-10"))), vec!["c"]);

    let state = ViewState {
        query: "contact".to_string(),
        status_filter: StatusFilter::Only(FollowupStatus::Done),
        ..ViewState::default()
    };
    assert_eq!(ids(&visible(&items, &state, day("2026-01-10"))), vec!["d"]);
}

#[test]
fn company_sort_is_case_insensitive_and_reversible() {
    let items = sample();
    let mut state = ViewState {
        sort_by: SortKey::Company,
        ..ViewState::default()
    };
    let today = day("2026-01-10");
    assert_eq!(ids(&visible(&items, &state, today)), vec!["b", "c", "e", "a", "d"]);

    state.sort_dir = SortDir::Desc;
    assert_eq!(ids(&visible(&items, &state, today)), vec!["d", "a", "e", "c", "b"]);
}

#[test]
fn created_at_and_risk_sorts() {
    let items = sample();
    let today = day("2026-01-10");

    let state = ViewState {
        sort_by: SortKey::CreatedAt,
        sort_dir: SortDir::Desc,
        ..ViewState::default()
    };
    assert_eq!(ids(&visible(&items, &state, today)), vec!["e", "d", "b", "c", "a"]);

    let state = ViewState {
        sort_by: SortKey::Risk,
        sort_dir: SortDir::Desc,
        ..ViewState::default()
    };
    let shown = visible(&items, &state, today);
    assert_eq!(shown.first().map(|item| item.id.as_str()), Some("e"));
    assert_eq!(shown.last().map(|item| item.id.as_str()), Some("d"));
}

#[test]
fn counters_ignore_filters_and_done() {
    let items = sample();
    assert_eq!(
        counters(&items, day("2026-01-10")),
        Counters {
            needs_today: 3,
            overdue: 1,
        }
    );
}

#[test]
fn first_overdue_follows_display_order() {
    let items = sample();
    let today = day("2026-01-10");
    let shown = visible(&items, &ViewState::default(), today);
    assert_eq!(first_overdue_id(&shown, today), Some("a"));

    let state = ViewState {
        status_filter: StatusFilter::Only(FollowupStatus::Open),
        ..ViewState::default()
    };
    let shown = visible(&items, &state, today);
    assert_eq!(first_overdue_id(&shown, today), None);
}

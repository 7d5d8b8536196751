use super::*;
use snipvault_core::test_support::{snippet, SnippetFixture};
use snipvault_core::view::{SnippetFilters, ViewKind};
use std::time::Instant;

#[test]
fn view_change_fetches_derived_plan_and_tracks_loading() {
    let mut harness = make_store();
    harness.store.set_current_view(ViewKind::Favorites, None);

    assert_eq!(take_fetch_plan(&harness), FetchPlan::Favorites);
    assert!(harness.store.is_loading());

    harness.store.apply_event(CoreEvent::SnippetsLoaded {
        plan: FetchPlan::Favorites,
        ticket: 1,
        items: vec![snippet("a").favorite(), snippet("b")],
    });
    assert!(!harness.store.is_loading());
    assert_eq!(visible_ids(&harness.store), vec!["a"]);
}

#[test]
fn fetch_failure_keeps_previous_list_and_reports() {
    let mut harness = make_store();
    load_snippets(&mut harness, vec![snippet("a"), snippet("b")]);

    harness.store.fetch_snippets();
    let ticket = match recv_cmd(&harness.cmd_rx) {
        CoreCmd::FetchSnippets { ticket, .. } => ticket,
        other => panic!("unexpected command: {:?}", other),
    };
    assert!(harness.store.is_loading());
    harness.store.apply_event(error_event(
        CoreErrorSource::Fetch { ticket },
        "Load snippets failed: Could not connect to the snippet server",
    ));

    assert!(!harness.store.is_loading());
    assert_eq!(harness.store.snippets().len(), 2);
    assert_eq!(
        harness.store.error(),
        Some("Load snippets failed: Could not connect to the snippet server")
    );
    let notes: Vec<&Notification> = harness.store.notifications().collect();
    assert_eq!(notes.len(), 1);
    assert!(notes[0].is_error);
}

#[test]
fn stale_fetch_responses_are_dropped() {
    let mut harness = make_store();
    harness.store.fetch_snippets();
    harness.store.fetch_snippets();
    let first = match recv_cmd(&harness.cmd_rx) {
        CoreCmd::FetchSnippets { ticket, .. } => ticket,
        other => panic!("unexpected command: {:?}", other),
    };
    let second = match recv_cmd(&harness.cmd_rx) {
        CoreCmd::FetchSnippets { ticket, .. } => ticket,
        other => panic!("unexpected command: {:?}", other),
    };
    assert!(second > first);

    harness.store.apply_event(CoreEvent::SnippetsLoaded {
        plan: FetchPlan::All,
        ticket: first,
        items: vec![snippet("old")],
    });
    assert!(harness.store.snippets().is_empty());
    harness
        .store
        .apply_event(error_event(CoreErrorSource::Fetch { ticket: first }, "late"));
    assert!(harness.store.error().is_none());

    harness.store.apply_event(CoreEvent::SnippetsLoaded {
        plan: FetchPlan::All,
        ticket: second,
        items: vec![snippet("new")],
    });
    assert_eq!(visible_ids(&harness.store), vec!["new"]);
    assert!(!harness.store.is_loading());
}

#[test]
fn burst_of_keystrokes_sends_one_search_for_last_query() {
    let mut harness = make_store();
    let start = Instant::now();
    harness.store.set_search_query_at("a", start);
    harness
        .store
        .set_search_query_at("ab", start + Duration::from_millis(100));
    harness
        .store
        .set_search_query_at("abc", start + Duration::from_millis(200));

    assert!(!harness.store.tick_at(start + Duration::from_millis(400)));
    assert_no_cmd(&harness.cmd_rx);

    assert!(harness.store.tick_at(start + Duration::from_millis(500)));
    assert_eq!(
        take_fetch_plan(&harness),
        FetchPlan::Search {
            query: "abc".to_string(),
            filters: SnippetFilters::default(),
        }
    );

    assert!(!harness.store.tick_at(start + Duration::from_secs(5)));
    assert_no_cmd(&harness.cmd_rx);
}

#[test]
fn query_already_sent_is_not_resent() {
    let mut harness = make_store();
    let start = Instant::now();
    harness.store.set_search_query_at("abc", start);
    assert!(harness.store.tick_at(start + TEST_DEBOUNCE));
    let _ = take_fetch_plan(&harness);

    harness
        .store
        .set_search_query_at("abcd", start + Duration::from_secs(1));
    harness
        .store
        .set_search_query_at("abc", start + Duration::from_millis(1_050));
    assert!(!harness.store.tick_at(start + Duration::from_secs(3)));
    assert_no_cmd(&harness.cmd_rx);
}

#[test]
fn clearing_query_refetches_plain_view_immediately() {
    let mut harness = make_store();
    let start = Instant::now();
    harness.store.set_search_query_at("rust", start);
    assert!(harness.store.tick_at(start + TEST_DEBOUNCE));
    let _ = take_fetch_plan(&harness);

    harness
        .store
        .set_search_query_at("   ", start + Duration::from_secs(1));
    assert_eq!(take_fetch_plan(&harness), FetchPlan::All);
    assert!(harness.store.search_deadline().is_none());
}

#[test]
fn tag_mode_search_keeps_view_filters() {
    let mut harness = make_store();
    harness
        .store
        .set_current_view(ViewKind::Category, Some("c1".to_string()));
    assert_eq!(take_fetch_plan(&harness), FetchPlan::Category("c1".to_string()));

    let start = Instant::now();
    harness.store.set_search_query_at("#Rust", start);
    assert!(harness.store.tick_at(start + TEST_DEBOUNCE));
    assert_eq!(
        take_fetch_plan(&harness),
        FetchPlan::List {
            filters: SnippetFilters {
                category_id: Some("c1".to_string()),
                tag: Some("rust".to_string()),
                ..SnippetFilters::default()
            },
        }
    );
}

#[test]
fn typing_filters_local_list_before_the_server_answers() {
    let mut harness = make_store();
    load_snippets(
        &mut harness,
        vec![
            snippet("a").titled("Parse JSON"),
            snippet("b").titled("Read file"),
        ],
    );

    harness.store.set_search_query("json");
    assert_eq!(visible_ids(&harness.store), vec!["a"]);
    assert_no_cmd(&harness.cmd_rx);
}

#[test]
fn view_change_cancels_pending_search_timer() {
    let mut harness = make_store();
    let start = Instant::now();
    harness.store.set_search_query_at("rust", start);
    harness.store.set_current_view(ViewKind::RecycleBin, None);
    assert_eq!(
        take_fetch_plan(&harness),
        FetchPlan::Search {
            query: "rust".to_string(),
            filters: SnippetFilters {
                deleted: Some(true),
                ..SnippetFilters::default()
            },
        }
    );

    assert!(!harness.store.tick_at(start + Duration::from_secs(1)));
    assert_no_cmd(&harness.cmd_rx);
}

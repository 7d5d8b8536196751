use super::*;
use snipvault_core::models::{Collection, UpdateCategoryRequest};
use snipvault_core::test_support::{category, named_category, snippet, tag, SnippetFixture};
use snipvault_core::view::ViewKind;

fn chain(harness: &mut TestHarness) {
    load_categories(
        harness,
        vec![
            category("1", None),
            category("2", Some("1")),
            category("3", Some("2")),
        ],
    );
}

#[test]
fn move_into_descendant_is_rejected_before_any_request() {
    let mut harness = make_store();
    chain(&mut harness);

    assert!(!harness.store.move_category("1", Some("3")));
    assert_eq!(
        harness.store.error(),
        Some("Cannot move category '1' into itself or one of its descendants")
    );
    assert!(!harness.store.move_category("2", Some("2")));
    assert_no_cmd(&harness.cmd_rx);
}

#[test]
fn move_to_missing_parent_is_rejected() {
    let mut harness = make_store();
    chain(&mut harness);
    assert!(!harness.store.move_category("3", Some("ghost")));
    assert_eq!(harness.store.error(), Some("Category not found: ghost"));
    assert_no_cmd(&harness.cmd_rx);
}

#[test]
fn move_is_an_update_with_only_the_parent() {
    let mut harness = make_store();
    chain(&mut harness);

    assert!(harness.store.move_category("3", None));
    match recv_cmd(&harness.cmd_rx) {
        CoreCmd::UpdateCategory { id, request } => {
            assert_eq!(id, "3");
            assert_eq!(request, UpdateCategoryRequest::move_to(None));
        }
        other => panic!("unexpected command: {:?}", other),
    }

    harness.store.apply_event(CoreEvent::CategorySaved {
        category: category("3", None),
    });
    let roots: Vec<&str> = harness
        .store
        .category_index()
        .rows(harness.store.categories(), None)
        .iter()
        .filter(|row| row.depth == 0)
        .map(|row| row.category.id.as_str())
        .collect();
    assert_eq!(roots, vec!["1", "3"]);
}

#[test]
fn move_is_allowed_past_an_unrelated_loop() {
    let mut harness = make_store();
    load_categories(
        &mut harness,
        vec![
            category("a", None),
            category("x", Some("y")),
            category("y", Some("x")),
        ],
    );

    assert!(harness.store.move_category("a", Some("x")));
    match recv_cmd(&harness.cmd_rx) {
        CoreCmd::UpdateCategory { id, request } => {
            assert_eq!(id, "a");
            assert_eq!(request, UpdateCategoryRequest::move_to(Some("x".to_string())));
        }
        other => panic!("unexpected command: {:?}", other),
    }
    assert!(harness.store.error().is_none());

    assert!(!harness.store.move_category("x", Some("y")));
    assert_no_cmd(&harness.cmd_rx);
}

#[test]
fn rename_with_blank_name_is_rejected() {
    let mut harness = make_store();
    chain(&mut harness);
    assert!(!harness
        .store
        .update_category("2", UpdateCategoryRequest::rename("  ")));
    assert_eq!(harness.store.error(), Some("Name is required"));
    assert_no_cmd(&harness.cmd_rx);
}

#[test]
fn deleting_viewed_category_promotes_children_and_falls_back_to_all() {
    let mut harness = make_store();
    chain(&mut harness);
    load_snippets(
        &mut harness,
        vec![snippet("a").in_category("1"), snippet("b").in_category("2")],
    );
    harness
        .store
        .set_current_view(ViewKind::Category, Some("1".to_string()));
    let _ = take_fetch_plan(&harness);

    assert!(harness.store.delete_category("1"));
    let _ = recv_cmd(&harness.cmd_rx);
    harness.store.apply_event(CoreEvent::CategoryDeleted {
        id: "1".to_string(),
    });

    let ids: Vec<&str> = harness
        .store
        .categories()
        .iter()
        .map(|category| category.id.as_str())
        .collect();
    assert_eq!(ids, vec!["2", "3"]);
    assert_eq!(harness.store.categories()[0].parent_id, None);
    assert_eq!(
        harness.store.categories()[1].parent_id.as_deref(),
        Some("2")
    );
    assert_eq!(harness.store.snippet("a").expect("a").category_id, None);
    assert_eq!(
        harness.store.snippet("b").expect("b").category_id.as_deref(),
        Some("2")
    );
    assert_eq!(harness.store.view().kind, ViewKind::All);
    assert_eq!(take_fetch_plan(&harness), FetchPlan::All);
}

#[test]
fn create_tag_is_idempotent_by_name() {
    let mut harness = make_store();

    assert!(harness.store.create_tag("Foo"));
    match recv_cmd(&harness.cmd_rx) {
        CoreCmd::CreateTag { name } => assert_eq!(name, "Foo"),
        other => panic!("unexpected command: {:?}", other),
    }
    assert!(!harness.store.create_tag("foo"));
    assert_no_cmd(&harness.cmd_rx);

    harness.store.apply_event(CoreEvent::TagCreated {
        tag: tag("t1", "Foo"),
    });
    assert!(!harness.store.create_tag(" FOO "));
    assert_no_cmd(&harness.cmd_rx);
    assert_eq!(harness.store.tags().len(), 1);
    assert!(harness.store.error().is_none());
}

#[test]
fn failed_tag_create_can_be_retried() {
    let mut harness = make_store();
    harness.store.create_tag("cli");
    let _ = recv_cmd(&harness.cmd_rx);
    harness.store.apply_event(error_event(
        CoreErrorSource::TagCreate {
            name: "cli".to_string(),
        },
        "Create tag failed: Tag already exists",
    ));

    assert!(harness.store.create_tag("CLI"));
    assert!(matches!(
        recv_cmd(&harness.cmd_rx),
        CoreCmd::CreateTag { .. }
    ));
}

#[test]
fn rename_tag_rewrites_snippet_tags() {
    let mut harness = make_store();
    load_tags(&mut harness, vec![tag("t1", "js"), tag("t2", "web")]);
    load_snippets(
        &mut harness,
        vec![
            snippet("a").tagged(&["js", "web"]),
            snippet("b").tagged(&["web"]),
        ],
    );

    assert!(!harness.store.rename_tag("t1", "WEB"));
    assert_eq!(harness.store.error(), Some("Tag already exists: WEB"));
    assert_no_cmd(&harness.cmd_rx);

    assert!(harness.store.rename_tag("t1", "javascript"));
    let _ = recv_cmd(&harness.cmd_rx);
    harness.store.apply_event(CoreEvent::TagSaved {
        tag: tag("t1", "javascript"),
    });

    assert_eq!(
        harness.store.snippet("a").expect("a").tags,
        vec!["javascript".to_string(), "web".to_string()]
    );
    assert_eq!(harness.store.tags()[0].name, "javascript");
}

#[test]
fn delete_tag_strips_name_and_leaves_tag_view() {
    let mut harness = make_store();
    load_tags(&mut harness, vec![tag("t1", "rust")]);
    load_snippets(
        &mut harness,
        vec![snippet("a").tagged(&["rust", "cli"]), snippet("b")],
    );
    harness
        .store
        .set_current_view(ViewKind::Tag, Some("t1".to_string()));
    let _ = take_fetch_plan(&harness);
    assert_eq!(visible_ids(&harness.store), vec!["a"]);

    harness.store.delete_tag("t1");
    let _ = recv_cmd(&harness.cmd_rx);
    harness.store.apply_event(CoreEvent::TagDeleted {
        id: "t1".to_string(),
    });

    assert!(harness.store.tags().is_empty());
    assert_eq!(
        harness.store.snippet("a").expect("a").tags,
        vec!["cli".to_string()]
    );
    assert_eq!(harness.store.view().kind, ViewKind::All);
    assert_eq!(take_fetch_plan(&harness), FetchPlan::All);
}

#[test]
fn collections_track_saves_deletes_and_membership() {
    let mut harness = make_store();
    assert!(!harness.store.create_collection(" ", None));
    assert_no_cmd(&harness.cmd_rx);

    assert!(harness
        .store
        .create_collection("Favorites at work", Some(String::new())));
    match recv_cmd(&harness.cmd_rx) {
        CoreCmd::CreateCollection { request } => {
            assert_eq!(request.name, "Favorites at work");
            assert_eq!(request.description, None);
        }
        other => panic!("unexpected command: {:?}", other),
    }

    let collection = Collection::new("Favorites at work", None);
    let collection_id = collection.id.clone();
    harness.store.apply_event(CoreEvent::CollectionSaved { collection });
    assert_eq!(harness.store.collections().len(), 1);

    assert!(!harness.store.add_to_collection("ghost", "a"));
    assert!(harness.store.add_to_collection(&collection_id, "a"));
    let _ = recv_cmd(&harness.cmd_rx);
    harness
        .store
        .apply_event(CoreEvent::CollectionMembershipChanged {
            collection_id: collection_id.clone(),
            snippet_id: "a".to_string(),
            member: true,
        });
    assert!(harness
        .store
        .notifications()
        .any(|note| note.text == "Added to Favorites at work."));

    harness
        .store
        .apply_event(CoreEvent::CollectionDeleted { id: collection_id });
    assert!(harness.store.collections().is_empty());
}

#[test]
fn tree_rows_use_category_names() {
    let mut harness = make_store();
    load_categories(
        &mut harness,
        vec![
            named_category("1", "Backend", None),
            named_category("2", "Rust", Some("1")),
        ],
    );
    let labels: Vec<(usize, &str)> = harness
        .store
        .category_index()
        .rows(harness.store.categories(), None)
        .iter()
        .map(|row| (row.depth, row.category.name.as_str()))
        .collect();
    assert_eq!(labels, vec![(0, "Backend"), (1, "Rust")]);
}

#[test]
fn non_ascii_tag_names_fold_case() {
    let mut harness = make_store();
    harness.store.apply_event(CoreEvent::TagCreated {
        tag: tag("t1", "Éclair"),
    });
    assert!(!harness.store.create_tag("éclair"));
    assert!(!harness.store.create_tag("ÉCLAIR"));
    assert_no_cmd(&harness.cmd_rx);

    assert!(harness.store.create_tag("Ünïcode"));
    let _ = recv_cmd(&harness.cmd_rx);
    assert!(!harness.store.create_tag("üNÏCODE"));
    assert_no_cmd(&harness.cmd_rx);

    load_snippets(
        &mut harness,
        vec![snippet("a").tagged(&["éclair"]), snippet("b")],
    );
    harness
        .store
        .set_current_view(ViewKind::Tag, Some("t1".to_string()));
    let _ = take_fetch_plan(&harness);
    assert_eq!(visible_ids(&harness.store), vec!["a"]);
}

#[test]
fn non_ascii_rename_and_delete_rewrite_snippet_tags() {
    let mut harness = make_store();
    load_tags(&mut harness, vec![tag("t1", "Straße"), tag("t2", "Ωmega")]);
    load_snippets(
        &mut harness,
        vec![snippet("a").tagged(&["straße", "ωmega"])],
    );

    harness.store.apply_event(CoreEvent::TagSaved {
        tag: tag("t1", "road"),
    });
    assert_eq!(
        harness.store.snippet("a").expect("a").tags,
        vec!["road".to_string(), "ωmega".to_string()]
    );

    harness.store.apply_event(CoreEvent::TagDeleted {
        id: "t2".to_string(),
    });
    assert_eq!(
        harness.store.snippet("a").expect("a").tags,
        vec!["road".to_string()]
    );
}

//! Unit tests for the `snipv` CLI entrypoint module.

use super::{
    check_move, execute, explicit_server_override, format_category_tree, format_snippet,
    format_snippet_list, format_tags, read_code, resolve_category, resolve_config, Cli, Commands,
    OutputOptions,
};
use clap::Parser;
use snipvault_client::{MemoryApi, SnippetApi};
use snipvault_core::env::{env_lock, EnvGuard};
use snipvault_core::models::Language;
use snipvault_core::test_support::{category, named_category, snippet, tag, SnippetFixture};
use snipvault_core::view::ViewKind;
use snipvault_core::config::{PERF_LOG_ENV, SERVER_ENV, TIMEOUT_ENV};
use snipvault_core::{CoreError, DEFAULT_SERVER_URL, DEFAULT_TIMEOUT_SECS};
use std::io::Write;

fn seeded_api() -> MemoryApi {
    let api = MemoryApi::new();
    api.seed_category(named_category("c1", "Backend", None));
    api.seed_category(named_category("c2", "Rust", Some("c1")));
    api.seed_tag(tag("t1", "rust"));
    api.seed_snippet(
        snippet("a")
            .titled("Parse JSON")
            .in_category("c2")
            .tagged(&["rust"]),
    );
    api.seed_snippet(snippet("b").favorite());
    api.seed_snippet(snippet("c").deleted());
    api
}

fn run(api: &MemoryApi, args: &[&str], stdin: &str) -> Result<String, String> {
    let cli = Cli::try_parse_from(args.iter().copied()).expect("cli should parse");
    let opts = OutputOptions {
        json: cli.json,
        timing: false,
    };
    execute(api, cli.command, &opts, &mut stdin.as_bytes()).map_err(|err| err.to_string())
}

#[test]
fn cli_parses_view_and_repeated_tags() {
    let cli = Cli::try_parse_from(["snipv", "list", "--view", "recycle-bin"])
        .expect("cli should parse list");
    match cli.command {
        Commands::List { view, id } => {
            assert_eq!(view, ViewKind::RecycleBin);
            assert!(id.is_none());
        }
        _ => panic!("expected list command"),
    }

    let cli = Cli::try_parse_from([
        "snipv", "new", "--title", "t", "-l", "Rust", "--tag", "a", "--tag", "b",
    ])
    .expect("cli should parse new");
    match cli.command {
        Commands::New {
            language, tags, ..
        } => {
            assert_eq!(language, Language::Rust);
            assert_eq!(tags, vec!["a".to_string(), "b".to_string()]);
        }
        _ => panic!("expected new command"),
    }
}

#[test]
fn cli_rejects_unknown_view_and_language() {
    assert!(Cli::try_parse_from(["snipv", "list", "--view", "archive"]).is_err());
    assert!(Cli::try_parse_from(["snipv", "new", "--title", "t", "-l", "cobol"]).is_err());
}

#[test]
fn server_env_value_is_used_and_blank_falls_back() {
    let _lock = env_lock().lock().expect("env lock");
    let _timeout = EnvGuard::remove(TIMEOUT_ENV);
    {
        let _server = EnvGuard::set(SERVER_ENV, "http://127.0.0.1:47777/api");
        let cli = Cli::parse_from(["snipv", "tags"]);
        let config = resolve_config(cli.server, cli.timeout);
        assert_eq!(config.server_url, "http://127.0.0.1:47777/api");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    let _server = EnvGuard::remove(SERVER_ENV);
    assert_eq!(explicit_server_override(Some("   ".to_string())), None);
    let config = resolve_config(Some(" ".to_string()), None);
    assert_eq!(config.server_url, DEFAULT_SERVER_URL);
}

#[test]
fn timeout_env_is_honored_and_flag_overrides_it() {
    let _lock = env_lock().lock().expect("env lock");
    let _server = EnvGuard::remove(SERVER_ENV);
    let _timeout = EnvGuard::set(TIMEOUT_ENV, "45");
    let _perf = EnvGuard::set(PERF_LOG_ENV, "1");

    let cli = Cli::parse_from(["snipv", "tags"]);
    let config = resolve_config(cli.server, cli.timeout);
    assert_eq!(config.timeout_secs, 45);
    assert!(config.perf_log);

    let cli = Cli::parse_from(["snipv", "-t", "5", "--server", "http://10.0.0.9/api", "tags"]);
    let config = resolve_config(cli.server, cli.timeout);
    assert_eq!(config.timeout_secs, 5);
    assert_eq!(config.server_url, "http://10.0.0.9/api");

    assert_eq!(resolve_config(None, Some(0)).timeout_secs, 45);
}

#[test]
fn snippet_list_marks_favorites_and_keeps_json_shape() {
    let items = vec![snippet("a").tagged(&["x", "y"]), snippet("b").favorite()];
    let text = format_snippet_list(&items, false).expect("text output");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("a "));
    assert!(lines[0].ends_with("x,y"));
    assert!(lines[1].contains(" * b"));

    let rendered = format_snippet_list(&items, true).expect("json output");
    let parsed: serde_json::Value = serde_json::from_str(&rendered).expect("valid json");
    assert_eq!(parsed[1]["isFavorite"], true);
    assert_eq!(parsed[0]["tags"][1], "y");
}

#[test]
fn get_prints_code_or_full_json() {
    let item = snippet("a");
    assert_eq!(format_snippet(&item, false).expect("text"), "// a");
    let parsed: serde_json::Value =
        serde_json::from_str(&format_snippet(&item, true).expect("json")).expect("valid json");
    assert_eq!(parsed["id"], "a");
}

#[test]
fn category_tree_is_indented_by_depth() {
    let categories = vec![
        named_category("c2", "Rust", Some("c1")),
        named_category("c1", "Backend", None),
        named_category("c3", "Orphan", Some("gone")),
    ];
    let text = format_category_tree(&categories, false).expect("tree");
    let labels: Vec<&str> = text
        .lines()
        .map(|line| line.split_at(37).1)
        .collect();
    assert_eq!(labels, vec!["Backend", "— Rust", "Orphan"]);
}

#[test]
fn tags_show_counts() {
    let text = format_tags(&[tag("t1", "rust")], false).expect("tags");
    assert!(text.ends_with("rust (0)"));
}

#[test]
fn category_argument_resolves_by_id_then_name() {
    let categories = vec![named_category("c1", "Backend", None)];
    assert_eq!(
        resolve_category(&categories, "c1").map(|c| c.id.as_str()),
        Some("c1")
    );
    assert_eq!(
        resolve_category(&categories, " backend ").map(|c| c.id.as_str()),
        Some("c1")
    );
    assert!(resolve_category(&categories, "frontend").is_none());
}

#[test]
fn check_move_matrix() {
    let categories = vec![
        category("1", None),
        category("2", Some("1")),
        category("3", Some("2")),
        category("4", None),
    ];
    assert_eq!(check_move(&categories, "3", None), Ok(()));
    assert_eq!(check_move(&categories, "3", Some("4")), Ok(()));
    assert_eq!(
        check_move(&categories, "1", Some("3")),
        Err(CoreError::CyclicMove("1".to_string()))
    );
    assert_eq!(
        check_move(&categories, "2", Some("2")),
        Err(CoreError::CyclicMove("2".to_string()))
    );
    assert_eq!(
        check_move(&categories, "9", None),
        Err(CoreError::CategoryNotFound("9".to_string()))
    );
    assert_eq!(
        check_move(&categories, "1", Some("9")),
        Err(CoreError::CategoryNotFound("9".to_string()))
    );
}

#[test]
fn read_code_prefers_file_over_stdin() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "SELECT 1;").expect("write temp file");
    let code = read_code(Some(file.path()), &mut "ignored".as_bytes()).expect("read file");
    assert_eq!(code, "SELECT 1;");

    let code = read_code(None, &mut "from stdin".as_bytes()).expect("read stdin");
    assert_eq!(code, "from stdin");
}

#[test]
fn list_uses_the_view_endpoint() {
    let api = seeded_api();
    let out = run(&api, &["snipv", "list", "--view", "recycle-bin"], "").expect("list");
    assert!(out.starts_with("c "));
    assert_eq!(api.calls(), vec!["recycle_bin"]);

    let out = run(&api, &["snipv", "list", "--view", "category", "--id", "c2"], "")
        .expect("category list");
    assert!(out.starts_with("a "));
}

#[test]
fn search_in_tag_mode_filters_by_tag_name() {
    let api = seeded_api();
    let out = run(&api, &["snipv", "search", "#Rust"], "").expect("search");
    assert_eq!(out.lines().count(), 1);
    assert_eq!(api.calls(), vec!["list_snippets"]);
}

#[test]
fn new_reads_stdin_resolves_category_and_creates_tags() {
    let api = seeded_api();
    let out = run(
        &api,
        &[
            "snipv",
            "--json",
            "new",
            "--title",
            "Hello",
            "-l",
            "python",
            "-c",
            "backend",
            "--tag",
            "Rust",
            "--tag",
            "scripts",
        ],
        "print('hi')\n",
    )
    .expect("new");

    let created: serde_json::Value = serde_json::from_str(&out).expect("json output");
    assert_eq!(created["categoryId"], "c1");
    assert_eq!(created["code"], "print('hi')\n");
    assert_eq!(created["tags"], serde_json::json!(["rust", "scripts"]));

    let calls = api.calls();
    assert_eq!(
        calls,
        vec!["list_categories", "list_tags", "create_tag", "create_snippet"]
    );
    assert!(api
        .list_tags()
        .expect("tags")
        .iter()
        .any(|tag| tag.name == "scripts"));
}

#[test]
fn new_validation_failure_sends_nothing() {
    let api = seeded_api();
    let err = run(
        &api,
        &["snipv", "new", "--title", "Empty", "-l", "rust", "-c", "c1"],
        "  \n",
    )
    .expect_err("blank code should fail");
    assert_eq!(err, "New failed: Code is required");
    assert_eq!(api.calls(), vec!["list_categories"]);

    let err = run(
        &api,
        &["snipv", "new", "--title", "Orphan", "-l", "rust"],
        "x",
    )
    .expect_err("category is required when categories exist");
    assert_eq!(err, "New failed: Category is required");
}

#[test]
fn favorite_toggles_current_flag() {
    let api = seeded_api();
    let out = run(&api, &["snipv", "favorite", "b"], "").expect("favorite");
    assert_eq!(out, "Unfavorited: b");
    assert!(!api.snippet("b").expect("b").is_favorite);
}

#[test]
fn delete_and_restore_report_outcome() {
    let api = seeded_api();
    let out = run(&api, &["snipv", "delete", "a"], "").expect("delete");
    assert_eq!(out, "Moved to recycle bin: a");
    assert!(api.snippet("a").expect("a").is_deleted);

    let out = run(&api, &["snipv", "restore", "a"], "").expect("restore");
    assert_eq!(out, "Restored: Parse JSON");

    let out = run(&api, &["snipv", "delete", "--permanent", "c"], "").expect("purge");
    assert_eq!(out, "Permanently deleted: c");
    assert!(api.snippet("c").is_none());
}

#[test]
fn move_category_rejects_cycles_before_updating() {
    let api = seeded_api();
    let err = run(
        &api,
        &["snipv", "move-category", "c1", "--parent", "c2"],
        "",
    )
    .expect_err("cycle should fail");
    assert_eq!(
        err,
        "Move category failed: Cannot move category 'Backend' into itself or one of its descendants"
    );
    assert_eq!(api.calls(), vec!["list_categories"]);

    let out = run(&api, &["snipv", "move-category", "c2"], "").expect("move to root");
    assert_eq!(out, "Moved Rust under root");
    assert!(api.categories().iter().all(|c| c.parent_id.is_none()));
}

#[test]
fn missing_snippet_surfaces_server_message() {
    let api = seeded_api();
    let err = run(&api, &["snipv", "get", "nope"], "").expect_err("missing");
    assert!(err.starts_with("Get failed: "));
    assert!(err.contains("nope"));
}

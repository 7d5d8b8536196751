//! Command-line client for the SnipVault API.

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use snipvault_client::{HttpApi, SnippetApi};
use snipvault_core::category_tree::{tree_rows, valid_move_targets};
use snipvault_core::models::{
    Category, Language, Snippet, SnippetDraft, Tag, UpdateCategoryRequest,
};
use snipvault_core::view::{FetchPlan, ViewKind, ViewSelection};
use snipvault_core::{Config, CoreError};
use std::fmt::Display;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snipv", about = "SnipVault CLI", version)]
struct Cli {
    /// API base URL (can also be set via SNIPVAULT_SERVER env var)
    #[arg(short, long, env = "SNIPVAULT_SERVER")]
    server: Option<String>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    json: bool,

    /// Print timing for API requests
    #[arg(long, global = true)]
    timing: bool,

    /// Request timeout in seconds (default: SNIPVAULT_TIMEOUT_SECS or 30)
    #[arg(short = 't', long)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// List the snippets in a view
    List {
        /// all, favorites, recycle-bin, category, or tag
        #[arg(long, default_value = "all")]
        view: ViewKind,
        /// Category or tag id for `category` and `tag` views
        #[arg(long)]
        id: Option<String>,
    },
    /// Search snippet text; prefix with `#` to search by tag
    Search {
        query: String,
        #[arg(long, default_value = "all")]
        view: ViewKind,
        #[arg(long)]
        id: Option<String>,
    },
    /// Print a snippet's code
    Get { id: String },
    /// Create a snippet from a file or stdin
    New {
        #[arg(long)]
        title: String,
        #[arg(short, long)]
        language: Language,
        /// Category id or name
        #[arg(short, long)]
        category: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Move a snippet to the recycle bin
    Delete {
        id: String,
        /// Remove it for good instead
        #[arg(long)]
        permanent: bool,
    },
    /// Bring a snippet back from the recycle bin
    Restore { id: String },
    /// Toggle a snippet's favorite flag
    Favorite { id: String },
    /// Show the category tree
    Categories,
    /// Re-parent a category; omit --parent to make it a root
    MoveCategory {
        id: String,
        #[arg(long)]
        parent: Option<String>,
    },
    /// List tags
    Tags,
}

/// A failed command, printed as `"<action> failed: <message>"`.
#[derive(Debug, Error)]
#[error("{action} failed: {message}")]
struct CommandError {
    action: &'static str,
    message: String,
}

impl CommandError {
    fn new(action: &'static str, message: impl Display) -> Self {
        Self {
            action,
            message: message.to_string(),
        }
    }
}

trait OrFail<T> {
    fn or_fail(self, action: &'static str) -> Result<T, CommandError>;
}

impl<T, E: Display> OrFail<T> for Result<T, E> {
    fn or_fail(self, action: &'static str) -> Result<T, CommandError> {
        self.map_err(|err| CommandError::new(action, err))
    }
}

struct OutputOptions {
    json: bool,
    timing: bool,
}

fn log_timing(timing: bool, label: &str, duration: Duration) {
    if timing {
        eprintln!(
            "[timing] {}: {:.1} ms",
            label,
            duration.as_secs_f64() * 1000.0
        );
    }
}

fn timed<T>(timing: bool, label: &str, call: impl FnOnce() -> T) -> T {
    let started = Instant::now();
    let out = call();
    log_timing(timing, label, started.elapsed());
    out
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|err| format!("response encoding error: {}", err))
}

fn format_snippet_list(snippets: &[Snippet], json: bool) -> Result<String, String> {
    if json {
        return to_json(snippets);
    }
    let rows: Vec<String> = snippets
        .iter()
        .map(|snippet| {
            let marker = if snippet.is_favorite { '*' } else { ' ' };
            format!(
                "{:<36} {} {:<30} {:<10} {}",
                snippet.id,
                marker,
                snippet.title,
                snippet.language.as_str(),
                snippet.tags.join(",")
            )
            .trim_end()
            .to_string()
        })
        .collect();
    Ok(rows.join("\n"))
}

fn format_snippet(snippet: &Snippet, json: bool) -> Result<String, String> {
    if json {
        return to_json(snippet);
    }
    Ok(snippet.code.clone())
}

fn format_category_tree(categories: &[Category], json: bool) -> Result<String, String> {
    if json {
        return to_json(categories);
    }
    let rows: Vec<String> = tree_rows(categories, None)
        .iter()
        .map(|row| format!("{:<36} {}", row.category.id, row.label()))
        .collect();
    Ok(rows.join("\n"))
}

fn format_tags(tags: &[Tag], json: bool) -> Result<String, String> {
    if json {
        return to_json(tags);
    }
    let rows: Vec<String> = tags
        .iter()
        .map(|tag| format!("{:<36} {} ({})", tag.id, tag.name, tag.snippet_count))
        .collect();
    Ok(rows.join("\n"))
}

fn format_message(
    message: String,
    value: &impl serde::Serialize,
    json: bool,
) -> Result<String, String> {
    if json {
        return to_json(value);
    }
    Ok(message)
}

/// Resolve a category argument by id first, then by case-insensitive name.
fn resolve_category<'a>(categories: &'a [Category], needle: &str) -> Option<&'a Category> {
    let needle = needle.trim();
    categories
        .iter()
        .find(|category| category.id == needle)
        .or_else(|| {
            categories
                .iter()
                .find(|category| category.name.eq_ignore_ascii_case(needle))
        })
}

/// Reject moves the hierarchy cannot accept before contacting the server.
fn check_move(categories: &[Category], id: &str, parent: Option<&str>) -> Result<(), CoreError> {
    let Some(category) = categories.iter().find(|category| category.id == id) else {
        return Err(CoreError::CategoryNotFound(id.to_string()));
    };
    let Some(parent) = parent else {
        return Ok(());
    };
    if !categories.iter().any(|candidate| candidate.id == parent) {
        return Err(CoreError::CategoryNotFound(parent.to_string()));
    }
    let allowed = valid_move_targets(categories, id)
        .iter()
        .any(|target| target.id == parent);
    if !allowed {
        return Err(CoreError::CyclicMove(category.name.clone()));
    }
    Ok(())
}

fn read_code(file: Option<&Path>, stdin: &mut dyn Read) -> io::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            stdin.read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn execute(
    api: &dyn SnippetApi,
    command: Commands,
    opts: &OutputOptions,
    stdin: &mut dyn Read,
) -> Result<String, CommandError> {
    let OutputOptions { json, timing } = *opts;
    match command {
        Commands::Completions { .. } => Ok(String::new()),
        Commands::List { view, id } => {
            let view = ViewSelection::new(view, id);
            let plan = FetchPlan::derive(&view, "");
            debug!("list plan: {:?}", plan);
            let items = timed(timing, "list", || api.fetch(&plan)).or_fail("List")?;
            format_snippet_list(&items, json).or_fail("List")
        }
        Commands::Search { query, view, id } => {
            let view = ViewSelection::new(view, id);
            let plan = FetchPlan::derive(&view, &query);
            debug!("search plan: {:?}", plan);
            let items = timed(timing, "search", || api.fetch(&plan)).or_fail("Search")?;
            format_snippet_list(&items, json).or_fail("Search")
        }
        Commands::Get { id } => {
            let snippet = timed(timing, "get", || api.get_snippet(&id)).or_fail("Get")?;
            format_snippet(&snippet, json).or_fail("Get")
        }
        Commands::New {
            title,
            language,
            category,
            tags,
            description,
            file,
        } => {
            let code = read_code(file.as_deref(), stdin).or_fail("New")?;
            let categories = timed(timing, "categories", || api.list_categories()).or_fail("New")?;
            let category_id = match category.as_deref() {
                Some(needle) => Some(
                    resolve_category(&categories, needle)
                        .map(|category| category.id.clone())
                        .ok_or_else(|| CoreError::CategoryNotFound(needle.to_string()))
                        .or_fail("New")?,
                ),
                None => None,
            };
            let draft = SnippetDraft {
                title,
                description: description.unwrap_or_default(),
                code,
                language: Some(language),
                category_id,
                tags,
            };
            let request = draft.validate(!categories.is_empty()).or_fail("New")?;

            let known = timed(timing, "tags", || api.list_tags()).or_fail("New")?;
            for name in &request.tags {
                if !known.iter().any(|tag| tag.same_name(name)) {
                    timed(timing, "create tag", || api.create_tag(name)).or_fail("New")?;
                }
            }
            let snippet =
                timed(timing, "new", || api.create_snippet(&request)).or_fail("New")?;
            format_message(
                format!("Created: {} ({})", snippet.title, snippet.id),
                &snippet,
                json,
            )
            .or_fail("New")
        }
        Commands::Delete { id, permanent } => {
            if permanent {
                timed(timing, "delete", || api.permanent_delete_snippet(&id)).or_fail("Delete")?;
                let body = serde_json::json!({ "success": true, "id": id });
                format_message(format!("Permanently deleted: {}", id), &body, json)
                    .or_fail("Delete")
            } else {
                timed(timing, "delete", || api.delete_snippet(&id)).or_fail("Delete")?;
                let body = serde_json::json!({ "success": true, "id": id });
                format_message(format!("Moved to recycle bin: {}", id), &body, json)
                    .or_fail("Delete")
            }
        }
        Commands::Restore { id } => {
            let snippet =
                timed(timing, "restore", || api.restore_snippet(&id)).or_fail("Restore")?;
            format_message(format!("Restored: {}", snippet.title), &snippet, json)
                .or_fail("Restore")
        }
        Commands::Favorite { id } => {
            let current = timed(timing, "get", || api.get_snippet(&id)).or_fail("Favorite")?;
            let snippet = timed(timing, "favorite", || {
                api.set_favorite(&id, !current.is_favorite)
            })
            .or_fail("Favorite")?;
            let verb = if snippet.is_favorite {
                "Favorited"
            } else {
                "Unfavorited"
            };
            format_message(format!("{}: {}", verb, snippet.title), &snippet, json)
                .or_fail("Favorite")
        }
        Commands::Categories => {
            let categories =
                timed(timing, "categories", || api.list_categories()).or_fail("Categories")?;
            format_category_tree(&categories, json).or_fail("Categories")
        }
        Commands::MoveCategory { id, parent } => {
            let categories =
                timed(timing, "categories", || api.list_categories()).or_fail("Move category")?;
            check_move(&categories, &id, parent.as_deref()).or_fail("Move category")?;
            let request = UpdateCategoryRequest::move_to(parent.clone());
            let category = timed(timing, "move", || api.update_category(&id, &request))
                .or_fail("Move category")?;
            let target = parent.unwrap_or_else(|| "root".to_string());
            format_message(
                format!("Moved {} under {}", category.name, target),
                &category,
                json,
            )
            .or_fail("Move category")
        }
        Commands::Tags => {
            let tags = timed(timing, "tags", || api.list_tags()).or_fail("Tags")?;
            format_tags(&tags, json).or_fail("Tags")
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("snipvault=warn,snipvault_cli=info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn explicit_server_override(server: Option<String>) -> Option<String> {
    server
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Environment config with explicit `--server`/`--timeout` flags applied on top.
fn resolve_config(server: Option<String>, timeout: Option<u64>) -> Config {
    let mut config = Config::from_env();
    if let Some(server) = explicit_server_override(server) {
        config.server_url = server;
    }
    if let Some(secs) = timeout.filter(|secs| *secs > 0) {
        config.timeout_secs = secs;
    }
    config
}

fn main() -> anyhow::Result<()> {
    let Cli {
        server,
        json,
        timing,
        timeout,
        command,
    } = Cli::parse();

    if let Commands::Completions { shell } = &command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    init_tracing();
    let config = resolve_config(server, timeout);
    let api = HttpApi::from_config(&config)
        .with_context(|| format!("cannot use server '{}'", config.server_url))?;
    debug!("using server {}", api.base_url());

    let opts = OutputOptions { json, timing };
    match execute(&api, command, &opts, &mut io::stdin()) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests;

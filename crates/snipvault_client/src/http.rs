//! Blocking HTTP implementation of [`SnippetApi`].

use crate::wire::{
    CategoriesEnvelope, CategoryEnvelope, CollectionEnvelope, CollectionsEnvelope, FavoriteBody,
    SnippetEnvelope, SnippetsEnvelope, SuccessEnvelope, TagEnvelope, TagNameBody, TagsEnvelope,
};
use crate::{ApiError, SnippetApi};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use snipvault_core::models::{
    BatchRequest, BatchResult, Category, Collection, CreateCategoryRequest,
    CreateCollectionRequest, CreateSnippetRequest, Snippet, Tag, UpdateCategoryRequest,
    UpdateCollectionRequest, UpdateSnippetRequest,
};
use snipvault_core::view::SnippetFilters;
use snipvault_core::Config;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Client for the snippet REST service rooted at an API base URL.
pub struct HttpApi {
    base: String,
    client: Client,
    perf_log: bool,
}

impl HttpApi {
    /// Build a client for `server` (e.g. `http://localhost:8000/api`).
    ///
    /// # Errors
    /// Returns [`ApiError::InvalidUrl`] when `server` cannot serve as a base,
    /// or a transport error if the HTTP client cannot be constructed.
    pub fn new(server: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base = normalize_server(server.trim().to_string());
        api_url(&base, &[])?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base,
            client,
            perf_log: false,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Ok(Self::new(&config.server_url, config.timeout())?.with_perf_log(config.perf_log))
    }

    /// Log per-request timing at `info` level.
    pub fn with_perf_log(mut self, enabled: bool) -> Self {
        self.perf_log = enabled;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        let url = api_url(&self.base, segments)?;
        debug!("{} {}", method, url);
        Ok(self.client.request(method, url))
    }

    fn send<T: DeserializeOwned>(&self, action: &str, request: RequestBuilder) -> Result<T, ApiError> {
        let started = Instant::now();
        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;
        if self.perf_log {
            info!(
                "{} took {:.1} ms ({})",
                action,
                started.elapsed().as_secs_f64() * 1000.0,
                status
            );
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message_for_response(status, &body),
            });
        }
        serde_json::from_str(&body)
            .map_err(|err| ApiError::Decode(format!("{} response: {}", action, err)))
    }

    fn get<T: DeserializeOwned>(&self, action: &str, segments: &[&str]) -> Result<T, ApiError> {
        self.send(action, self.request(Method::GET, segments)?)
    }

    fn get_query<T: DeserializeOwned>(
        &self,
        action: &str,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.send(action, self.request(Method::GET, segments)?.query(query))
    }

    fn with_body<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        action: &str,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(action, self.request(method, segments)?.json(body))
    }

    fn confirm(
        &self,
        action: &'static str,
        method: Method,
        segments: &[&str],
    ) -> Result<(), ApiError> {
        let envelope: SuccessEnvelope = self.send(action, self.request(method, segments)?)?;
        if envelope.success {
            Ok(())
        } else {
            Err(ApiError::Rejected(action))
        }
    }
}

/// Extract a human-readable message from an error response body.
///
/// Prefers `detail` then `error`, each either a string or an object with a
/// `message`; falls back to the raw body or the status reason.
pub fn error_message_for_response(status: StatusCode, body: &str) -> String {
    if body.trim().is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string();
    }

    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let from_field = |field: &str| match value.get(field) {
            Some(Value::String(text)) => Some(text.clone()),
            Some(Value::Object(map)) => map
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        };
        if let Some(message) = from_field("detail").or_else(|| from_field("error")) {
            return message;
        }
    }

    body.to_string()
}

fn api_url(server: &str, segments: &[&str]) -> Result<Url, ApiError> {
    let mut url = Url::parse(server).map_err(|err| ApiError::InvalidUrl {
        url: server.to_string(),
        reason: err.to_string(),
    })?;
    let mut path = url.path_segments_mut().map_err(|_| ApiError::InvalidUrl {
        url: server.to_string(),
        reason: "cannot be used as an API base".to_string(),
    })?;
    path.pop_if_empty();
    for segment in segments {
        path.push(segment);
    }
    drop(path);
    Ok(url)
}

/// Canonicalize a server URL: plain-http `localhost` becomes `127.0.0.1` and
/// trailing slashes are dropped. Unparsable input is returned unchanged.
pub fn normalize_server(server: String) -> String {
    if let Ok(mut url) = Url::parse(&server) {
        let should_normalize_localhost =
            url.scheme().eq_ignore_ascii_case("http") && url.host_str() == Some("localhost");
        if should_normalize_localhost && url.set_host(Some("127.0.0.1")).is_err() {
            return server;
        }
        let mut normalized = url.to_string();
        while normalized.ends_with('/') {
            normalized.pop();
        }
        return normalized;
    }
    server
}

impl SnippetApi for HttpApi {
    fn list_snippets(&self, filters: &SnippetFilters) -> Result<Vec<Snippet>, ApiError> {
        let envelope: SnippetsEnvelope =
            self.get_query("List snippets", &["snippets"], &filters.query_pairs())?;
        Ok(envelope.snippets)
    }

    fn search_snippets(
        &self,
        query: &str,
        filters: &SnippetFilters,
    ) -> Result<Vec<Snippet>, ApiError> {
        let mut pairs = vec![("q", query.to_string())];
        pairs.extend(filters.query_pairs());
        let envelope: SnippetsEnvelope =
            self.get_query("Search", &["snippets", "search"], &pairs)?;
        Ok(envelope.snippets)
    }

    fn favorite_snippets(&self) -> Result<Vec<Snippet>, ApiError> {
        let envelope: SnippetsEnvelope = self.get("Favorites", &["snippets", "favorites"])?;
        Ok(envelope.snippets)
    }

    fn recycle_bin(&self) -> Result<Vec<Snippet>, ApiError> {
        let envelope: SnippetsEnvelope = self.get("Recycle bin", &["snippets", "recycle-bin"])?;
        Ok(envelope.snippets)
    }

    fn get_snippet(&self, id: &str) -> Result<Snippet, ApiError> {
        let envelope: SnippetEnvelope = self.get("Get snippet", &["snippets", id])?;
        Ok(envelope.snippet)
    }

    fn create_snippet(&self, request: &CreateSnippetRequest) -> Result<Snippet, ApiError> {
        let envelope: SnippetEnvelope =
            self.with_body("Create snippet", Method::POST, &["snippets"], request)?;
        Ok(envelope.snippet)
    }

    fn update_snippet(
        &self,
        id: &str,
        request: &UpdateSnippetRequest,
    ) -> Result<Snippet, ApiError> {
        let envelope: SnippetEnvelope =
            self.with_body("Update snippet", Method::PUT, &["snippets", id], request)?;
        Ok(envelope.snippet)
    }

    fn delete_snippet(&self, id: &str) -> Result<(), ApiError> {
        self.confirm("Delete snippet", Method::DELETE, &["snippets", id])
    }

    fn restore_snippet(&self, id: &str) -> Result<Snippet, ApiError> {
        let envelope: SnippetEnvelope =
            self.send("Restore snippet", self.request(Method::POST, &["snippets", id, "restore"])?)?;
        Ok(envelope.snippet)
    }

    fn permanent_delete_snippet(&self, id: &str) -> Result<(), ApiError> {
        self.confirm(
            "Permanent delete",
            Method::DELETE,
            &["snippets", id, "permanent"],
        )
    }

    fn set_favorite(&self, id: &str, is_favorite: bool) -> Result<Snippet, ApiError> {
        let envelope: SnippetEnvelope = self.with_body(
            "Favorite",
            Method::POST,
            &["snippets", id, "favorite"],
            &FavoriteBody { is_favorite },
        )?;
        Ok(envelope.snippet)
    }

    fn batch(&self, request: &BatchRequest) -> Result<BatchResult, ApiError> {
        self.with_body("Batch", Method::POST, &["snippets", "batch"], request)
    }

    fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let envelope: CategoriesEnvelope = self.get("List categories", &["categories"])?;
        Ok(envelope.categories)
    }

    fn create_category(&self, request: &CreateCategoryRequest) -> Result<Category, ApiError> {
        let envelope: CategoryEnvelope =
            self.with_body("Create category", Method::POST, &["categories"], request)?;
        Ok(envelope.category)
    }

    fn update_category(
        &self,
        id: &str,
        request: &UpdateCategoryRequest,
    ) -> Result<Category, ApiError> {
        let envelope: CategoryEnvelope =
            self.with_body("Update category", Method::PUT, &["categories", id], request)?;
        Ok(envelope.category)
    }

    fn delete_category(&self, id: &str) -> Result<(), ApiError> {
        self.confirm("Delete category", Method::DELETE, &["categories", id])
    }

    fn category_snippets(&self, id: &str) -> Result<Vec<Snippet>, ApiError> {
        let envelope: SnippetsEnvelope =
            self.get("Category snippets", &["categories", id, "snippets"])?;
        Ok(envelope.snippets)
    }

    fn list_tags(&self) -> Result<Vec<Tag>, ApiError> {
        let envelope: TagsEnvelope = self.get("List tags", &["tags"])?;
        Ok(envelope.tags)
    }

    fn create_tag(&self, name: &str) -> Result<Tag, ApiError> {
        let body = TagNameBody {
            name: name.to_string(),
        };
        let envelope: TagEnvelope = self.with_body("Create tag", Method::POST, &["tags"], &body)?;
        Ok(envelope.tag)
    }

    fn rename_tag(&self, id: &str, name: &str) -> Result<Tag, ApiError> {
        let body = TagNameBody {
            name: name.to_string(),
        };
        let envelope: TagEnvelope =
            self.with_body("Rename tag", Method::PUT, &["tags", id], &body)?;
        Ok(envelope.tag)
    }

    fn delete_tag(&self, id: &str) -> Result<(), ApiError> {
        self.confirm("Delete tag", Method::DELETE, &["tags", id])
    }

    fn tag_snippets(&self, id: &str) -> Result<Vec<Snippet>, ApiError> {
        let envelope: SnippetsEnvelope = self.get("Tag snippets", &["tags", id, "snippets"])?;
        Ok(envelope.snippets)
    }

    fn list_collections(&self) -> Result<Vec<Collection>, ApiError> {
        let envelope: CollectionsEnvelope = self.get("List collections", &["collections"])?;
        Ok(envelope.collections)
    }

    fn create_collection(
        &self,
        request: &CreateCollectionRequest,
    ) -> Result<Collection, ApiError> {
        let envelope: CollectionEnvelope =
            self.with_body("Create collection", Method::POST, &["collections"], request)?;
        Ok(envelope.collection)
    }

    fn update_collection(
        &self,
        id: &str,
        request: &UpdateCollectionRequest,
    ) -> Result<Collection, ApiError> {
        let envelope: CollectionEnvelope = self.with_body(
            "Update collection",
            Method::PUT,
            &["collections", id],
            request,
        )?;
        Ok(envelope.collection)
    }

    fn delete_collection(&self, id: &str) -> Result<(), ApiError> {
        self.confirm("Delete collection", Method::DELETE, &["collections", id])
    }

    fn collection_snippets(&self, id: &str) -> Result<Vec<Snippet>, ApiError> {
        let envelope: SnippetsEnvelope =
            self.get("Collection snippets", &["collections", id, "snippets"])?;
        Ok(envelope.snippets)
    }

    fn add_to_collection(&self, collection_id: &str, snippet_id: &str) -> Result<(), ApiError> {
        self.confirm(
            "Add to collection",
            Method::POST,
            &["collections", collection_id, "snippets", snippet_id],
        )
    }

    fn remove_from_collection(
        &self,
        collection_id: &str,
        snippet_id: &str,
    ) -> Result<(), ApiError> {
        self.confirm(
            "Remove from collection",
            Method::DELETE,
            &["collections", collection_id, "snippets", snippet_id],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_server_matrix() {
        let cases = [
            ("http://localhost:8000/api", "http://127.0.0.1:8000/api"),
            ("https://localhost:8000/api", "https://localhost:8000/api"),
            ("http://127.0.0.1:8000/api/", "http://127.0.0.1:8000/api"),
            ("http://127.0.0.1:8000/", "http://127.0.0.1:8000"),
            ("not a url", "not a url"),
        ];
        for (input, expected) in cases {
            assert_eq!(normalize_server(input.to_string()), expected, "input: {}", input);
        }
    }

    #[test]
    fn api_url_appends_and_escapes_segments() {
        let url = api_url("http://127.0.0.1:8000/api", &["snippets", "a b/c"]).expect("url");
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/api/snippets/a%20b%2Fc");

        let url = api_url("http://127.0.0.1:8000/api/", &["tags"]).expect("url");
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/api/tags");
    }

    #[test]
    fn api_url_rejects_non_base_urls() {
        assert!(matches!(
            api_url("mailto:someone@example.com", &["snippets"]),
            Err(ApiError::InvalidUrl { .. })
        ));
        assert!(matches!(
            api_url("::nope", &[]),
            Err(ApiError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn error_message_for_response_prefers_detail_then_error() {
        let status = StatusCode::NOT_FOUND;
        assert_eq!(
            error_message_for_response(status, r#"{"detail":"Snippet not found"}"#),
            "Snippet not found"
        );
        assert_eq!(
            error_message_for_response(status, r#"{"detail":{"message":"Conflict here"}}"#),
            "Conflict here"
        );
        assert_eq!(
            error_message_for_response(status, r#"{"error":"Not found"}"#),
            "Not found"
        );
        assert_eq!(error_message_for_response(status, "plain text"), "plain text");
        assert_eq!(error_message_for_response(status, "  "), "Not Found");
        assert_eq!(
            error_message_for_response(status, r#"{"other":1}"#),
            r#"{"other":1}"#
        );
    }

    #[test]
    fn new_rejects_invalid_server() {
        let result = HttpApi::new("::bad", Duration::from_secs(1));
        assert!(matches!(result, Err(ApiError::InvalidUrl { .. })));
    }
}

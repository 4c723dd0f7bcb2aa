//! The contacts HTTP API.
//!
//! | Method | Path | Answer |
//! |---|---|---|
//! | GET | `/` | HTML landing page |
//! | GET | `/contacts` | every contact, or exact name matches with `?first_name=` / `?last_name=` |
//! | GET | `/contacts/`, `/contacts/all` | every contact |
//! | GET | `/contacts/{id}` | array of zero or one contact |
//! | POST | `/contacts` | `201` with the created contact |
//! | PUT | `/contacts/{id}` | the updated contact, `404` if absent |
//! | DELETE | `/contacts/{id}` | `{"deleted": contact}`, `404` if absent |
//!
//! Bodies are JSON objects with optional `first_name`, `last_name`, `phone`
//! and `email` keys (`fname` / `lname` also accepted). An empty body counts
//! as an object with no keys.
//!
//! `HEAD` on any `GET` route answers like `GET` without a body. Another
//! method on a known path is `405` with an `allow` header.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::contact::{Contact, ContactPatch, Deleted};
use crate::handler::with_state;
use crate::health;
use crate::request::Request;
use crate::response::{IntoResponse, Json, Response};
use crate::router::Router;
use crate::status::Status;
use crate::store::{ContactStore, StoreError};

const HOME: &str = "<h1>Contacts API</h1>\n\
<p>A demo API for storing, updating, and reading personal contacts.</p>\n";

/// A request the API refuses, rendered as `{"error": "..."}`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ApiError {
    /// `404`: no live contact has this id.
    NotFound(u64),
    /// `400`: the `{id}` path segment is not a non-negative integer.
    InvalidId(String),
    /// `400`: the body is present but is not a JSON object of strings.
    MalformedInput(String),
}

impl ApiError {
    fn status(&self) -> Status {
        match self {
            Self::NotFound(_) => Status::NotFound,
            Self::InvalidId(_) | Self::MalformedInput(_) => Status::BadRequest,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "contact {id} not found"),
            Self::InvalidId(raw) => write!(f, "invalid contact id `{raw}`"),
            Self::MalformedInput(why) => write!(f, "malformed contact body: {why}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => Self::NotFound(id),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        debug!(error = %self, "request rejected");
        let body = serde_json::json!({ "error": self.to_string() });
        Json(body).with(Response::builder().status(self.status()))
    }
}

/// The full route table, handlers bound to `store`.
pub fn routes(store: Arc<ContactStore>) -> Router {
    Router::new()
        .get("/", home)
        .get("/healthz", health::liveness)
        .get("/readyz", health::readiness)
        .get("/contacts", with_state(&store, list))
        .get("/contacts/", with_state(&store, list_all))
        .get("/contacts/all", with_state(&store, list_all))
        .get("/contacts/{id}", with_state(&store, get_by_id))
        .post("/contacts", with_state(&store, create))
        .put("/contacts/{id}", with_state(&store, update))
        .delete("/contacts/{id}", with_state(&store, delete))
}

// ── Boundary decoding ─────────────────────────────────────────────────────────

fn contact_id(req: &Request) -> Result<u64, ApiError> {
    let raw = req.param("id").unwrap_or_default();
    raw.parse().map_err(|_| ApiError::InvalidId(raw.to_owned()))
}

fn contact_patch(req: &Request) -> Result<ContactPatch, ApiError> {
    if req.body().iter().all(u8::is_ascii_whitespace) {
        return Ok(ContactPatch::default());
    }

    let value: serde_json::Value =
        req.json().map_err(|e| ApiError::MalformedInput(e.to_string()))?;
    // serde would also read a struct from a JSON array; only objects count.
    if !value.is_object() {
        return Err(ApiError::MalformedInput("expected a JSON object".to_owned()));
    }
    serde_json::from_value(value).map_err(|e| ApiError::MalformedInput(e.to_string()))
}

fn name_query(req: &Request, long: &str, short: &str) -> Option<String> {
    req.query_param(long).or_else(|| req.query_param(short))
}

// ── Handlers ──────────────────────────────────────────────────────────────────

async fn home(_req: Request) -> Response {
    Response::html(HOME)
}

async fn list(store: Arc<ContactStore>, req: Request) -> Json<Vec<Contact>> {
    let first = name_query(&req, "first_name", "fname");
    let last = name_query(&req, "last_name", "lname");

    Json(match (first, last) {
        (Some(f), Some(l)) => store.find_by_full_name(&f, &l),
        (Some(f), None) => store.find_by_first_name(&f),
        (None, Some(l)) => store.find_by_last_name(&l),
        (None, None) => store.list_all(),
    })
}

async fn list_all(store: Arc<ContactStore>, _req: Request) -> Json<Vec<Contact>> {
    Json(store.list_all())
}

async fn get_by_id(store: Arc<ContactStore>, req: Request) -> Result<Json<Vec<Contact>>, ApiError> {
    let id = contact_id(&req)?;
    Ok(Json(store.get_by_id(id)))
}

async fn create(store: Arc<ContactStore>, req: Request) -> Result<Response, ApiError> {
    let patch = contact_patch(&req)?;
    let contact = store.create(patch);
    let location = format!("/contacts/{}", contact.id);

    Ok(Json(contact).with(
        Response::builder()
            .status(Status::Created)
            .header("location", &location),
    ))
}

async fn update(store: Arc<ContactStore>, req: Request) -> Result<Json<Contact>, ApiError> {
    let id = contact_id(&req)?;
    let patch = contact_patch(&req)?;
    Ok(Json(store.update(id, patch)?))
}

async fn delete(store: Arc<ContactStore>, req: Request) -> Result<Json<Deleted>, ApiError> {
    let id = contact_id(&req)?;
    Ok(Json(store.delete(id)?))
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::method::Method;

    fn app() -> (Arc<ContactStore>, Router) {
        let store = Arc::new(ContactStore::seeded());
        (Arc::clone(&store), routes(store))
    }

    async fn call(router: &Router, method: Method, uri: &str, body: &str) -> (Status, Value) {
        let res = router.route(Request::fake(method, uri, body)).await;
        let json = serde_json::from_slice(res.body()).unwrap_or(Value::Null);
        (res.status_code(), json)
    }

    #[tokio::test]
    async fn create_returns_201_with_location() {
        let (_, router) = app();
        let res = router
            .route(Request::fake(Method::Post, "/contacts", r#"{"first_name":"Ada"}"#))
            .await;
        assert_eq!(res.status_code(), Status::Created);
        assert_eq!(res.header("location"), Some("/contacts/1"));

        let body: Contact = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body, Contact { id: 1, first_name: "Ada".into(), ..Contact::default() });
    }

    #[tokio::test]
    async fn empty_body_creates_blank_contact() {
        let (store, router) = app();
        let (status, body) = call(&router, Method::Post, "/contacts", "").await;
        assert_eq!(status, Status::Created);
        assert_eq!(body["first_name"], "");
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn non_object_body_is_rejected_without_mutation() {
        let (store, router) = app();
        for body in [r#"["Ada"]"#, "not json", r#"{"first_name": 5}"#] {
            let (status, json) = call(&router, Method::Post, "/contacts", body).await;
            assert_eq!(status, Status::BadRequest, "{body}");
            assert!(json["error"].as_str().unwrap().starts_with("malformed contact body"));
        }
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn update_with_non_object_body_leaves_contact_unchanged() {
        let (store, router) = app();
        let before = store.get_by_id(0);
        for body in [r#"["Ada"]"#, "\"Ada\"", r#"{"phone": ["1"]}"#] {
            let (status, json) = call(&router, Method::Put, "/contacts/0", body).await;
            assert_eq!(status, Status::BadRequest, "{body}");
            assert!(json["error"].as_str().unwrap().starts_with("malformed contact body"));
        }
        assert_eq!(store.get_by_id(0), before);
    }

    #[tokio::test]
    async fn trailing_slash_lists_every_contact() {
        let (store, router) = app();
        store.create(ContactPatch::new().first_name("Ada"));
        let (status, body) = call(&router, Method::Get, "/contacts/", "").await;
        assert_eq!(status, Status::Ok);
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[1]["first_name"], "Ada");
    }

    #[tokio::test]
    async fn head_and_unsupported_methods_on_contacts() {
        let (_, router) = app();
        let res = router.route(Request::fake(Method::Head, "/contacts", "")).await;
        assert_eq!(res.status_code(), Status::Ok);
        assert_eq!(res.header("content-type"), Some("application/json"));
        assert!(res.body().is_empty());

        let res = router.route(Request::fake(Method::Patch, "/contacts/1", "")).await;
        assert_eq!(res.status_code(), Status::MethodNotAllowed);
        assert_eq!(res.header("allow"), Some("DELETE, GET, HEAD, PUT"));
    }

    #[tokio::test]
    async fn get_by_id_returns_zero_or_one() {
        let (_, router) = app();
        let (status, body) = call(&router, Method::Get, "/contacts/0", "").await;
        assert_eq!(status, Status::Ok);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["email"], "hello@scottylabs.org");

        let (status, body) = call(&router, Method::Get, "/contacts/99", "").await;
        assert_eq!(status, Status::Ok);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn non_numeric_id_is_bad_request() {
        let (_, router) = app();
        let (status, body) = call(&router, Method::Delete, "/contacts/abc", "").await;
        assert_eq!(status, Status::BadRequest);
        assert_eq!(body["error"], "invalid contact id `abc`");
    }

    #[tokio::test]
    async fn update_with_legacy_keys_and_missing_id() {
        let (_, router) = app();
        let (status, body) =
            call(&router, Method::Put, "/contacts/0", r#"{"lname":"Lab","extra":1}"#).await;
        assert_eq!(status, Status::Ok);
        assert_eq!(body["first_name"], "Scotty");
        assert_eq!(body["last_name"], "Lab");

        let (status, body) = call(&router, Method::Put, "/contacts/7", "{}").await;
        assert_eq!(status, Status::NotFound);
        assert_eq!(body["error"], "contact 7 not found");
    }

    #[tokio::test]
    async fn delete_confirms_then_not_found() {
        let (_, router) = app();
        let (status, body) = call(&router, Method::Delete, "/contacts/0", "").await;
        assert_eq!(status, Status::Ok);
        assert_eq!(body["deleted"]["id"], 0);

        let (status, _) = call(&router, Method::Delete, "/contacts/0", "").await;
        assert_eq!(status, Status::NotFound);
        let (_, body) = call(&router, Method::Get, "/contacts/all", "").await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn list_filters_by_name_query() {
        let (store, router) = app();
        store.create(ContactPatch::new().first_name("Ada").last_name("Lovelace"));
        store.create(ContactPatch::new().first_name("Ada").last_name("Byron"));

        let (_, body) = call(&router, Method::Get, "/contacts?first_name=Ada", "").await;
        assert_eq!(body.as_array().unwrap().len(), 2);
        let (_, body) = call(&router, Method::Get, "/contacts?fname=Ada&lname=Byron", "").await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["id"], 2);
        let (_, body) = call(&router, Method::Get, "/contacts?last_name=Labs", "").await;
        assert_eq!(body[0]["first_name"], "Scotty");
        let (_, body) = call(&router, Method::Get, "/contacts", "").await;
        assert_eq!(body.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn home_and_probes() {
        let (_, router) = app();
        let res = router.route(Request::fake(Method::Get, "/", "")).await;
        assert_eq!(res.header("content-type"), Some("text/html; charset=utf-8"));
        assert!(std::str::from_utf8(res.body()).unwrap().contains("Contacts API"));

        let res = router.route(Request::fake(Method::Get, "/readyz", "")).await;
        assert_eq!(res.body(), b"ready");
    }
}

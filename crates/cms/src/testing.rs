//! An in-memory backend and fixtures for the tests.

use crate::{
    client::{ApiClient, Body, Method, Navigator, Part, Request, Response, Transport},
    error::TransportError,
    session::User,
    storage::MemoryStore,
    store::SessionStore,
};
use cms_api::response::Category;
use serde_json::{json, Map, Value};
use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

pub const TOKEN: &str = "t0k";
const CREATED: &str = "2024-01-01T00:00:00Z";

pub fn user() -> User {
    User {
        id: "u1".into(),
        email: "admin@example.com".into(),
        user_name: "Admin".into(),
        roles: vec!["Admin".into()],
    }
}

pub fn category(id: &str, name: &str, parent: Option<&str>) -> Category {
    serde_json::from_value(category_json(id, name, parent)).unwrap()
}

fn category_json(id: &str, name: &str, parent: Option<&str>) -> Value {
    json!({
        "id": id,
        "name": name,
        "slug": name.to_lowercase().replace(' ', "-"),
        "postCount": 0,
        "createdAt": CREATED,
        "parentId": parent,
        "children": [],
    })
}

fn post_json(id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "slug": title.to_lowercase().replace(' ', "-"),
        "summary": "",
        "content": "",
        "viewCount": 0,
        "isPublished": false,
        "createdAt": CREATED,
        "categoryId": "c1",
        "categoryName": "Rust",
        "authorName": "Admin",
    })
}

fn project_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "slug": name.to_lowercase().replace(' ', "-"),
        "description": "",
        "techStacks": [],
        "imageUrls": [],
        "startDate": CREATED,
        "isFeatured": false,
        "createdDate": CREATED,
    })
}

fn donation_json(id: &str, donor: &str) -> Value {
    json!({
        "id": id,
        "donorName": donor,
        "amount": 100000.0,
        "paymentMethod": "Bank transfer",
        "isConfirmed": false,
        "createdAt": CREATED,
    })
}

/// A request as the backend received it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Vec<(&'static str, String)>,
    pub authorization: Option<String>,
    pub json: Option<Value>,
}

#[derive(Debug, Default)]
struct State {
    collections: BTreeMap<&'static str, Vec<Value>>,
    requests: Vec<Recorded>,
    forced: Vec<(String, u16, String)>,
    offline: bool,
    next_id: u32,
}

/// Serves the admin panel's endpoints from memory and records every request.
#[derive(Debug, Default)]
pub struct FakeBackend {
    state: RefCell<State>,
}

impl FakeBackend {
    pub fn seed_categories(&self, categories: &[(&str, Option<&str>)]) {
        let rows = categories
            .iter()
            .map(|(id, parent)| category_json(id, &format!("Category {id}"), *parent));
        self.seed("Categories", rows);
    }

    pub fn seed_posts(&self, count: usize) {
        let rows = (1..=count).map(|i| post_json(&format!("post-{i}"), &format!("Post {i}")));
        self.seed("Posts", rows);
    }

    /// Marks the given seeded posts as published.
    pub fn publish_posts(&self, ids: &[&str]) {
        let mut state = self.state.borrow_mut();
        let posts = state.collections.entry("Posts").or_default();
        for post in posts.iter_mut() {
            if ids.contains(&post["id"].as_str().unwrap_or_default()) {
                post["isPublished"] = Value::Bool(true);
            }
        }
    }

    pub fn seed_projects(&self, count: usize) {
        let rows = (1..=count).map(|i| project_json(&format!("p{i}"), &format!("Project {i}")));
        self.seed("Projects", rows);
    }

    pub fn seed_donations(&self, count: usize) {
        let rows = (1..=count).map(|i| donation_json(&format!("d{i}"), &format!("Donor {i}")));
        self.seed("Donations", rows);
    }

    fn seed(&self, collection: &'static str, rows: impl Iterator<Item = Value>) {
        self.state
            .borrow_mut()
            .collections
            .entry(collection)
            .or_default()
            .extend(rows);
    }

    /// Answers every request under `prefix` with `status`.
    pub fn force_status(&self, prefix: &str, status: u16) {
        self.force_response(prefix, status, "");
    }

    pub fn force_response(&self, prefix: &str, status: u16, body: &str) {
        self.state
            .borrow_mut()
            .forced
            .push((prefix.to_string(), status, body.to_string()));
    }

    pub fn go_offline(&self) {
        self.state.borrow_mut().offline = true;
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.borrow().requests.clone()
    }

    pub fn last_request(&self) -> Option<Recorded> {
        self.state.borrow().requests.last().cloned()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.state
            .borrow()
            .requests
            .iter()
            .filter(|request| request.method == method && request.path == path)
            .count()
    }

    fn handle(&self, request: &Request<String>, body: Option<&Value>) -> (u16, Value) {
        let segments: Vec<&str> = request.path.trim_matches('/').split('/').collect();
        let mut state = self.state.borrow_mut();
        match (request.method, segments.as_slice()) {
            (Method::Post, ["Account", "authenticate"]) => authenticate(body),
            (Method::Post, ["Files", "upload"]) => upload(request),
            (Method::Get, ["Categories", "tree"]) => {
                let all = state.collections.get("Categories").cloned().unwrap_or_default();
                (200, json!({ "data": build_tree(&all, None) }))
            }
            (Method::Get, ["Categories", "all"]) => {
                let all = state.collections.get("Categories").cloned().unwrap_or_default();
                (200, json!({ "data": all }))
            }
            (Method::Put, ["Donations", id, "toggle-approval"]) => {
                match find(&mut state, "Donations", id) {
                    Some(donation) => {
                        let confirmed = donation["isConfirmed"].as_bool().unwrap_or(false);
                        donation["isConfirmed"] = Value::Bool(!confirmed);
                        (200, json!({ "succeeded": true, "data": null }))
                    }
                    None => not_found(),
                }
            }
            (Method::Get, [collection]) => {
                let rows = state.collections.get(*collection).cloned().unwrap_or_default();
                (200, paged(rows, &request.query))
            }
            (Method::Get, [collection, id]) => match find(&mut state, collection, id) {
                // projects are served without an envelope
                Some(row) if *collection == "Projects" => (200, row.clone()),
                Some(row) => (200, json!({ "data": row.clone() })),
                None => not_found(),
            },
            (Method::Post, [collection]) => {
                let Some(collection) = collection_name(collection) else {
                    return not_found();
                };
                state.next_id += 1;
                let id = format!("new-{}", state.next_id);
                let mut row = template(collection, &id);
                merge(&mut row, body);
                row["id"] = Value::String(id.clone());
                state.collections.entry(collection).or_default().push(row);
                (200, json!({ "succeeded": true, "data": id }))
            }
            (Method::Put, [collection, id]) => match find(&mut state, collection, id) {
                Some(row) => {
                    merge(row, body);
                    (200, json!({ "succeeded": true, "data": null }))
                }
                None => not_found(),
            },
            (Method::Delete, [collection, id]) => {
                let Some(collection) = collection_name(collection) else {
                    return not_found();
                };
                let rows = state.collections.entry(collection).or_default();
                let before = rows.len();
                rows.retain(|row| row["id"] != *id);
                if rows.len() == before {
                    not_found()
                } else {
                    (204, Value::Null)
                }
            }
            _ => not_found(),
        }
    }
}

impl Transport for FakeBackend {
    type File = String;

    async fn send(&self, request: Request<String>) -> Result<Response, TransportError> {
        if self.state.borrow().offline {
            return Err(TransportError::new("network is unreachable"));
        }
        let body = match &request.body {
            Body::Json(json) => Some(serde_json::from_str::<Value>(json).unwrap()),
            _ => None,
        };
        self.state.borrow_mut().requests.push(Recorded {
            method: request.method,
            path: request.path.clone(),
            query: request.query.clone(),
            authorization: request.header_value("Authorization").map(str::to_string),
            json: body.clone(),
        });

        let forced = self
            .state
            .borrow()
            .forced
            .iter()
            .find(|(prefix, _, _)| request.path.starts_with(prefix.as_str()))
            .map(|(_, status, body)| (*status, body.clone()));
        if let Some((status, body)) = forced {
            return Ok(Response { status, body });
        }

        let (status, body) = self.handle(&request, body.as_ref());
        let body = if body.is_null() {
            String::new()
        } else {
            body.to_string()
        };
        Ok(Response { status, body })
    }
}

fn collection_name(name: &str) -> Option<&'static str> {
    ["Categories", "Posts", "Projects", "Donations"]
        .into_iter()
        .find(|collection| *collection == name)
}

fn template(collection: &str, id: &str) -> Value {
    match collection {
        "Categories" => category_json(id, "", None),
        "Posts" => post_json(id, ""),
        "Projects" => project_json(id, ""),
        _ => donation_json(id, ""),
    }
}

fn merge(row: &mut Value, body: Option<&Value>) {
    if let (Value::Object(row), Some(Value::Object(fields))) = (row, body) {
        for (key, value) in fields {
            row.insert(key.clone(), value.clone());
        }
    }
}

fn find<'a>(state: &'a mut State, collection: &str, id: &str) -> Option<&'a mut Value> {
    state
        .collections
        .get_mut(collection)?
        .iter_mut()
        .find(|row| row["id"] == id)
}

fn not_found() -> (u16, Value) {
    (404, json!({ "message": "Not found" }))
}

fn authenticate(body: Option<&Value>) -> (u16, Value) {
    let body = body.cloned().unwrap_or_default();
    if body["email"] == "admin@example.com" && body["password"] == "secret" {
        let user = user();
        (
            200,
            json!({
                "success": true,
                "message": "Authenticated",
                "data": {
                    "id": user.id,
                    "userName": user.user_name,
                    "email": user.email,
                    "roles": user.roles,
                    "jwToken": TOKEN,
                },
            }),
        )
    } else {
        (
            200,
            json!({ "success": false, "message": "Invalid credentials", "data": null }),
        )
    }
}

fn upload(request: &Request<String>) -> (u16, Value) {
    let Body::Multipart(parts) = &request.body else {
        return (400, json!({ "message": "Expected a file" }));
    };
    let mut file = None;
    let mut folder = None;
    for (name, part) in parts {
        match (*name, part) {
            ("file", Part::File(name)) => file = Some(name.clone()),
            ("folder", Part::Text(value)) => folder = Some(value.clone()),
            _ => {}
        }
    }
    match (file, folder) {
        (Some(file), Some(folder)) => (
            200,
            json!({ "url": format!("https://cdn.example.com/{folder}/{file}") }),
        ),
        _ => (400, json!({ "message": "Expected a file" })),
    }
}

fn build_tree(all: &[Value], parent: Option<&str>) -> Vec<Value> {
    all.iter()
        .filter(|row| row["parentId"].as_str() == parent)
        .map(|row| {
            let mut row = row.clone();
            let id = row["id"].as_str().unwrap_or_default().to_string();
            row["children"] = Value::Array(build_tree(all, Some(&id)));
            row
        })
        .collect()
}

fn paged(rows: Vec<Value>, query: &[(&'static str, String)]) -> Value {
    let param = |name: &str| {
        query
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    };
    let keyword = param("Keyword").unwrap_or_default().to_lowercase();
    let flags = [
        ("IsPublished", "isPublished"),
        ("IsFeatured", "isFeatured"),
        ("IsConfirmed", "isConfirmed"),
    ];

    let matching: Vec<Value> = rows
        .into_iter()
        .filter(|row| {
            let label = ["title", "name", "donorName"]
                .iter()
                .find_map(|field| row[*field].as_str())
                .unwrap_or_default()
                .to_lowercase();
            label.contains(&keyword)
        })
        .filter(|row| {
            flags.iter().all(|(name, field)| match param(*name) {
                Some(value) => row[*field].as_bool().map(|flag| flag.to_string()).as_deref()
                    == Some(value),
                None => true,
            })
        })
        .filter(|row| match param("CategoryId") {
            Some(category) => row["categoryId"] == category,
            None => true,
        })
        .collect();

    let page_number: usize = param("PageNumber").and_then(|n| n.parse().ok()).unwrap_or(1);
    let page_size: usize = param("PageSize").and_then(|n| n.parse().ok()).unwrap_or(10);
    let total = matching.len();
    let data: Vec<Value> = matching
        .into_iter()
        .skip(page_number.saturating_sub(1) * page_size)
        .take(page_size)
        .collect();
    let mut page = Map::new();
    page.insert("data".into(), Value::Array(data));
    page.insert("pageNumber".into(), json!(page_number));
    page.insert("pageSize".into(), json!(page_size));
    page.insert("totalRecords".into(), json!(total));
    page.insert("totalPages".into(), json!(total.div_ceil(page_size.max(1))));
    Value::Object(page)
}

#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visited: RefCell<Vec<String>>,
}

impl RecordingNavigator {
    pub fn visited(&self) -> Vec<String> {
        self.visited.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visited.borrow_mut().push(path.to_string());
    }
}

pub type TestSession = Rc<RefCell<SessionStore<Rc<MemoryStore>>>>;
pub type TestClient = ApiClient<Rc<FakeBackend>, TestSession, Rc<RecordingNavigator>>;

/// A client wired to a fake backend, an in-memory store and a recording navigator.
pub struct Harness {
    pub backend: Rc<FakeBackend>,
    pub store: Rc<MemoryStore>,
    pub session: TestSession,
    pub navigator: Rc<RecordingNavigator>,
    pub client: TestClient,
}

/// Sends the logs of a test to its captured output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

impl Harness {
    pub fn anonymous() -> Self {
        init_tracing();
        let backend = Rc::new(FakeBackend::default());
        let store = Rc::new(MemoryStore::new());
        let session = Rc::new(RefCell::new(SessionStore::open(Rc::clone(&store))));
        let navigator = Rc::new(RecordingNavigator::default());
        let client = ApiClient::new(
            Rc::clone(&backend),
            Rc::clone(&session),
            Rc::clone(&navigator),
        );
        Self {
            backend,
            store,
            session,
            navigator,
            client,
        }
    }

    pub fn logged_in() -> Self {
        let harness = Self::anonymous();
        harness
            .session
            .borrow_mut()
            .login(user(), TOKEN.to_string())
            .unwrap();
        harness
    }
}

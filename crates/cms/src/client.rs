//! The request wrapper.
//!
//! Every request goes through [`ApiClient`], which attaches the bearer token
//! of the persisted session, clears the session and goes to the login page
//! when the backend answers 401, and unwraps the payload of successful
//! responses.

use crate::{
    error::{ApiError, ApiResult, TransportError},
    guard::LOGIN_PATH,
    storage::{KeyValueStore, SessionStorage},
    store::SessionStore,
};
use cms_api::response::Payload;
use serde::{de::DeserializeOwned, Serialize};
use std::{cell::RefCell, fmt, rc::Rc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub enum Part<F> {
    Text(String),
    File(F),
}

#[derive(Debug)]
pub enum Body<F> {
    Empty,
    Json(String),
    Multipart(Vec<(&'static str, Part<F>)>),
}

/// A request relative to the backend's base URL.
#[derive(Debug)]
pub struct Request<F> {
    pub method: Method,
    pub path: String,
    pub query: Vec<(&'static str, String)>,
    pub headers: Vec<(&'static str, String)>,
    pub body: Body<F>,
}

impl<F> Request<F> {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: Body::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn query(mut self, params: Vec<(&'static str, String)>) -> Self {
        self.query.extend(params);
        self
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> ApiResult<Self> {
        let json = serde_json::to_string(body).map_err(|err| ApiError::Encode(err.to_string()))?;
        self.body = Body::Json(json);
        Ok(self.header("Content-Type", "application/json"))
    }

    pub fn multipart(mut self, parts: Vec<(&'static str, Part<F>)>) -> Self {
        self.body = Body::Multipart(parts);
        self
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Full URL with the query string.
    pub fn url(&self, base_url: &str) -> String {
        let mut url = format!("{}{}", base_url.trim_end_matches('/'), self.path);
        for (i, (name, value)) in self.query.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(&encode_component(name));
            url.push('=');
            url.push_str(&encode_component(value));
        }
        url
    }
}

fn encode_component(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

/// Sends requests to the backend.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Whatever the platform uploads files as.
    type File;

    async fn send(&self, request: Request<Self::File>) -> Result<Response, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    type File = T::File;

    async fn send(&self, request: Request<Self::File>) -> Result<Response, TransportError> {
        (**self).send(request).await
    }
}

impl<T: Transport + ?Sized> Transport for Rc<T> {
    type File = T::File;

    async fn send(&self, request: Request<Self::File>) -> Result<Response, TransportError> {
        (**self).send(request).await
    }
}

/// Access to the session from the request wrapper.
pub trait Credentials {
    /// Token of the persisted session.
    fn bearer_token(&self) -> Option<String>;

    /// Clears the session after the backend rejected its token.
    fn revoke(&self);
}

impl<C: Credentials + ?Sized> Credentials for &C {
    fn bearer_token(&self) -> Option<String> {
        (**self).bearer_token()
    }

    fn revoke(&self) {
        (**self).revoke()
    }
}

impl<C: Credentials + ?Sized> Credentials for Rc<C> {
    fn bearer_token(&self) -> Option<String> {
        (**self).bearer_token()
    }

    fn revoke(&self) {
        (**self).revoke()
    }
}

impl<S: KeyValueStore> Credentials for SessionStorage<S> {
    fn bearer_token(&self) -> Option<String> {
        self.token()
    }

    fn revoke(&self) {
        if let Err(err) = self.purge() {
            tracing::warn!("Failed to clear the stored session: {err}");
        }
    }
}

impl<S: KeyValueStore> Credentials for RefCell<SessionStore<S>> {
    fn bearer_token(&self) -> Option<String> {
        self.borrow().storage().token()
    }

    fn revoke(&self) {
        if let Err(err) = self.borrow_mut().logout() {
            tracing::warn!("Failed to clear the stored session: {err}");
        }
    }
}

pub trait Navigator {
    fn navigate(&self, path: &str);
}

impl<N: Navigator + ?Sized> Navigator for &N {
    fn navigate(&self, path: &str) {
        (**self).navigate(path)
    }
}

impl<N: Navigator + ?Sized> Navigator for Rc<N> {
    fn navigate(&self, path: &str) {
        (**self).navigate(path)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ApiClient<T, C, N> {
    transport: T,
    credentials: C,
    navigator: N,
}

/// Non-API methods
impl<T, C, N> ApiClient<T, C, N>
where
    T: Transport,
    C: Credentials,
    N: Navigator,
{
    pub fn new(transport: T, credentials: C, navigator: N) -> Self {
        Self {
            transport,
            credentials,
            navigator,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn credentials(&self) -> &C {
        &self.credentials
    }

    /// Sends the request and decodes the payload of the response.
    pub async fn send<R: DeserializeOwned>(&self, request: Request<T::File>) -> ApiResult<R> {
        let response = self.dispatch(request).await?;
        decode_payload(&response.body)
    }

    /// Sends a request whose response carries nothing of interest.
    pub async fn send_unit(&self, request: Request<T::File>) -> ApiResult<()> {
        let response = self.dispatch(request).await?;
        ensure_not_rejected(&response.body)
    }

    /// Sends the request and decodes the whole response body.
    pub async fn send_raw<R: DeserializeOwned>(&self, request: Request<T::File>) -> ApiResult<R> {
        let response = self.dispatch(request).await?;
        Ok(serde_json::from_str(&response.body)?)
    }

    async fn dispatch(&self, mut request: Request<T::File>) -> ApiResult<Response> {
        if let Some(token) = self.credentials.bearer_token() {
            request
                .headers
                .push(("Authorization", format!("Bearer {token}")));
        }
        let method = request.method;
        let path = request.path.clone();
        tracing::debug!("{method} {path}");

        let response = self.transport.send(request).await.map_err(|err| {
            tracing::warn!("{method} {path} could not be sent: {err}");
            ApiError::from(err)
        })?;
        self.assert_success(method, &path, response)
    }

    fn assert_success(&self, method: Method, path: &str, response: Response) -> ApiResult<Response> {
        match response.status {
            200..=299 => Ok(response),
            401 => {
                tracing::warn!("{method} {path}: server returned 401, clearing the session");
                self.credentials.revoke();
                self.navigator.navigate(LOGIN_PATH);
                let message = serde_json::from_str::<cms_api::response::Error>(&response.body)
                    .ok()
                    .and_then(|error| error.summary().map(str::to_string));
                Err(ApiError::Unauthorized { message })
            }
            status => {
                let error = ApiError::from_status(status, &response.body);
                tracing::warn!("{method} {path}: {error}");
                Err(error)
            }
        }
    }
}

/// Unwraps `{"data": …}` envelopes, accepting bare payloads as well.
pub fn decode_payload<R: DeserializeOwned>(body: &str) -> ApiResult<R> {
    let body = if body.trim().is_empty() { "null" } else { body };
    // rejected envelopes usually carry `"data": null`, which `R` cannot hold
    ensure_not_rejected(body)?;
    match serde_json::from_str::<Payload<R>>(body)? {
        Payload::Wrapped(envelope) => Ok(envelope.data),
        Payload::Bare(payload) => Ok(payload),
    }
}

fn ensure_not_rejected(body: &str) -> ApiResult<()> {
    let Ok(serde_json::Value::Object(object)) = serde_json::from_str(body) else {
        return Ok(());
    };
    let succeeded = object
        .get("succeeded")
        .or_else(|| object.get("success"))
        .and_then(serde_json::Value::as_bool);
    if succeeded == Some(false) {
        let message = object
            .get("message")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("The request was rejected")
            .to_string();
        return Err(ApiError::Rejected { message });
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        endpoints::{Categories, Donations, Posts, Projects},
        storage::{LEGACY_KEYS, SESSION_KEY},
        testing::Harness,
    };
    use cms_api::{
        request::{DonationFilter, PostFilter, ProjectFilter},
        response::{PagedResult, Post},
    };
    use futures::executor::block_on;

    #[test]
    fn query_is_percent_encoded() {
        let request = Request::<()>::get("/Posts").query(vec![
            ("PageNumber", "1".into()),
            ("Keyword", "rust & wasm/ä".into()),
        ]);
        assert_eq!(
            request.url("https://localhost:7000/api/"),
            "https://localhost:7000/api/Posts?PageNumber=1&Keyword=rust%20%26%20wasm%2F%C3%A4"
        );
    }

    #[test]
    fn attaches_the_persisted_token() {
        let harness = Harness::logged_in();
        block_on(harness.client.list::<Posts>(&PostFilter::default())).unwrap();
        let request = harness.backend.last_request().unwrap();
        assert_eq!(request.authorization.as_deref(), Some("Bearer t0k"));
    }

    #[test]
    fn anonymous_requests_carry_no_token() {
        let harness = Harness::anonymous();
        block_on(harness.client.list::<Posts>(&PostFilter::default())).unwrap();
        let request = harness.backend.last_request().unwrap();
        assert!(request.authorization.is_none());
    }

    #[test]
    fn unauthorized_clears_the_session_on_every_endpoint() {
        type Call = fn(&Harness) -> ApiResult<()>;
        let calls: [(&str, Call); 6] = [
            ("/Posts", |h: &Harness| {
                block_on(h.client.list::<Posts>(&PostFilter::default())).map(drop)
            }),
            ("/Projects", |h: &Harness| {
                block_on(h.client.list::<Projects>(&ProjectFilter::default())).map(drop)
            }),
            ("/Donations", |h: &Harness| {
                block_on(h.client.list::<Donations>(&DonationFilter::default())).map(drop)
            }),
            ("/Categories", |h: &Harness| {
                block_on(h.client.category_tree()).map(drop)
            }),
            ("/Categories", |h: &Harness| {
                block_on(h.client.delete::<Categories>("c1"))
            }),
            ("/Files", |h: &Harness| {
                block_on(h.client.upload_file("cat.png".into(), "general")).map(drop)
            }),
        ];

        for (prefix, call) in calls {
            let harness = Harness::logged_in();
            harness.store.set(LEGACY_KEYS[0], "stale").unwrap();
            harness.backend.force_status(prefix, 401);

            let error = call(&harness).unwrap_err();
            assert!(error.is_unauthorized(), "{prefix}: {error:?}");
            assert!(!harness.session.borrow().session().is_authenticated());
            assert!(harness.store.get(SESSION_KEY).unwrap().is_none());
            assert!(harness.store.get(LEGACY_KEYS[0]).unwrap().is_none());
            assert_eq!(harness.navigator.visited(), vec![LOGIN_PATH.to_string()]);
        }
    }

    #[test]
    fn other_failures_pass_through() {
        let harness = Harness::logged_in();
        harness.backend.force_status("/Posts", 500);

        let error = block_on(harness.client.list::<Posts>(&PostFilter::default())).unwrap_err();
        assert!(matches!(error, ApiError::Status { status: 500, .. }));
        assert!(harness.session.borrow().session().is_authenticated());
        assert!(harness.navigator.visited().is_empty());
    }

    #[test]
    fn transport_failures_pass_through() {
        let harness = Harness::logged_in();
        harness.backend.go_offline();

        let error = block_on(harness.client.list::<Posts>(&PostFilter::default())).unwrap_err();
        assert!(matches!(error, ApiError::Transport(_)));
        assert!(harness.session.borrow().session().is_authenticated());
    }

    #[test]
    fn rejected_envelopes_become_errors() {
        let error = decode_payload::<String>(r#"{"succeeded":false,"message":"Nope","data":null}"#)
            .unwrap_err();
        assert_eq!(error.server_message(), Some("Nope"));

        assert!(ensure_not_rejected(r#"{"success":false,"message":"Nope"}"#).is_err());
        assert!(ensure_not_rejected("").is_ok());
        assert!(ensure_not_rejected(r#"{"succeeded":true}"#).is_ok());
    }

    #[test]
    fn rejected_envelopes_with_null_data_keep_the_server_message() {
        let body = r#"{"succeeded":false,"message":"Post not found","data":null}"#;

        let error = decode_payload::<Post>(body).unwrap_err();
        assert!(matches!(error, ApiError::Rejected { .. }));
        assert_eq!(error.server_message(), Some("Post not found"));

        let error = decode_payload::<PagedResult<Post>>(body).unwrap_err();
        assert_eq!(error.server_message(), Some("Post not found"));
    }

    #[test]
    fn rejected_get_surfaces_the_server_message() {
        let harness = Harness::logged_in();
        harness.backend.seed_posts(1);
        harness.backend.force_response(
            "/Posts/post-1",
            200,
            r#"{"succeeded":false,"message":"Post not found","data":null}"#,
        );

        let error = block_on(harness.client.get::<Posts>("post-1")).unwrap_err();
        assert_eq!(error.user_message("Failed to load post"), "Post not found");
        assert!(harness.session.borrow().session().is_authenticated());
    }

    #[test]
    fn empty_success_bodies_decode_as_unit() {
        decode_payload::<()>("").unwrap();
    }
}

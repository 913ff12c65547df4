//! Client context for communicating with the backend.

use super::session::Session;
use cms::{
    client::{Body, Method, Part, Request, Response},
    error::TransportError,
    ApiClient, Navigator, Transport,
};
use wasm_bindgen::JsValue;
use web_sys::{File, FormData};

pub type Client = ApiClient<BrowserTransport, Session, BrowserNavigator>;

/// Sends requests with `fetch`.
#[derive(Debug, Clone, Copy)]
pub struct BrowserTransport {
    base_url: &'static str,
}

impl BrowserTransport {
    pub fn new(base_url: &'static str) -> Self {
        Self { base_url }
    }

    pub fn base_url(&self) -> &'static str {
        self.base_url
    }
}

fn js_error(value: JsValue) -> TransportError {
    TransportError::new(format!("{value:?}"))
}

fn form_data(parts: Vec<(&'static str, Part<File>)>) -> Result<FormData, TransportError> {
    let form = FormData::new().map_err(js_error)?;
    for (name, part) in parts {
        match part {
            Part::Text(text) => form.append_with_str(name, &text),
            Part::File(file) => form.append_with_blob_and_filename(name, &file, &file.name()),
        }
        .map_err(js_error)?;
    }
    Ok(form)
}

impl Transport for BrowserTransport {
    type File = File;

    async fn send(&self, request: Request<File>) -> Result<Response, TransportError> {
        let url = request.url(self.base_url);
        let mut req = match request.method {
            Method::Get => reqwasm::http::Request::get(&url),
            Method::Post => reqwasm::http::Request::post(&url),
            Method::Put => reqwasm::http::Request::put(&url),
            Method::Delete => reqwasm::http::Request::delete(&url),
        };
        for (name, value) in &request.headers {
            req = req.header(name, value);
        }
        req = match request.body {
            Body::Empty => req,
            Body::Json(json) => req.body(json),
            Body::Multipart(parts) => req.body(form_data(parts)?),
        };

        let res = req.send().await.map_err(TransportError::new)?;
        let status = res.status();
        let body = res.text().await.map_err(TransportError::new)?;
        Ok(Response { status, body })
    }
}

/// Navigates with a full page load, which also drops any state held in memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn navigate(&self, path: &str) {
        let location = leptos::prelude::window().location();
        if location.pathname().is_ok_and(|current| current == path) {
            return;
        }
        tracing::info!("Navigating to {path}");
        if let Err(err) = location.set_href(path) {
            tracing::error!("Failed to navigate to {path}: {err:?}");
        }
    }
}

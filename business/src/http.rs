//! Platform-abstracted HTTP client with Send-safe futures.
//!
//! On WASM, `reqwest::Response` is not `Send` because it wraps JS types, so:
//! - on **native** reqwest is used directly;
//! - on **WASM** the request runs on the JS thread via `wasm_bindgen_futures::spawn_local`
//!   and the result is sent back through a `flume` channel.
//!
//! Either way commands can return `Pin<Box<dyn Future<Output = ()> + Send>>`.

use std::collections::HashMap;

/// A simplified HTTP response that contains only Send-safe data.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    /// Canonical reason phrase for `status`, empty when unknown.
    pub status_text: String,
    /// Response headers (lowercased keys)
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Response {
    /// Returns true if the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(|s| s.as_str())
    }

    /// Whether the `content-type` header announces JSON.
    pub fn is_json(&self) -> bool {
        self.header("content-type")
            .is_some_and(|ct| ct.contains("application/json"))
    }

    /// Body decoded as UTF-8, invalid sequences replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HttpError {
    /// The request could not be built or never completed.
    #[error("{0}")]
    Request(String),
    /// The response arrived but its body could not be read.
    #[error("{0}")]
    Body(String),
    /// The JS-side task went away before reporting.
    #[error("Request cancelled")]
    Cancelled,
}

pub type HttpResult<T> = Result<T, HttpError>;

#[derive(Debug, Clone)]
pub struct RequestBuilder {
    url: String,
    headers: HashMap<String, String>,
    body: Option<Vec<u8>>,
}

impl RequestBuilder {
    fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Set the request body as JSON.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Result<Self, serde_json::Error> {
        let json_bytes = serde_json::to_vec(value)?;
        self.body = Some(json_bytes);
        self.headers
            .insert("content-type".to_owned(), "application/json".to_owned());
        Ok(self)
    }

    pub async fn send(self) -> HttpResult<Response> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            execute(self.url, self.headers, self.body).await
        }

        #[cfg(target_arch = "wasm32")]
        {
            self.send_wasm().await
        }
    }

    #[cfg(target_arch = "wasm32")]
    async fn send_wasm(self) -> HttpResult<Response> {
        // flume channels are Send-safe, so the outer future is Send
        let (tx, rx) = flume::bounded::<HttpResult<Response>>(1);
        let Self {
            url,
            headers,
            body,
        } = self;

        wasm_bindgen_futures::spawn_local(async move {
            let result = execute(url, headers, body).await;
            // Receiver dropped means nobody waits for the response anymore.
            let _ = tx.send_async(result).await;
        });

        rx.recv_async().await.map_err(|_| HttpError::Cancelled)?
    }
}

async fn execute(
    url: String,
    headers: HashMap<String, String>,
    body: Option<Vec<u8>>,
) -> HttpResult<Response> {
    let url = absolute_url(&url, page_origin().as_deref())?;
    let client = reqwest::Client::new();

    let mut request = client.post(&url);
    for (name, value) in &headers {
        request = request.header(name, value);
    }
    if let Some(body) = body {
        request = request.body(body);
    }

    let response = request
        .send()
        .await
        .map_err(|e| HttpError::Request(e.to_string()))?;

    // Extract status and headers before consuming the response
    let status = response.status();
    let mut response_headers = HashMap::new();
    for (name, value) in response.headers() {
        if let Ok(v) = value.to_str() {
            response_headers.insert(name.as_str().to_lowercase(), v.to_owned());
        }
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| HttpError::Body(e.to_string()))?
        .to_vec();

    Ok(Response {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_owned(),
        headers: response_headers,
        body,
    })
}

/// Resolve a path such as `/api/generate` against the page origin.
///
/// Absolute URLs are returned unchanged. A relative URL without an origin is an error,
/// since reqwest only accepts absolute URLs.
pub fn absolute_url(url: &str, origin: Option<&str>) -> HttpResult<String> {
    if reqwest::Url::parse(url).is_ok() {
        return Ok(url.to_owned());
    }
    let origin = origin
        .ok_or_else(|| HttpError::Request(format!("Relative URL {url} has no origin")))?;
    reqwest::Url::parse(origin)
        .and_then(|base| base.join(url))
        .map(|resolved| resolved.to_string())
        .map_err(|e| HttpError::Request(format!("Cannot resolve {url} against {origin}: {e}")))
}

#[cfg(target_arch = "wasm32")]
fn page_origin() -> Option<String> {
    web_sys::window().and_then(|window| window.location().origin().ok())
}

#[cfg(not(target_arch = "wasm32"))]
fn page_origin() -> Option<String> {
    None
}

pub struct Client;

impl Client {
    pub fn post(url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(url)
    }
}

//! HTTP transport adapter and the high-level client built on it

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{CONNECTION, CONTENT_TYPE, COOKIE};
use reqwest::redirect::Policy;
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use tideway_jsonrpc::{JsonRpcRequest, RequestParams};

use crate::builder::RequestBuilder;
use crate::error::{ClientError, ClientResult};
use crate::interpret::{RpcOutcome, interpret};

/// Components of the request URL, merged over defaults at send time.
/// Only `host` is mandatory; `scheme` defaults to `http`.
#[derive(Debug, Clone, Default)]
pub struct UriParts {
    pub scheme: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub pass: Option<String>,
    pub path: Option<String>,
    pub query: Option<String>,
    pub fragment: Option<String>,
}

impl UriParts {
    pub fn host(host: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
            ..Default::default()
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Assemble the components into a URL.
    pub fn to_url(&self) -> ClientResult<Url> {
        let scheme = self.scheme.as_deref().unwrap_or("http");
        let host = self
            .host
            .as_deref()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ClientError::InvalidUrl("missing host".to_string()))?;

        let mut url = format!("{scheme}://");
        if let Some(user) = &self.user {
            url.push_str(user);
            if let Some(pass) = &self.pass {
                url.push(':');
                url.push_str(pass);
            }
            url.push('@');
        }
        url.push_str(host);
        if let Some(port) = self.port {
            url.push(':');
            url.push_str(&port.to_string());
        }
        if let Some(path) = &self.path {
            if !path.starts_with('/') {
                url.push('/');
            }
            url.push_str(path);
        }
        if let Some(query) = &self.query {
            url.push('?');
            url.push_str(query);
        }
        if let Some(fragment) = &self.fragment {
            url.push('#');
            url.push_str(fragment);
        }

        Url::parse(&url).map_err(|err| ClientError::InvalidUrl(err.to_string()))
    }
}

/// Basic credentials passed through to the transport. Basic is the only
/// scheme the wire consumes; anything richer belongs to the transport's
/// host application.
#[derive(Debug, Clone)]
pub struct BasicCredentials {
    pub user: String,
    pub pass: Option<String>,
}

impl BasicCredentials {
    pub fn new(user: impl Into<String>, pass: Option<String>) -> Self {
        Self {
            user: user.into(),
            pass,
        }
    }
}

/// Per-call transport options.
#[derive(Debug, Clone)]
pub struct CallOptions {
    /// Extra headers, sent on top of the defaults
    pub headers: HashMap<String, String>,
    /// Cookies, folded into a single `Cookie` header
    pub cookies: HashMap<String, String>,
    /// HTTP method, POST unless the caller says otherwise
    pub method: Method,
    /// Redirects are not followed by default
    pub follow_redirects: bool,
    pub timeout: Duration,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            headers: HashMap::new(),
            cookies: HashMap::new(),
            method: Method::POST,
            follow_redirects: false,
            timeout: Duration::from_secs(30),
        }
    }
}

/// One outbound payload: a single request envelope or a batch.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RequestPayload {
    Single(JsonRpcRequest),
    Batch(Vec<JsonRpcRequest>),
}

impl From<JsonRpcRequest> for RequestPayload {
    fn from(request: JsonRpcRequest) -> Self {
        RequestPayload::Single(request)
    }
}

impl From<Vec<JsonRpcRequest>> for RequestPayload {
    fn from(requests: Vec<JsonRpcRequest>) -> Self {
        RequestPayload::Batch(requests)
    }
}

/// The HTTP capability the protocol layer rides on: send a payload,
/// receive a status and a raw body. Sockets, TLS and pooling are
/// reqwest's business.
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(options: &CallOptions) -> ClientResult<Self> {
        let redirect = if options.follow_redirects {
            Policy::limited(10)
        } else {
            Policy::none()
        };
        let client = Client::builder()
            .timeout(options.timeout)
            .redirect(redirect)
            .build()?;
        Ok(Self { client })
    }

    /// Perform the HTTP exchange for one payload. Connection-level
    /// failures (DNS, refused, timeout) surface as `ClientError::Http`.
    pub async fn send(
        &self,
        payload: &RequestPayload,
        uri: &UriParts,
        credentials: Option<&BasicCredentials>,
        options: &CallOptions,
    ) -> ClientResult<(u16, String)> {
        let url = uri.to_url()?;
        let body = serde_json::to_string(payload)?;
        debug!(%url, body = %body, "sending JSON-RPC request");

        let mut request = self
            .client
            .request(options.method.clone(), url)
            .header(CONTENT_TYPE, "application/json")
            .header(CONNECTION, "close");
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if !options.cookies.is_empty() {
            let cookie = options
                .cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ");
            request = request.header(COOKIE, cookie);
        }
        if let Some(credentials) = credentials {
            request = request.basic_auth(&credentials.user, credentials.pass.as_deref());
        }

        let response = request.body(body).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok((status, body))
    }
}

/// A JSON-RPC client bound to one endpoint: builds requests with monotone
/// ids, sends them over HTTP and interprets what comes back.
pub struct JsonRpcClient {
    builder: RequestBuilder,
    transport: HttpTransport,
    uri: UriParts,
    credentials: Option<BasicCredentials>,
    options: CallOptions,
}

impl JsonRpcClient {
    pub fn new(uri: UriParts) -> ClientResult<Self> {
        Self::with_options(uri, None, CallOptions::default())
    }

    pub fn with_options(
        uri: UriParts,
        credentials: Option<BasicCredentials>,
        options: CallOptions,
    ) -> ClientResult<Self> {
        Ok(Self {
            builder: RequestBuilder::new(),
            transport: HttpTransport::new(&options)?,
            uri,
            credentials,
            options,
        })
    }

    /// Build a request without sending it, for batch assembly.
    pub fn build_request(
        &self,
        method: impl Into<String>,
        params: Option<RequestParams>,
    ) -> JsonRpcRequest {
        self.builder.build(method, params)
    }

    /// Send a prepared payload and interpret the reply.
    pub async fn send(&self, payload: &RequestPayload) -> ClientResult<RpcOutcome> {
        let (status, body) = self
            .transport
            .send(payload, &self.uri, self.credentials.as_ref(), &self.options)
            .await?;
        interpret(status, &body)
    }

    /// Call a single method and return its result value.
    pub async fn call(
        &self,
        method: impl Into<String>,
        params: Option<RequestParams>,
    ) -> ClientResult<Value> {
        let request = self.builder.build(method, params);
        match self.send(&RequestPayload::Single(request)).await? {
            RpcOutcome::Single(value) => Ok(value),
            // A batch-shaped reply to a single request breaks the contract.
            RpcOutcome::Batch(_) => Err(ClientError::InvalidResponse),
        }
    }

    /// Send a batch and return the raw response envelopes in wire order;
    /// correlating them by id is the caller's concern.
    pub async fn call_batch(&self, requests: Vec<JsonRpcRequest>) -> ClientResult<Vec<Value>> {
        match self.send(&RequestPayload::Batch(requests)).await? {
            RpcOutcome::Batch(values) => Ok(values),
            RpcOutcome::Single(_) => Err(ClientError::InvalidResponse),
        }
    }
}

//! HTTP JSON-RPC server: configuration, builder and accept loop

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use tideway_jsonrpc::{ParamsPolicy, RequestDispatcher, RpcHandler};

use crate::{Result, endpoint, response};

/// Configuration for the HTTP JSON-RPC server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_address: SocketAddr,
    /// The listen set: route paths the dispatcher answers on
    pub listen: Vec<String>,
    /// Maximum request body size
    pub max_body_size: usize,
    /// Whether `params` is required on every request
    pub params_policy: ParamsPolicy,
}

impl ServerConfig {
    /// Whether a request path belongs to the listen set.
    pub fn is_listening(&self, path: &str) -> bool {
        self.listen.iter().any(|route| route == path)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8000".parse().unwrap(),
            listen: vec!["/rpc".to_string()],
            max_body_size: 1024 * 1024, // 1MB
            params_policy: ParamsPolicy::Optional,
        }
    }
}

/// Builder for the HTTP JSON-RPC server
pub struct JsonRpcHttpServerBuilder {
    config: ServerConfig,
    dispatcher: RequestDispatcher,
}

impl JsonRpcHttpServerBuilder {
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
            dispatcher: RequestDispatcher::new(),
        }
    }

    /// Set the bind address
    pub fn bind_address(mut self, addr: SocketAddr) -> Self {
        self.config.bind_address = addr;
        self
    }

    /// Bind the dispatcher to a single route
    pub fn listen(mut self, path: impl Into<String>) -> Self {
        self.config.listen = vec![path.into()];
        self
    }

    /// Bind the dispatcher to a set of routes
    pub fn listen_paths(mut self, paths: Vec<String>) -> Self {
        self.config.listen = paths;
        self
    }

    /// Set maximum request body size
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.config.max_body_size = size;
        self
    }

    /// Require `params` on every request
    pub fn params_policy(mut self, policy: ParamsPolicy) -> Self {
        self.config.params_policy = policy;
        self
    }

    /// Register a handler for a specific method
    pub fn register_method<H>(mut self, method: impl Into<String>, handler: H) -> Self
    where
        H: RpcHandler + 'static,
    {
        self.dispatcher.register_method(method, handler);
        self
    }

    /// Register a handler for several methods
    pub fn register_methods<H>(mut self, methods: Vec<String>, handler: H) -> Self
    where
        H: RpcHandler + 'static,
    {
        self.dispatcher.register_methods(methods, handler);
        self
    }

    /// Build the server
    pub fn build(mut self) -> JsonRpcHttpServer {
        self.dispatcher.set_params_policy(self.config.params_policy);
        JsonRpcHttpServer {
            config: Arc::new(self.config),
            dispatcher: Arc::new(self.dispatcher),
        }
    }
}

impl Default for JsonRpcHttpServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP JSON-RPC server
#[derive(Clone)]
pub struct JsonRpcHttpServer {
    config: Arc<ServerConfig>,
    dispatcher: Arc<RequestDispatcher>,
}

impl JsonRpcHttpServer {
    pub fn builder() -> JsonRpcHttpServerBuilder {
        JsonRpcHttpServerBuilder::new()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Run the accept loop. One task per connection; each inbound call is
    /// dispatched to completion on the task that received it.
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(&self.config.bind_address).await?;
        info!("JSON-RPC server listening on {}", self.config.bind_address);
        info!("serving routes: {}", self.config.listen.join(", "));

        loop {
            let (stream, peer_addr) = listener.accept().await?;
            debug!("new connection from {}", peer_addr);

            let config = Arc::clone(&self.config);
            let dispatcher = Arc::clone(&self.dispatcher);
            tokio::spawn(async move {
                let io = TokioIo::new(stream);
                let service = service_fn(move |req| {
                    let config = Arc::clone(&config);
                    let dispatcher = Arc::clone(&dispatcher);
                    async move { Ok::<_, hyper::Error>(route(&dispatcher, &config, req).await) }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    // Clients hanging up mid-exchange is routine, not a fault.
                    if err.to_string().contains("connection closed before message completed") {
                        debug!("client disconnected: {}", err);
                    } else {
                        error!("error serving connection: {}", err);
                    }
                }
            });
        }
    }
}

/// Route one request: paths outside the listen set never reach JSON-RPC
/// processing.
async fn route(
    dispatcher: &RequestDispatcher,
    config: &ServerConfig,
    req: Request<Incoming>,
) -> Response<Full<Bytes>> {
    if !config.is_listening(req.uri().path()) {
        return response::not_found_response();
    }
    endpoint::handle(dispatcher, config, req).await
}

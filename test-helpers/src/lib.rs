pub mod mock;
pub mod scripted;

pub use scripted::{Reply, ScriptedTransport};

use actix_web::http::StatusCode;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use payloads::APIClient;
use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// One canned answer from the stub backend.
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl StubResponse {
    pub fn json(value: serde_json::Value) -> Self {
        Self {
            status: 200,
            body: value.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A request as the stub backend saw it.
#[derive(Debug, Clone)]
pub struct Hit {
    pub method: String,
    pub path_and_query: String,
    pub accept: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

struct StubState {
    routes: HashMap<String, StubResponse>,
    hits: Mutex<Vec<Hit>>,
}

pub struct StubBackend {
    #[allow(unused)]
    pub port: u16,
    pub address: String,
    pub client: APIClient,
    state: web::Data<StubState>,
}

impl StubBackend {
    pub fn hits(&self) -> Vec<Hit> {
        self.state.hits.lock().unwrap().clone()
    }

    pub fn hits_for(&self, path: &str) -> Vec<Hit> {
        self.hits()
            .into_iter()
            .filter(|hit| hit.path_and_query.starts_with(path))
            .collect()
    }
}

/// Quiet tracing output for tests; safe to call more than once.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("error"))
        .with_test_writer()
        .try_init();
}

/// Start a stub backend answering `routes` (matched on path only; the query
/// string is ignored). Unknown paths get a FastAPI-style 404.
pub async fn spawn_backend(
    routes: impl IntoIterator<Item = (&'static str, StubResponse)>,
) -> StubBackend {
    init_test_tracing();

    let state = web::Data::new(StubState {
        routes: routes
            .into_iter()
            .map(|(path, response)| (path.to_string(), response))
            .collect(),
        hits: Mutex::new(Vec::new()),
    });

    // OS assigns the port
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = HttpServer::new({
        let state = state.clone();
        move || {
            App::new()
                .app_data(state.clone())
                .default_service(web::to(stub_handler))
        }
    })
    .workers(1)
    .listen(listener)
    .unwrap()
    .run();
    tokio::spawn(server);

    let address = format!("http://127.0.0.1:{port}");
    StubBackend {
        port,
        client: APIClient::new(address.clone()),
        address,
        state,
    }
}

/// Stub backend serving the whole [`mock`] dataset.
pub async fn spawn_factory_backend() -> StubBackend {
    spawn_backend([
        ("/api/spaces", StubResponse::json(mock::spaces())),
        ("/api/stock_summary", StubResponse::json(mock::stock_summary())),
        ("/api/obsoletos", StubResponse::json(mock::obsoletos())),
        ("/api/orders", StubResponse::json(mock::orders())),
        (
            "/api/orders_per_hour",
            StubResponse::json(mock::orders_per_hour()),
        ),
        (
            "/api/get-bank-statement",
            StubResponse::json(mock::bank_statement()),
        ),
        (
            mock::ORDER_FROM_INVOICE_PATH,
            StubResponse::json(mock::order_from_invoice()),
        ),
        (
            "/api/facturas-emitidas",
            StubResponse::json(mock::issued_invoices()),
        ),
    ])
    .await
}

async fn stub_handler(
    request: HttpRequest,
    body: web::Bytes,
    state: web::Data<StubState>,
) -> HttpResponse {
    let header = |name: &str| {
        request
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(String::from)
    };
    state.hits.lock().unwrap().push(Hit {
        method: request.method().to_string(),
        path_and_query: request
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| request.path().to_string()),
        accept: header("accept"),
        content_type: header("content-type"),
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    let Some(stub) = state.routes.get(request.path()).cloned() else {
        return HttpResponse::NotFound()
            .content_type("application/json")
            .body(r#"{"detail":"Not Found"}"#);
    };

    if !stub.delay.is_zero() {
        tokio::time::sleep(stub.delay).await;
    }
    let status = StatusCode::from_u16(stub.status)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status)
        .content_type("application/json")
        .body(stub.body)
}

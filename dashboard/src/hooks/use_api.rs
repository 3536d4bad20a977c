//! Polling fetch hook.
//!
//! Every view gets its data through [`use_api`]: it names an endpoint path
//! and receives an [`ApiHandle`] whose [`ApiState`] tracks the latest
//! `(data, loading, error)` triple. Behind the handle, one tokio task per
//! hook instance owns the timer and the single in-flight request:
//!
//! ```text
//!   mount ──► Fetching ──► Resolved(Success | Failure)
//!                │  ▲
//!    tick/refetch│  │new attempt
//!                ▼  │
//!            Superseded (dropped, never published)
//! ```
//!
//! Dropping the attempt future is what aborts the request, so a superseded
//! response cannot reach the published state.

use super::FetchState;
use payloads::{
    ApiRequest, RawResponse, Transport, TransportError, error_detail,
};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Query parameter carrying the incremental cursor.
pub const CURSOR_PARAM: &str = "since";

/// Response field the next cursor is read from.
const CURSOR_FIELD: &str = "lastUpdated";

/// Combines the previous data (if any) with a freshly fetched payload.
pub type MergeFn = Arc<dyn Fn(Option<&Value>, Value) -> Value + Send + Sync>;

/// Extra transport options merged into every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    pub method: Method,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Value>,
    /// Unset leaves the transport's own default in place.
    pub timeout: Option<Duration>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: BTreeMap::new(),
            body: None,
            timeout: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiConfig {
    pub options: FetchOptions,
    /// Fixed wall-clock period between fetches. Zero fetches once.
    pub polling_interval: Duration,
    /// Send the cursor from the last successful response with each fetch.
    pub incremental: bool,
}

impl ApiConfig {
    pub fn polling(interval: Duration) -> Self {
        Self {
            polling_interval: interval,
            ..Self::default()
        }
    }

    fn ticker(&self) -> Option<Interval> {
        if self.polling_interval.is_zero() {
            return None;
        }
        // The immediate fetch happens on mount, so the first tick is one
        // period out.
        let mut interval = time::interval_at(
            Instant::now() + self.polling_interval,
            self.polling_interval,
        );
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Some(interval)
    }
}

/// Path plus configuration: the signature a hook instance is keyed on.
/// Two endpoints are the same dependency exactly when they compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub path: String,
    pub config: ApiConfig,
}

impl Endpoint {
    pub fn new(path: impl Into<String>, config: ApiConfig) -> Self {
        Self {
            path: path.into(),
            config,
        }
    }

    fn request(&self, cursor: Option<&str>) -> ApiRequest {
        let options = &self.config.options;
        let mut request = ApiRequest {
            method: options.method.clone(),
            path: self.path.clone(),
            query: Vec::new(),
            headers: options.headers.clone(),
            body: options.body.clone(),
            timeout: options.timeout,
        };
        if self.config.incremental
            && let Some(cursor) = cursor
        {
            request
                .query
                .push((CURSOR_PARAM.to_string(), cursor.to_string()));
        }
        request
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("Error {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("Invalid JSON response: {0}")]
    Decode(String),
}

impl FetchError {
    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// What a consumer sees. `data` and `error` hold the last resolved outcome;
/// `loading` is true while an attempt is in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiState {
    pub data: FetchState<Value>,
    pub loading: bool,
    pub error: Option<FetchError>,
}

impl ApiState {
    fn pending() -> Self {
        Self {
            data: FetchState::NotFetched,
            loading: true,
            error: None,
        }
    }

    /// The error as the human-readable string shown to users.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// Decode the current data into a typed payload. `None` until data has
    /// been fetched.
    pub fn decode<T: DeserializeOwned>(
        &self,
    ) -> Option<Result<T, serde_json::Error>> {
        self.data
            .as_ref()
            .map(|value| T::deserialize(value))
    }
}

enum Command {
    Reconfigure(Endpoint),
    Refetch,
}

/// Consumer side of a hook instance. Dropping it tears the instance down.
pub struct ApiHandle {
    endpoint: Endpoint,
    state: watch::Receiver<ApiState>,
    commands: mpsc::UnboundedSender<Command>,
    cancel: CancellationToken,
}

impl ApiHandle {
    pub fn state(&self) -> ApiState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ApiState> {
        self.state.clone()
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Point the hook at a new endpoint. Returns false, and does nothing,
    /// when the new endpoint equals the current one.
    pub fn set_endpoint(&mut self, endpoint: Endpoint) -> bool {
        if endpoint == self.endpoint {
            return false;
        }
        self.endpoint = endpoint.clone();
        let _ = self.commands.send(Command::Reconfigure(endpoint));
        true
    }

    /// Fetch now, superseding any attempt still in flight.
    pub fn refetch(&self) {
        let _ = self.commands.send(Command::Refetch);
    }

    /// Stop polling and abort the in-flight request. No state is published
    /// afterwards.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for ApiHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Mount a hook instance against `path`. New data replaces old data.
///
/// Must be called from within a tokio runtime.
pub fn use_api<T: Transport>(
    transport: Arc<T>,
    path: impl Into<String>,
    config: ApiConfig,
) -> ApiHandle {
    spawn_hook(transport, Endpoint::new(path, config), None)
}

/// Like [`use_api`], folding each new payload into the existing data with
/// `merge`. The merge function is fixed for the life of the hook and is not
/// part of its endpoint signature.
pub fn use_api_with_merge<T, F>(
    transport: Arc<T>,
    path: impl Into<String>,
    config: ApiConfig,
    merge: F,
) -> ApiHandle
where
    T: Transport,
    F: Fn(Option<&Value>, Value) -> Value + Send + Sync + 'static,
{
    spawn_hook(transport, Endpoint::new(path, config), Some(Arc::new(merge)))
}

fn spawn_hook<T: Transport>(
    transport: Arc<T>,
    endpoint: Endpoint,
    merge: Option<MergeFn>,
) -> ApiHandle {
    let (state_tx, state_rx) = watch::channel(ApiState::pending());
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();

    let driver = Driver {
        transport,
        endpoint: endpoint.clone(),
        merge,
        cursor: None,
        state: state_tx,
        commands: command_rx,
        cancel: cancel.clone(),
    };
    tokio::spawn(driver.run());

    ApiHandle {
        endpoint,
        state: state_rx,
        commands: command_tx,
        cancel,
    }
}

type Attempt<'a> = Pin<
    Box<dyn Future<Output = Result<RawResponse, TransportError>> + Send + 'a>,
>;

struct Driver<T> {
    transport: Arc<T>,
    endpoint: Endpoint,
    merge: Option<MergeFn>,
    cursor: Option<String>,
    state: watch::Sender<ApiState>,
    commands: mpsc::UnboundedReceiver<Command>,
    cancel: CancellationToken,
}

impl<T: Transport> Driver<T> {
    async fn run(mut self) {
        let transport = Arc::clone(&self.transport);

        'mount: loop {
            let mut ticker = self.endpoint.config.ticker();
            let mut attempt: Option<Attempt<'_>> =
                Some(Box::pin(transport.execute(self.begin_attempt())));

            loop {
                tokio::select! {
                    biased;

                    () = self.cancel.cancelled() => {
                        tracing::debug!(path = %self.endpoint.path, "hook torn down");
                        return;
                    }
                    command = self.commands.recv() => match command {
                        Some(Command::Reconfigure(endpoint)) => {
                            self.remount(endpoint);
                            continue 'mount;
                        }
                        Some(Command::Refetch) => {
                            self.supersede(&mut attempt);
                            attempt = Some(Box::pin(
                                transport.execute(self.begin_attempt()),
                            ));
                        }
                        None => return,
                    },
                    outcome = next_outcome(&mut attempt) => {
                        attempt = None;
                        self.resolve(outcome);
                    }
                    () = next_tick(&mut ticker) => {
                        self.supersede(&mut attempt);
                        attempt = Some(Box::pin(
                            transport.execute(self.begin_attempt()),
                        ));
                    }
                }
            }
        }
    }

    /// Publish `loading` and build the request for a new attempt.
    fn begin_attempt(&mut self) -> ApiRequest {
        let request = self.endpoint.request(self.cursor.as_deref());
        self.state
            .send_if_modified(|state| !std::mem::replace(&mut state.loading, true));
        tracing::debug!(path = %request.path, query = ?request.query, "dispatching request");
        request
    }

    /// Abort the in-flight attempt, if any, before a new one is issued.
    fn supersede(&self, attempt: &mut Option<Attempt<'_>>) {
        if attempt.take().is_some() {
            tracing::debug!(path = %self.endpoint.path, "superseding in-flight request");
        }
    }

    /// Drop everything tied to the old endpoint and start from scratch.
    fn remount(&mut self, endpoint: Endpoint) {
        tracing::debug!(from = %self.endpoint.path, to = %endpoint.path, "endpoint changed");
        self.endpoint = endpoint;
        self.cursor = None;
        self.state.send_replace(ApiState::pending());
    }

    fn resolve(&mut self, outcome: Result<RawResponse, TransportError>) {
        if self.cancel.is_cancelled() {
            return;
        }

        match interpret(outcome) {
            Ok(payload) => {
                if self.endpoint.config.incremental
                    && let Some(cursor) = cursor_of(&payload)
                {
                    self.cursor = Some(cursor);
                }
                let merge = self.merge.as_ref();
                self.state.send_modify(|state| {
                    let combined = match merge {
                        Some(merge) => merge(state.data.as_ref(), payload),
                        None => payload,
                    };
                    state.data = FetchState::Fetched(combined);
                    state.error = None;
                    state.loading = false;
                });
            }
            Err(error) => {
                tracing::warn!(path = %self.endpoint.path, %error, "request failed");
                // Last good data stays visible next to the error.
                self.state.send_modify(|state| {
                    state.error = Some(error);
                    state.loading = false;
                });
            }
        }
    }
}

async fn next_outcome(
    attempt: &mut Option<Attempt<'_>>,
) -> Result<RawResponse, TransportError> {
    match attempt {
        Some(attempt) => attempt.await,
        None => std::future::pending().await,
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

/// Turn a raw exchange into a payload or a user-facing error.
fn interpret(
    outcome: Result<RawResponse, TransportError>,
) -> Result<Value, FetchError> {
    let response = outcome?;
    if !response.status.is_success() {
        return Err(FetchError::Status {
            status: response.status.as_u16(),
            detail: error_detail(response.status, &response.body),
        });
    }
    if response.status == StatusCode::NO_CONTENT
        || response.body.trim().is_empty()
    {
        return Ok(Value::Null);
    }
    serde_json::from_str(&response.body)
        .map_err(|error| FetchError::Decode(error.to_string()))
}

fn cursor_of(payload: &Value) -> Option<String> {
    match payload.get(CURSOR_FIELD)? {
        Value::String(cursor) => Some(cursor.clone()),
        Value::Number(cursor) => Some(cursor.to_string()),
        _ => None,
    }
}

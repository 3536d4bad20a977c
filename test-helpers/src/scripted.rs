//! A [`Transport`] whose replies and latencies are decided by the test.

use payloads::{ApiRequest, RawResponse, Transport, TransportError};
use reqwest::StatusCode;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the scripted backend answers, and how long it takes.
#[derive(Debug, Clone)]
pub struct Reply {
    pub delay: Duration,
    pub outcome: Result<RawResponse, TransportError>,
}

impl Reply {
    pub fn json(value: serde_json::Value) -> Self {
        Self::raw(StatusCode::OK, value.to_string())
    }

    pub fn status(code: u16, body: &str) -> Self {
        let status = StatusCode::from_u16(code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::raw(status, body.to_string())
    }

    pub fn no_content() -> Self {
        Self::raw(StatusCode::NO_CONTENT, String::new())
    }

    pub fn unreachable() -> Self {
        Self {
            delay: Duration::ZERO,
            outcome: Err(TransportError::Unreachable(
                "connection refused".into(),
            )),
        }
    }

    pub fn raw(status: StatusCode, body: String) -> Self {
        Self {
            delay: Duration::ZERO,
            outcome: Ok(RawResponse { status, body }),
        }
    }

    /// Resolve only after `delay` has elapsed on the tokio clock.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

type Responder = dyn Fn(&ApiRequest, usize) -> Reply + Send + Sync;

struct Inner {
    responder: Box<Responder>,
    log: Mutex<Vec<ApiRequest>>,
    live: AtomicUsize,
    max_live: AtomicUsize,
    completed: AtomicUsize,
    aborted: AtomicUsize,
}

/// Fake transport that records every request and tracks how many are in
/// flight at once.
#[derive(Clone)]
pub struct ScriptedTransport {
    inner: Arc<Inner>,
}

impl ScriptedTransport {
    /// `responder` gets each request and its zero-based dispatch index.
    pub fn new(
        responder: impl Fn(&ApiRequest, usize) -> Reply + Send + Sync + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                responder: Box::new(responder),
                log: Mutex::new(Vec::new()),
                live: AtomicUsize::new(0),
                max_live: AtomicUsize::new(0),
                completed: AtomicUsize::new(0),
                aborted: AtomicUsize::new(0),
            }),
        }
    }

    pub fn always(reply: Reply) -> Self {
        Self::new(move |_, _| reply.clone())
    }

    /// Answer with `replies` in order, repeating the last one afterwards.
    pub fn sequence(replies: Vec<Reply>) -> Self {
        assert!(!replies.is_empty(), "sequence needs at least one reply");
        Self::new(move |_, index| {
            replies[index.min(replies.len() - 1)].clone()
        })
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.inner.log.lock().unwrap().clone()
    }

    pub fn dispatched(&self) -> usize {
        self.inner.log.lock().unwrap().len()
    }

    pub fn completed(&self) -> usize {
        self.inner.completed.load(Ordering::SeqCst)
    }

    /// Requests dropped before their reply was delivered.
    pub fn aborted(&self) -> usize {
        self.inner.aborted.load(Ordering::SeqCst)
    }

    /// Highest number of requests that were in flight simultaneously.
    pub fn max_live(&self) -> usize {
        self.inner.max_live.load(Ordering::SeqCst)
    }
}

impl Transport for ScriptedTransport {
    fn execute(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send {
        let reply = {
            let mut log = self.inner.log.lock().unwrap();
            let index = log.len();
            log.push(request.clone());
            (self.inner.responder)(&request, index)
        };
        let guard = LiveGuard::enter(Arc::clone(&self.inner));

        async move {
            let mut guard = guard;
            tokio::time::sleep(reply.delay).await;
            guard.finish();
            reply.outcome
        }
    }
}

/// Counts a request as live from dispatch until it either completes or is
/// dropped.
struct LiveGuard {
    inner: Arc<Inner>,
    finished: bool,
}

impl LiveGuard {
    fn enter(inner: Arc<Inner>) -> Self {
        let live = inner.live.fetch_add(1, Ordering::SeqCst) + 1;
        inner.max_live.fetch_max(live, Ordering::SeqCst);
        Self {
            inner,
            finished: false,
        }
    }

    fn finish(&mut self) {
        self.finished = true;
        self.inner.completed.fetch_add(1, Ordering::SeqCst);
    }
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.inner.live.fetch_sub(1, Ordering::SeqCst);
        if !self.finished {
            self.inner.aborted.fetch_add(1, Ordering::SeqCst);
        }
    }
}

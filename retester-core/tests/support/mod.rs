//! Mock ports and builders for session tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use futures::channel::oneshot;

use retester_common::{GroupResult, MatchResponse, MatchResult, OptionCatalog};
use retester_core::ports::ParamsHandler;
use retester_core::{
    EngineError, EngineInfo, MatchEngine, MatchRequest, Navigation, SessionConfig, SessionPorts,
    Telemetry, TelemetryEvent, TestSession, TokioTimers, UrlParams,
};

/// Initialize tracing for tests with proper test output handling
#[allow(dead_code)]
pub fn tracing_init() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_target(false)
        .try_init();
}

pub struct MockNavigation {
    pub params: RefCell<UrlParams>,
    pub replaced: RefCell<Vec<String>>,
    pub handler: RefCell<Option<ParamsHandler>>,
}

impl MockNavigation {
    pub fn with_params(params: UrlParams) -> Rc<Self> {
        Rc::new(Self {
            params: RefCell::new(params),
            replaced: RefCell::new(Vec::new()),
            handler: RefCell::new(None),
        })
    }

    /// Simulate the browser location changing under the session.
    #[allow(dead_code)]
    pub fn fire_params(&self, params: UrlParams) {
        *self.params.borrow_mut() = params.clone();
        if let Some(handler) = &*self.handler.borrow() {
            handler(params);
        }
    }
}

impl Navigation for MockNavigation {
    fn current_params(&self) -> UrlParams {
        self.params.borrow().clone()
    }

    fn replace_url(&self, path: &str) {
        self.replaced.borrow_mut().push(path.to_string());
    }

    fn watch_params(&self, handler: ParamsHandler) {
        *self.handler.borrow_mut() = Some(handler);
    }

    fn stop_watching(&self) {
        self.handler.borrow_mut().take();
    }
}

#[derive(Default)]
pub struct MockTelemetry {
    pub events: RefCell<Vec<TelemetryEvent>>,
    pub page_views: RefCell<Vec<String>>,
    pub metadata: RefCell<Vec<(String, String)>>,
}

impl Telemetry for MockTelemetry {
    fn report_event(&self, event: TelemetryEvent) {
        self.events.borrow_mut().push(event);
    }

    fn page_view(&self, path: &str) {
        self.page_views.borrow_mut().push(path.to_string());
    }

    fn set_page_metadata(&self, key: &str, value: &str) {
        self.metadata
            .borrow_mut()
            .push((key.to_string(), value.to_string()));
    }
}

/// Scripted engine: either answers from a canned queue, or (in manual mode)
/// parks every request until the test resolves it, to control response
/// ordering.
pub struct MockEngine {
    manual: bool,
    pub requests: RefCell<Vec<MatchRequest>>,
    pub canned: RefCell<VecDeque<Result<MatchResponse, EngineError>>>,
    pub pending: RefCell<Vec<Option<oneshot::Sender<Result<MatchResponse, EngineError>>>>>,
    pub info_calls: Cell<usize>,
}

impl MockEngine {
    pub fn ready(outcomes: Vec<Result<MatchResponse, EngineError>>) -> Rc<Self> {
        Rc::new(Self {
            manual: false,
            requests: RefCell::new(Vec::new()),
            canned: RefCell::new(outcomes.into()),
            pending: RefCell::new(Vec::new()),
            info_calls: Cell::new(0),
        })
    }

    #[allow(dead_code)]
    pub fn manual() -> Rc<Self> {
        Rc::new(Self {
            manual: true,
            requests: RefCell::new(Vec::new()),
            canned: RefCell::new(VecDeque::new()),
            pending: RefCell::new(Vec::new()),
            info_calls: Cell::new(0),
        })
    }

    /// Resolve the n-th parked request (manual mode).
    #[allow(dead_code)]
    pub fn resolve(&self, index: usize, outcome: Result<MatchResponse, EngineError>) {
        let sender = self.pending.borrow_mut()[index]
            .take()
            .expect("request already resolved");
        let _ = sender.send(outcome);
    }
}

#[async_trait(?Send)]
impl MatchEngine for MockEngine {
    async fn submit(&self, request: MatchRequest) -> Result<MatchResponse, EngineError> {
        self.requests.borrow_mut().push(request);
        if self.manual {
            let (tx, rx) = oneshot::channel();
            self.pending.borrow_mut().push(Some(tx));
            rx.await.expect("mock sender dropped")
        } else {
            self.canned
                .borrow_mut()
                .pop_front()
                .expect("no canned response left")
        }
    }

    async fn info(&self) -> Result<EngineInfo, EngineError> {
        self.info_calls.set(self.info_calls.get() + 1);
        Ok(EngineInfo {
            framework: "mock-engine/1.0".to_string(),
        })
    }
}

pub struct Harness {
    pub nav: Rc<MockNavigation>,
    pub engine: Rc<MockEngine>,
    pub telemetry: Rc<MockTelemetry>,
    pub session: TestSession,
}

/// Start a session against mock ports, with default catalog and config.
pub fn start_session(params: UrlParams, engine: Rc<MockEngine>) -> Harness {
    let nav = MockNavigation::with_params(params);
    let telemetry = Rc::new(MockTelemetry::default());
    let session = TestSession::start(
        SessionPorts {
            engine: Rc::clone(&engine) as Rc<dyn MatchEngine>,
            navigation: Rc::clone(&nav) as Rc<dyn Navigation>,
            telemetry: Rc::clone(&telemetry) as Rc<dyn Telemetry>,
            timers: Rc::new(TokioTimers),
        },
        OptionCatalog::default(),
        SessionConfig::default(),
        Rc::new(|| {}),
    );

    Harness {
        nav,
        engine,
        telemetry,
        session,
    }
}

pub fn group(index: u32, length: u32, value: &str) -> GroupResult {
    GroupResult {
        name: None,
        index,
        length,
        value: value.to_string(),
    }
}

pub fn match_at(index: u32, length: u32, value: &str, groups: Vec<GroupResult>) -> MatchResult {
    MatchResult {
        name: None,
        index,
        length,
        value: value.to_string(),
        groups,
    }
}

pub fn response(matches: Vec<MatchResult>) -> MatchResponse {
    MatchResponse { matches }
}

/// URL-safe base64 of a path segment, as the share-URL codec produces it.
pub fn encoded(text: &str) -> String {
    URL_SAFE_NO_PAD.encode(text.as_bytes())
}

/// Let spawned local tasks run to their next suspension point.
pub async fn drain() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

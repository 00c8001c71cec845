//! Test-session controller.
//!
//! Owns the test case the user is editing, debounces edits into engine
//! submissions, publishes the canonical share URL, and projects responses
//! into the table rows and highlight spans the shell renders.
//!
//! Everything runs on one cooperative event loop; the only suspension
//! points are the debounce sleep, the in-flight engine request, and the
//! settle delay before highlights are published. Each submission carries a
//! generation number so a response that arrives after a newer submission is
//! discarded instead of overwriting it.

use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, info, warn};

use retester_common::{project, HighlightSpan, MatchResponse, OptionCatalog, TableRow};

use crate::config::SessionConfig;
use crate::debounce::{Debouncer, TimerHost};
use crate::engine::{EngineError, MatchEngine, MatchRequest};
use crate::ports::{Navigation, Telemetry, TelemetryEvent, UrlParams};
use crate::share_url;
use crate::test_case::TestCase;

/// Lifecycle of a test run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Nothing pending and nothing in flight.
    Idle,
    /// Edits received, debounce armed.
    Editing,
    /// Request in flight.
    Submitting,
    /// Response projected and highlights published.
    Completed,
}

/// Collaborators supplied by the surrounding shell.
pub struct SessionPorts {
    pub engine: Rc<dyn MatchEngine>,
    pub navigation: Rc<dyn Navigation>,
    pub telemetry: Rc<dyn Telemetry>,
    pub timers: Rc<dyn TimerHost>,
}

struct SessionState {
    case: TestCase,
    phase: SessionPhase,
    busy: bool,
    result: Option<MatchResponse>,
    rows: Vec<TableRow>,
    highlights: Vec<HighlightSpan>,
    generation: u64,
}

/// Shared handle to one test session; clones share state.
///
/// Call [`TestSession::shutdown`] when the hosting view goes away: it
/// disarms the pending submit and releases the navigation subscription
/// (which also breaks the reference cycle the subscription creates).
#[derive(Clone)]
pub struct TestSession {
    state: Rc<RefCell<SessionState>>,
    ports: Rc<SessionPorts>,
    catalog: Rc<OptionCatalog>,
    config: Rc<SessionConfig>,
    debounce: Debouncer,
    on_change: Rc<dyn Fn()>,
}

impl TestSession {
    /// Build a session and bring it live: warm up the engine, decode the
    /// test case from the current location, watch for location changes, and
    /// attempt an initial submission (a no-op for the empty case).
    ///
    /// `on_change` is invoked after every observable state transition so
    /// the hosting view can re-render.
    pub fn start(
        ports: SessionPorts,
        catalog: OptionCatalog,
        config: SessionConfig,
        on_change: Rc<dyn Fn()>,
    ) -> Self {
        let session = Self {
            state: Rc::new(RefCell::new(SessionState {
                case: TestCase::default(),
                phase: SessionPhase::Idle,
                busy: false,
                result: None,
                rows: Vec::new(),
                highlights: Vec::new(),
                generation: 0,
            })),
            debounce: Debouncer::new(Rc::clone(&ports.timers)),
            ports: Rc::new(ports),
            catalog: Rc::new(catalog),
            config: Rc::new(config),
            on_change,
        };

        session.warm_up();

        let watcher = session.clone();
        session.ports.navigation.watch_params(Box::new(move |params| {
            watcher.apply_params(params);
            watcher.submit();
        }));

        let params = session.ports.navigation.current_params();
        session.apply_params(params);
        session.submit();

        session
    }

    /// Disarm the pending submit and release the navigation subscription.
    pub fn shutdown(&self) {
        self.debounce.cancel_pending();
        self.ports.navigation.stop_watching();
    }

    // -- state accessors --

    pub fn case(&self) -> Ref<'_, TestCase> {
        Ref::map(self.state.borrow(), |s| &s.case)
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.borrow().phase
    }

    pub fn busy(&self) -> bool {
        self.state.borrow().busy
    }

    pub fn result(&self) -> Ref<'_, Option<MatchResponse>> {
        Ref::map(self.state.borrow(), |s| &s.result)
    }

    pub fn rows(&self) -> Ref<'_, [TableRow]> {
        Ref::map(self.state.borrow(), |s| s.rows.as_slice())
    }

    pub fn highlights(&self) -> Ref<'_, [HighlightSpan]> {
        Ref::map(self.state.borrow(), |s| s.highlights.as_slice())
    }

    /// Canonical share URL for the current case.
    pub fn share_url(&self) -> String {
        share_url::to_url(&self.state.borrow().case, &self.catalog)
    }

    // -- edits --

    pub fn edit_pattern(&self, pattern: impl Into<String>) {
        self.state.borrow_mut().case.pattern = pattern.into();
        self.schedule_submit(None);
    }

    pub fn edit_text(&self, text: impl Into<String>) {
        self.state.borrow_mut().case.text = text.into();
        self.schedule_submit(None);
    }

    /// Set or clear the replacement template (`None` = replace tab inactive).
    pub fn set_replace(&self, replace: Option<String>) {
        self.state.borrow_mut().case.replace = replace;
        self.schedule_submit(None);
    }

    /// Toggle one named option on or off.
    pub fn set_option(&self, name: &str, checked: bool) {
        {
            let mut state = self.state.borrow_mut();
            if checked {
                state.case.options.insert(name.to_string());
            } else {
                state.case.options.remove(name);
            }
        }
        self.schedule_submit(None);
    }

    /// Clear current highlights and arm a debounced submission.
    ///
    /// Every call replaces the previously armed one, so a typing burst
    /// submits once, after the quiet period. `delay` overrides the
    /// configured debounce delay when given.
    pub fn schedule_submit(&self, delay: Option<Duration>) {
        {
            let mut state = self.state.borrow_mut();
            state.highlights.clear();
            state.phase = SessionPhase::Editing;
        }

        let session = self.clone();
        let delay = delay.unwrap_or(self.config.debounce_delay);
        self.debounce.schedule(delay, move || session.submit());
        (self.on_change)();
    }

    /// Submit the current test case to the engine.
    ///
    /// A case with an empty pattern or empty text is not submittable; the
    /// session returns to idle without touching the URL or the network.
    pub fn submit(&self) {
        let submission = {
            let mut state = self.state.borrow_mut();
            if state.case.pattern.is_empty() || state.case.text.is_empty() {
                state.phase = SessionPhase::Idle;
                None
            } else {
                state.busy = true;
                state.phase = SessionPhase::Submitting;
                state.result = None;
                state.rows.clear();
                state.highlights.clear();
                state.generation += 1;

                let request = MatchRequest {
                    pattern: state.case.pattern.clone(),
                    text: state.case.text.clone(),
                    replace: state.case.replace.clone(),
                    options: self.catalog.encode(&state.case.options),
                };
                let url = share_url::to_url(&state.case, &self.catalog);
                Some((state.generation, url, request))
            }
        };
        (self.on_change)();

        let Some((generation, url, request)) = submission else {
            return;
        };

        debug!("submitting test case (generation {generation})");
        self.publish_url(&url, &request);

        let session = self.clone();
        self.ports.timers.spawn(Box::pin(async move {
            let outcome = session.ports.engine.submit(request).await;
            session.finish(generation, outcome).await;
        }));
    }

    /// Non-blocking engine warm-up; logs the engine banner when it answers.
    fn warm_up(&self) {
        let engine = Rc::clone(&self.ports.engine);
        self.ports.timers.spawn(Box::pin(async move {
            match engine.info().await {
                Ok(info) => info!("Engine: {}", info.framework),
                Err(e) => debug!("engine warm-up failed: {e}"),
            }
        }));
    }

    /// Replace pattern, text and options with values decoded from location
    /// parameters. The replace template is not URL-carried and survives.
    fn apply_params(&self, params: UrlParams) {
        let decoded = share_url::from_params(&params, &self.catalog);
        {
            let mut state = self.state.borrow_mut();
            state.case.pattern = decoded.pattern;
            state.case.text = decoded.text;
            state.case.options = decoded.options;
        }
        (self.on_change)();
    }

    /// Canonical URL and page-level side effects for one accepted
    /// submission.
    fn publish_url(&self, url: &str, request: &MatchRequest) {
        self.ports.navigation.replace_url(url);
        self.ports.telemetry.page_view(url);
        self.ports.telemetry.report_event(TelemetryEvent {
            event: "regex".to_string(),
            category: request.pattern.clone(),
            action: request.text.clone(),
            label: request.options.to_string(),
        });
        self.ports.telemetry.set_page_metadata("og:url", url);
        self.ports
            .telemetry
            .set_page_metadata("og:description", &format!("Pattern: {}", request.pattern));
    }

    /// Fold an engine outcome back into the session.
    async fn finish(&self, generation: u64, outcome: Result<MatchResponse, EngineError>) {
        let response = match outcome {
            Ok(response) => response,
            Err(e) => {
                warn!("match request failed: {e}");
                {
                    let mut state = self.state.borrow_mut();
                    if state.generation == generation {
                        state.busy = false;
                        state.phase = SessionPhase::Idle;
                    }
                }
                (self.on_change)();
                return;
            }
        };

        let highlights = {
            let mut state = self.state.borrow_mut();
            if state.generation != generation {
                debug!("discarding stale response (generation {generation})");
                return;
            }
            let projection = project(&response.matches, self.config.palette_size);
            state.rows = projection.rows;
            state.result = Some(response);
            projection.highlights
        };
        (self.on_change)();

        // Let the table render before the highlight overlay mounts.
        self.ports.timers.sleep(self.config.debounce_delay).await;

        {
            let mut state = self.state.borrow_mut();
            if state.generation != generation {
                debug!("discarding stale highlights (generation {generation})");
                return;
            }
            state.highlights = highlights;
            state.busy = false;
            state.phase = SessionPhase::Completed;
        }
        (self.on_change)();
    }
}

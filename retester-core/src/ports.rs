//! Ports implemented by the surrounding shell.
//!
//! The session core never touches the browser, the network stack or an
//! analytics SDK directly; the shell hands in implementations of these
//! traits. The matching-engine port lives in [`crate::engine`].

/// Raw path parameters as the navigation shell sees them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParams {
    pub pattern: Option<String>,
    pub text: Option<String>,
    pub options: Option<String>,
}

/// Callback invoked when the location parameters change under the session.
pub type ParamsHandler = Box<dyn Fn(UrlParams)>;

/// Address-bar access.
pub trait Navigation {
    /// Parameters of the current location.
    fn current_params(&self) -> UrlParams;
    /// Replace the visible URL without adding a history entry.
    fn replace_url(&self, path: &str);
    /// Install the change handler. A later call replaces the earlier one.
    fn watch_params(&self, handler: ParamsHandler);
    /// Drop the installed handler; no callbacks fire afterwards.
    fn stop_watching(&self);
}

/// A user-behavior event for the analytics sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryEvent {
    pub event: String,
    pub category: String,
    pub action: String,
    pub label: String,
}

/// Fire-and-forget analytics and page-metadata sink. No return values are
/// consumed; implementations swallow their own failures.
pub trait Telemetry {
    fn report_event(&self, event: TelemetryEvent);
    fn page_view(&self, path: &str);
    fn set_page_metadata(&self, key: &str, value: &str);
}

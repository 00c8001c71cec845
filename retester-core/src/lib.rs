//! retester-core - client-side session core of the remote match tester
//!
//! Owns the canonical share-URL codec, the debounced submission scheduler,
//! the ports to the surrounding shell (navigation, matching engine,
//! telemetry) and the session controller that ties them together. The shell
//! itself (rendering, transport wiring) lives outside this crate.

pub mod config;
pub mod debounce;
pub mod engine;
pub mod ports;
pub mod session;
pub mod share_url;
pub mod test_case;

pub use config::SessionConfig;
pub use debounce::{Debouncer, TimerHost};
pub use engine::{EngineError, EngineInfo, HttpMatchEngine, MatchEngine, MatchRequest};
pub use ports::{Navigation, Telemetry, TelemetryEvent, UrlParams};
pub use session::{SessionPhase, SessionPorts, TestSession};
pub use test_case::TestCase;

#[cfg(not(target_arch = "wasm32"))]
pub use debounce::TokioTimers;

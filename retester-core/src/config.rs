use std::time::Duration;

/// Tunables for a test session.
///
/// Injected at construction; the defaults match the hosted tester. The
/// debounce delay doubles as the settle delay between publishing table rows
/// and mounting the highlight overlay.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Quiet period between the last edit and an automatic submission.
    pub debounce_delay: Duration,
    /// Number of distinct highlight colors to cycle through.
    pub palette_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce_delay: Duration::from_millis(500),
            palette_size: 5,
        }
    }
}

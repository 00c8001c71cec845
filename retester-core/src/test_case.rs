use std::collections::BTreeSet;

/// What the user is editing: pattern, sample text, and engine options, plus
/// the optional replacement template.
///
/// Owned exclusively by the session controller. Pattern and text may be
/// empty mid-edit; the controller suppresses submission until both are
/// non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestCase {
    pub pattern: String,
    pub text: String,
    /// `None` while the replace tab is inactive; the engine then only
    /// matches instead of rewriting.
    pub replace: Option<String>,
    /// Names of the checked options, resolved against the option catalog.
    pub options: BTreeSet<String>,
}

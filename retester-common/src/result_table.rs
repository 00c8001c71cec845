//! Projection of an engine response into display-ready structures.
//!
//! Pure decision logic without any I/O: the same response and palette size
//! always produce the same rows and spans.

use crate::match_result::{GroupResult, MatchResult};

/// Display fields for a match, attached to the first row of its group block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchHeader {
    pub name: Option<String>,
    pub index: u32,
    pub length: u32,
    pub value: String,
    pub css_class: String,
    /// Number of table rows this header spans, one per group.
    pub rowspan: usize,
}

/// One row of the flattened match/group table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Present only on the first row of a match's group block.
    pub header: Option<MatchHeader>,
    pub group: GroupResult,
}

/// One highlighted region of the sample text, one per match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSpan {
    pub css_class: String,
    pub start: u32,
    pub end: u32,
}

/// Table rows and highlight spans derived from one engine response.
///
/// Replaced wholesale on every response; rows and spans carry no identity
/// beyond the response that produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    pub rows: Vec<TableRow>,
    pub highlights: Vec<HighlightSpan>,
}

/// Color class of the n-th match. Colors cycle by match ordinal, not by row,
/// so every row of a match agrees with its highlight span.
fn color_class(ordinal: usize, palette_size: usize) -> String {
    // An empty palette degrades to a single color.
    format!("match-{}", ordinal % palette_size.max(1))
}

/// Flatten an engine response into table rows and highlight spans.
///
/// A match contributes one row per capture group (none when the engine
/// reports no groups) and exactly one highlight span either way.
pub fn project(matches: &[MatchResult], palette_size: usize) -> Projection {
    let mut rows = Vec::new();
    let mut highlights = Vec::with_capacity(matches.len());

    for (ordinal, m) in matches.iter().enumerate() {
        for (group_index, group) in m.groups.iter().enumerate() {
            let header = if group_index == 0 {
                Some(MatchHeader {
                    name: m.name.clone(),
                    index: m.index,
                    length: m.length,
                    value: m.value.clone(),
                    css_class: color_class(ordinal, palette_size),
                    rowspan: m.groups.len(),
                })
            } else {
                None
            };
            rows.push(TableRow {
                header,
                group: group.clone(),
            });
        }

        highlights.push(HighlightSpan {
            css_class: color_class(ordinal, palette_size),
            start: m.index,
            end: m.index + m.length,
        });
    }

    Projection { rows, highlights }
}

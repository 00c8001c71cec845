//! Engine option catalog and its bitmask codec.
//!
//! The set of checked options travels over the wire (and inside the share
//! URL) as a single integer bitmask. Bit values are pairwise distinct powers
//! of two, so the mask is a lossless encoding of any catalog subset.

use std::collections::BTreeSet;

/// A named boolean engine option and its wire bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionFlag {
    pub name: &'static str,
    pub bit: u32,
}

/// Fixed, ordered catalog of the options the engine understands.
///
/// Injected into the codecs and the session rather than read from a global,
/// so tests and alternative engines can swap it out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionCatalog {
    flags: Vec<OptionFlag>,
}

impl OptionCatalog {
    pub fn new(flags: Vec<OptionFlag>) -> Self {
        debug_assert!(
            flags.iter().all(|f| f.bit.is_power_of_two()),
            "option bits must be powers of two"
        );
        debug_assert_eq!(
            flags.iter().map(|f| f.bit).collect::<BTreeSet<_>>().len(),
            flags.len(),
            "option bits must be distinct"
        );
        Self { flags }
    }

    /// Catalog entries in display order.
    pub fn flags(&self) -> &[OptionFlag] {
        &self.flags
    }

    /// Sum the bits of every selected option. Names not in the catalog
    /// contribute nothing.
    pub fn encode(&self, selected: &BTreeSet<String>) -> u32 {
        self.flags
            .iter()
            .filter(|flag| selected.contains(flag.name))
            .map(|flag| flag.bit)
            .sum()
    }

    /// Names of the catalog entries present in `mask`. Bits the catalog does
    /// not know are ignored, so masks from newer engines decode cleanly.
    pub fn decode(&self, mask: u32) -> BTreeSet<String> {
        self.flags
            .iter()
            .filter(|flag| mask & flag.bit == flag.bit)
            .map(|flag| flag.name.to_string())
            .collect()
    }
}

impl Default for OptionCatalog {
    /// The flag set of the hosted engine, with its wire values.
    fn default() -> Self {
        Self::new(vec![
            OptionFlag { name: "IgnoreCase", bit: 1 },
            OptionFlag { name: "Multiline", bit: 2 },
            OptionFlag { name: "ExplicitCapture", bit: 4 },
            OptionFlag { name: "Singleline", bit: 16 },
            OptionFlag { name: "IgnorePatternWhitespace", bit: 32 },
            OptionFlag { name: "RightToLeft", bit: 64 },
            OptionFlag { name: "ECMAScript", bit: 256 },
            OptionFlag { name: "CultureInvariant", bit: 512 },
        ])
    }
}

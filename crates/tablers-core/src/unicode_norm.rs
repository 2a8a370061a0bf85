//! Unicode normalization forms applied to extracted character text.

use unicode_normalization::UnicodeNormalization;

/// Unicode normalization form to apply to extracted character text.
///
/// PDF text strings are not guaranteed to use any particular normalization
/// form; a ligature or an accented letter may arrive as a single precomposed
/// codepoint or as a base letter followed by a combining mark depending on
/// the producing application. [`ExtractOptions::unicode_norm`](crate::ExtractOptions::unicode_norm)
/// lets the caller pick a canonical form for comparison/search stability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnicodeNorm {
    /// Leave extracted text exactly as decoded from the content stream.
    None,
    /// Canonical Decomposition, followed by Canonical Composition.
    #[default]
    Nfc,
    /// Canonical Decomposition.
    Nfd,
    /// Compatibility Decomposition, followed by Canonical Composition.
    Nfkc,
    /// Compatibility Decomposition, followed by Canonical Decomposition.
    Nfkd,
}

impl UnicodeNorm {
    /// Apply this normalization form to `text`, returning a new owned string.
    ///
    /// [`UnicodeNorm::None`] returns `text` unchanged (but still owned).
    pub fn normalize(self, text: &str) -> String {
        match self {
            UnicodeNorm::None => text.to_string(),
            UnicodeNorm::Nfc => text.nfc().collect(),
            UnicodeNorm::Nfd => text.nfd().collect(),
            UnicodeNorm::Nfkc => text.nfkc().collect(),
            UnicodeNorm::Nfkd => text.nfkd().collect(),
        }
    }
}

use crate::geometry::BBox;
use crate::painting::Color;

/// Reading direction of a glyph, derived from the dominant axis of its
/// text rendering matrix.
///
/// `Ltr`/`Rtl` are horizontal (0°/180° rotation); `Ttb`/`Btt` are vertical
/// (90°/270° rotation). See [`TextDirection::rotation_degrees`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    /// Left-to-right, unrotated (0°).
    Ltr,
    /// Right-to-left, upside down (180°).
    Rtl,
    /// Top-to-bottom, rotated 90° clockwise.
    Ttb,
    /// Bottom-to-top, rotated 90° counter-clockwise (270°).
    Btt,
}

impl TextDirection {
    /// The rotation, in degrees, implied by this direction: `{0, 90, 180, 270}`.
    ///
    /// Follows the pdfplumber convention of measuring clockwise rotation
    /// from upright horizontal text.
    pub fn rotation_degrees(self) -> i32 {
        match self {
            TextDirection::Ltr => 0,
            TextDirection::Ttb => 90,
            TextDirection::Rtl => 180,
            TextDirection::Btt => 270,
        }
    }
}

/// A single character extracted from a PDF page.
#[derive(Debug, Clone, PartialEq)]
pub struct Char {
    /// The text content of this character.
    pub text: String,
    /// Bounding box in top-left origin coordinates.
    pub bbox: BBox,
    /// Font name.
    pub fontname: String,
    /// Font size in points.
    pub size: f64,
    /// Vertical offset from the top of the document, for multi-page
    /// coordinate continuity. Equal to `bbox.top` on a single page.
    pub doctop: f64,
    /// `true` if the text rendering matrix has no rotation or shear.
    pub upright: bool,
    /// Reading direction, derived from the text rendering matrix.
    pub direction: TextDirection,
    /// Clockwise rotation in degrees: one of `{0, 90, 180, 270}`.
    ///
    /// Mirrors [`TextDirection::rotation_degrees`] for `direction`; kept as
    /// its own field because downstream consumers (word assembly) work with
    /// plain integer rotation rather than the direction enum.
    pub rotation: i32,
    /// Stroking (outline) color in effect when this character was painted.
    pub stroking_color: Option<Color>,
    /// Non-stroking (fill) color in effect when this character was painted.
    pub non_stroking_color: Option<Color>,
    /// The text rendering matrix `[a, b, c, d, e, f]` in effect for this glyph.
    pub ctm: [f64; 6],
    /// Raw character code from the content stream.
    pub char_code: u32,
    /// Marked-content sequence id, if this glyph falls inside a BDC/EMC span.
    pub mcid: Option<u32>,
    /// Structure tag name (e.g. "P", "Span") for the enclosing marked-content span.
    pub tag: Option<String>,
}

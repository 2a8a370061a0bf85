//! Character bounding box calculation from content stream events.
//!
//! Combines font metrics, text state, and CTM to calculate the final
//! bounding box for each character in top-left origin coordinates.
//! This bridges Layer 2 (interpreter) and Layer 3 (object extraction).

use tablers_core::geometry::{BBox, Ctm, Point};
use tablers_core::painting::Color;
use tablers_core::text::{Char, TextDirection};

use crate::handler::CharEvent;

/// Convert a `CharEvent` into a fully-populated `Char`
/// with bounding box in top-left origin page coordinates.
///
/// # Arguments
///
/// * `event` - Character rendering event from the content stream interpreter.
///   Contains per-font ascent/descent for accurate vertical bounding boxes.
/// * `page_height` - Page height in PDF units (for y-flip from bottom-left to top-left origin).
/// * `stroking_color` - Current stroking color from the graphics state.
/// * `non_stroking_color` - Current non-stroking color from the graphics state.
///
/// # Coordinate System
///
/// PDF uses bottom-left origin. This function converts to top-left origin
/// (pdfplumber convention) by flipping: `top = page_height - max_y`.
pub fn char_from_event(
    event: &CharEvent,
    page_height: f64,
    stroking_color: Option<Color>,
    non_stroking_color: Option<Color>,
) -> Char {
    let font_size = event.font_size;
    let h_scaling = event.h_scaling;

    // Build the Text Rendering Matrix (Trm) per PDF spec 9.4.4:
    // Trm = [Tfs*Th, 0, 0, Tfs, 0, Trise] x Tm x CTM
    let font_matrix = Ctm::new(font_size * h_scaling, 0.0, 0.0, font_size, 0.0, event.rise);
    let tm = ctm_from_array(&event.text_matrix);
    let ctm = ctm_from_array(&event.ctm);
    let trm = font_matrix.concat(&tm).concat(&ctm);

    // Character width in glyph-normalized space.
    // The bounding box should cover only the glyph's visual extent (w0/1000),
    // NOT the full advance width which includes char_spacing and word_spacing.
    // Those inter-glyph spacings affect text position advance (handled in
    // text_renderer.rs) but not the individual character's visual bbox.
    let w_norm = event.displacement / 1000.0;

    // Ascent/descent from per-font metrics carried in the event
    let ascent_norm = event.ascent / 1000.0;
    let descent_norm = event.descent / 1000.0;

    // Four corners of the character rectangle in glyph-normalized space,
    // transformed through Trm to page space (PDF bottom-left origin).
    let corners = [
        trm.transform_point(Point::new(0.0, descent_norm)),
        trm.transform_point(Point::new(w_norm, descent_norm)),
        trm.transform_point(Point::new(w_norm, ascent_norm)),
        trm.transform_point(Point::new(0.0, ascent_norm)),
    ];

    // Axis-aligned bounding box in PDF page space
    let min_x = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let max_x = corners
        .iter()
        .map(|p| p.x)
        .fold(f64::NEG_INFINITY, f64::max);
    let min_y = corners.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = corners
        .iter()
        .map(|p| p.y)
        .fold(f64::NEG_INFINITY, f64::max);

    // Y-flip: PDF bottom-left origin → top-left origin
    let top = page_height - max_y;
    let bottom = page_height - min_y;

    let bbox = BBox::new(min_x, top, max_x, bottom);

    // Upright: no rotation/shear in the text rendering matrix
    let upright = trm.b.abs() < 1e-6 && trm.c.abs() < 1e-6;

    // Text direction from the dominant axis of the text rendering matrix
    let direction = if trm.a.abs() >= trm.b.abs() {
        if trm.a >= 0.0 {
            TextDirection::Ltr
        } else {
            TextDirection::Rtl
        }
    } else if trm.b > 0.0 {
        TextDirection::Btt
    } else {
        TextDirection::Ttb
    };

    // Unicode text with fallback
    let text = event.unicode.clone().unwrap_or_else(|| {
        char::from_u32(event.char_code)
            .map(|c| c.to_string())
            .unwrap_or_else(|| "\u{FFFD}".to_string())
    });

    Char {
        text,
        bbox,
        fontname: event.font_name.clone(),
        size: font_size,
        doctop: top,
        upright,
        direction,
        rotation: direction.rotation_degrees(),
        stroking_color,
        non_stroking_color,
        ctm: event.ctm,
        char_code: event.char_code,
        mcid: event.mcid,
        tag: event.tag.clone(),
    }
}

/// Create a [`Ctm`] from a 6-element array `[a, b, c, d, e, f]`.
fn ctm_from_array(arr: &[f64; 6]) -> Ctm {
    Ctm::new(arr[0], arr[1], arr[2], arr[3], arr[4], arr[5])
}

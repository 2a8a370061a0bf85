//! Line/rect/curve extraction from painted-path content stream events.
//!
//! Combines a `PathEvent` (construction segments plus the graphics state
//! captured at paint time) into the shapes `tablers-core` can feed to edge
//! derivation and table detection. This bridges Layer 2 (interpreter) and
//! Layer 3 (object extraction), mirroring `char_extraction`'s role for text.

use tablers_core::painting::{Color, FillRule, PaintedPath};
use tablers_core::path::Path;
use tablers_core::shapes::{Curve, Line, Rect, extract_shapes};

use crate::handler::{PaintOp, PathEvent};

/// Convert a `PathEvent` into the lines, rects, and curves it describes,
/// in top-left origin page coordinates.
///
/// `page_height` is the raw (unrotated) PDF page height, used to flip the
/// content stream's bottom-left origin to pdfplumber's top-left convention.
pub fn shapes_from_path_event(
    event: &PathEvent,
    page_height: f64,
) -> (Vec<Line>, Vec<Rect>, Vec<Curve>) {
    let (stroke, fill) = match event.paint_op {
        PaintOp::Stroke => (true, false),
        PaintOp::Fill => (false, true),
        PaintOp::FillAndStroke => (true, true),
    };

    let painted = PaintedPath {
        path: Path {
            segments: event.segments.clone(),
        },
        stroke,
        fill,
        fill_rule: event.fill_rule.unwrap_or_default(),
        line_width: event.line_width,
        stroke_color: event.stroking_color.unwrap_or(Color::black()),
        fill_color: event.non_stroking_color.unwrap_or(Color::black()),
    };

    extract_shapes(&painted, page_height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablers_core::geometry::Point;
    use tablers_core::path::PathSegment;

    fn rect_segments() -> Vec<PathSegment> {
        vec![
            PathSegment::MoveTo(Point::new(10.0, 10.0)),
            PathSegment::LineTo(Point::new(110.0, 10.0)),
            PathSegment::LineTo(Point::new(110.0, 60.0)),
            PathSegment::LineTo(Point::new(10.0, 60.0)),
            PathSegment::ClosePath,
        ]
    }

    #[test]
    fn stroked_rectangle_produces_rect() {
        let event = PathEvent {
            segments: rect_segments(),
            paint_op: PaintOp::Stroke,
            line_width: 1.0,
            stroking_color: Some(Color::black()),
            non_stroking_color: None,
            ctm: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            fill_rule: None,
        };

        let (lines, rects, curves) = shapes_from_path_event(&event, 792.0);
        assert!(lines.is_empty());
        assert_eq!(rects.len(), 1);
        assert!(curves.is_empty());
        assert_eq!(rects[0].x0, 10.0);
        assert_eq!(rects[0].x1, 110.0);
    }

    #[test]
    fn filled_path_uses_non_stroking_color() {
        let event = PathEvent {
            segments: rect_segments(),
            paint_op: PaintOp::Fill,
            line_width: 1.0,
            stroking_color: None,
            non_stroking_color: Some(Color::new(0.2, 0.4, 0.6)),
            ctm: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            fill_rule: Some(FillRule::NonZeroWinding),
        };

        let (_lines, rects, _curves) = shapes_from_path_event(&event, 792.0);
        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0].fill_color, Color::new(0.2, 0.4, 0.6));
    }

    #[test]
    fn open_polyline_produces_lines_not_rect() {
        let event = PathEvent {
            segments: vec![
                PathSegment::MoveTo(Point::new(0.0, 0.0)),
                PathSegment::LineTo(Point::new(50.0, 0.0)),
                PathSegment::LineTo(Point::new(50.0, 50.0)),
            ],
            paint_op: PaintOp::Stroke,
            line_width: 1.0,
            stroking_color: Some(Color::black()),
            non_stroking_color: None,
            ctm: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            fill_rule: None,
        };

        let (lines, rects, _curves) = shapes_from_path_event(&event, 100.0);
        assert_eq!(lines.len(), 2);
        assert!(rects.is_empty());
    }
}

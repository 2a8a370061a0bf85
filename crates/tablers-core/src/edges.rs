//! Edge derivation from geometric primitives.
//!
//! Edges are line segments derived from Lines, Rects, and Curves for
//! use in table detection algorithms.

use crate::geometry::Orientation;
use crate::painting::Color;
use crate::shapes::{Curve, Line, LineOrientation, Rect};

/// Source of an edge, tracking which geometric primitive it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeSource {
    /// Derived directly from a Line object.
    Line,
    /// Top edge of a Rect.
    RectTop,
    /// Bottom edge of a Rect.
    RectBottom,
    /// Left edge of a Rect.
    RectLeft,
    /// Right edge of a Rect.
    RectRight,
    /// Approximated from a Curve (chord from start to end).
    Curve,
    /// Synthetic edge generated from text alignment patterns (Stream strategy).
    Stream,
    /// Supplied directly via `TableSettings::explicit_lines`.
    Explicit,
}

/// A line segment edge for table detection.
///
/// Edges are derived from Lines, Rects, and Curves and are used
/// by the table detection algorithm to find cell boundaries.
///
/// Equality compares only endpoints and orientation; `source`, `width`,
/// and `color` are provenance, not identity.
#[derive(Debug, Clone)]
pub struct Edge {
    /// Left x coordinate.
    pub x0: f64,
    /// Top y coordinate (distance from top of page).
    pub top: f64,
    /// Right x coordinate.
    pub x1: f64,
    /// Bottom y coordinate (distance from top of page).
    pub bottom: f64,
    /// Edge orientation.
    pub orientation: Orientation,
    /// Where this edge was derived from.
    pub source: EdgeSource,
    /// Stroke width of the originating path, in page units.
    pub width: f64,
    /// Stroke (or fill, for curves) color of the originating path.
    pub color: Color,
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.x0 == other.x0
            && self.top == other.top
            && self.x1 == other.x1
            && self.bottom == other.bottom
            && self.orientation == other.orientation
            && self.source == other.source
    }
}

/// Derive an Edge from a Line (direct conversion).
pub fn edge_from_line(line: &Line) -> Edge {
    Edge {
        x0: line.x0,
        top: line.top,
        x1: line.x1,
        bottom: line.bottom,
        orientation: line.orientation,
        source: EdgeSource::Line,
        width: line.line_width,
        color: line.stroke_color,
    }
}

/// Below this width or height, a filled rect is treated as a ruling line
/// drawn as a thin box rather than a region with four distinct sides.
const RECT_DEGENERATE_EPSILON: f64 = 1.0;

/// Derive Edges from a Rect.
///
/// A filled rect thinner than [`RECT_DEGENERATE_EPSILON`] along one axis
/// degenerates to a single edge along its long axis, matching how ruling
/// lines are often drawn as thin filled boxes rather than strokes.
/// Otherwise returns the 4 edges of the rect's outline (top, bottom, left,
/// right).
pub fn edges_from_rect(rect: &Rect) -> Vec<Edge> {
    if rect.fill {
        if let Some(orientation) = rect.degenerate_orientation(RECT_DEGENERATE_EPSILON) {
            let mid_y = (rect.top + rect.bottom) / 2.0;
            let mid_x = (rect.x0 + rect.x1) / 2.0;
            return vec![match orientation {
                LineOrientation::Horizontal => Edge {
                    x0: rect.x0,
                    top: mid_y,
                    x1: rect.x1,
                    bottom: mid_y,
                    orientation: Orientation::Horizontal,
                    source: EdgeSource::RectTop,
                    width: rect.line_width,
                    color: rect.fill_color,
                },
                LineOrientation::Vertical => Edge {
                    x0: mid_x,
                    top: rect.top,
                    x1: mid_x,
                    bottom: rect.bottom,
                    orientation: Orientation::Vertical,
                    source: EdgeSource::RectLeft,
                    width: rect.line_width,
                    color: rect.fill_color,
                },
                LineOrientation::Diagonal => unreachable!("degenerate_orientation never returns Diagonal"),
            }];
        }
    }
    vec![
        Edge {
            x0: rect.x0,
            top: rect.top,
            x1: rect.x1,
            bottom: rect.top,
            orientation: Orientation::Horizontal,
            source: EdgeSource::RectTop,
            width: rect.line_width,
            color: rect.stroke_color,
        },
        Edge {
            x0: rect.x0,
            top: rect.bottom,
            x1: rect.x1,
            bottom: rect.bottom,
            orientation: Orientation::Horizontal,
            source: EdgeSource::RectBottom,
            width: rect.line_width,
            color: rect.stroke_color,
        },
        Edge {
            x0: rect.x0,
            top: rect.top,
            x1: rect.x0,
            bottom: rect.bottom,
            orientation: Orientation::Vertical,
            source: EdgeSource::RectLeft,
            width: rect.line_width,
            color: rect.stroke_color,
        },
        Edge {
            x0: rect.x1,
            top: rect.top,
            x1: rect.x1,
            bottom: rect.bottom,
            orientation: Orientation::Vertical,
            source: EdgeSource::RectRight,
            width: rect.line_width,
            color: rect.stroke_color,
        },
    ]
}

/// Tolerance for floating-point comparison when classifying edge orientation.
const EDGE_AXIS_TOLERANCE: f64 = 1e-6;

/// Classify orientation for an edge from two points.
fn classify_edge_orientation(x0: f64, y0: f64, x1: f64, y1: f64) -> Orientation {
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    if dy < EDGE_AXIS_TOLERANCE {
        Orientation::Horizontal
    } else if dx < EDGE_AXIS_TOLERANCE {
        Orientation::Vertical
    } else {
        Orientation::Diagonal
    }
}

/// Derive an Edge from a Curve using chord approximation (start to end).
pub fn edge_from_curve(curve: &Curve) -> Edge {
    let (start_x, start_y) = curve.pts[0];
    let (end_x, end_y) = curve.pts[curve.pts.len() - 1];

    let x0 = start_x.min(end_x);
    let x1 = start_x.max(end_x);
    let top = start_y.min(end_y);
    let bottom = start_y.max(end_y);
    let orientation = classify_edge_orientation(start_x, start_y, end_x, end_y);

    Edge {
        x0,
        top,
        x1,
        bottom,
        orientation,
        source: EdgeSource::Curve,
        width: curve.line_width,
        color: curve.stroke_color,
    }
}

/// Derive all edges from collections of lines, rects, and curves.
pub fn derive_edges(lines: &[Line], rects: &[Rect], curves: &[Curve]) -> Vec<Edge> {
    let mut edges = Vec::new();

    for line in lines {
        edges.push(edge_from_line(line));
    }

    for rect in rects {
        edges.extend(edges_from_rect(rect));
    }

    for curve in curves {
        edges.push(edge_from_curve(curve));
    }

    edges
}

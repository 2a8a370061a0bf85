use crate::geometry::{Ctm, Point};

/// A segment of a PDF path.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathSegment {
    /// Move to a new point (starts a new subpath).
    MoveTo(Point),
    /// Straight line from current point to target.
    LineTo(Point),
    /// Cubic Bezier curve with two control points and an endpoint.
    CurveTo {
        /// First control point.
        cp1: Point,
        /// Second control point.
        cp2: Point,
        /// Endpoint of the curve.
        end: Point,
    },
    /// Close the current subpath (line back to the subpath start).
    ClosePath,
}

/// A complete path consisting of segments.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    /// The path segments.
    pub segments: Vec<PathSegment>,
}

impl Path {
    /// Split into subpaths: each `MoveTo` after the first starts a new
    /// subpath. A path with no segments has no subpaths.
    ///
    /// Table-detection content streams commonly draw a whole table grid as
    /// one path with interleaved `m`/`l`/`h` operators per cell edge; each
    /// subpath must be walked and closed independently.
    pub fn subpaths(&self) -> Vec<&[PathSegment]> {
        let mut subpaths = Vec::new();
        let mut start = 0;

        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 && matches!(seg, PathSegment::MoveTo(_)) {
                if start < i {
                    subpaths.push(&self.segments[start..i]);
                }
                start = i;
            }
        }
        if start < self.segments.len() {
            subpaths.push(&self.segments[start..]);
        }

        subpaths
    }
}

/// Builder for constructing paths from PDF path operators.
///
/// Coordinates are transformed through the CTM before storage.
#[derive(Debug, Clone)]
pub struct PathBuilder {
    segments: Vec<PathSegment>,
    current_point: Option<Point>,
    subpath_start: Option<Point>,
    ctm: Ctm,
}

impl PathBuilder {
    /// Create a new PathBuilder with the given CTM.
    pub fn new(ctm: Ctm) -> Self {
        Self {
            segments: Vec::new(),
            current_point: None,
            subpath_start: None,
            ctm,
        }
    }

    /// Update the CTM.
    pub fn set_ctm(&mut self, ctm: Ctm) {
        self.ctm = ctm;
    }

    /// Get the current CTM.
    pub fn ctm(&self) -> &Ctm {
        &self.ctm
    }

    /// `m` operator: move to a new point, starting a new subpath.
    pub fn move_to(&mut self, x: f64, y: f64) {
        let p = self.ctm.transform_point(Point::new(x, y));
        self.segments.push(PathSegment::MoveTo(p));
        self.current_point = Some(p);
        self.subpath_start = Some(p);
    }

    /// `l` operator: straight line from current point to `(x, y)`.
    pub fn line_to(&mut self, x: f64, y: f64) {
        let p = self.ctm.transform_point(Point::new(x, y));
        self.segments.push(PathSegment::LineTo(p));
        self.current_point = Some(p);
    }

    /// `c` operator: cubic Bezier curve with three coordinate pairs.
    pub fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) {
        let cp1 = self.ctm.transform_point(Point::new(x1, y1));
        let cp2 = self.ctm.transform_point(Point::new(x2, y2));
        let end = self.ctm.transform_point(Point::new(x3, y3));
        self.segments.push(PathSegment::CurveTo { cp1, cp2, end });
        self.current_point = Some(end);
    }

    /// `v` operator: cubic Bezier where first control point equals current point.
    pub fn curve_to_v(&mut self, x2: f64, y2: f64, x3: f64, y3: f64) {
        let Some(cp1) = self.current_point else {
            return;
        };
        let cp2 = self.ctm.transform_point(Point::new(x2, y2));
        let end = self.ctm.transform_point(Point::new(x3, y3));
        self.segments.push(PathSegment::CurveTo { cp1, cp2, end });
        self.current_point = Some(end);
    }

    /// `y` operator: cubic Bezier where last control point equals endpoint.
    pub fn curve_to_y(&mut self, x1: f64, y1: f64, x3: f64, y3: f64) {
        let cp1 = self.ctm.transform_point(Point::new(x1, y1));
        let end = self.ctm.transform_point(Point::new(x3, y3));
        self.segments
            .push(PathSegment::CurveTo { cp1, cp2: end, end });
        self.current_point = Some(end);
    }

    /// `h` operator: close the current subpath.
    pub fn close_path(&mut self) {
        self.segments.push(PathSegment::ClosePath);
        if let Some(start) = self.subpath_start {
            self.current_point = Some(start);
        }
    }

    /// `re` operator: append a rectangle as moveto + 3 lineto + closepath.
    pub fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.move_to(x, y);
        self.line_to(x + width, y);
        self.line_to(x + width, y + height);
        self.line_to(x, y + height);
        self.close_path();
    }

    /// Get the current point (already CTM-transformed).
    pub fn current_point(&self) -> Option<Point> {
        self.current_point
    }

    /// Consume the builder and return the constructed path.
    pub fn build(self) -> Path {
        Path {
            segments: self.segments,
        }
    }

    /// Check if the builder has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Take the accumulated segments as a `Path` and reset the builder.
    ///
    /// After this call, the builder is empty and ready for a new path.
    /// The current point and subpath start are also reset.
    pub fn take_and_reset(&mut self) -> Path {
        let segments = std::mem::take(&mut self.segments);
        self.current_point = None;
        self.subpath_start = None;
        Path { segments }
    }
}

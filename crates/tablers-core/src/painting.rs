//! Path painting operators and types.
//!
//! Implements PDF path painting operators (S, s, f, F, f*, B, B*, b, b*, n)
//! that determine how constructed paths are rendered.

use crate::path::{Path, PathBuilder};

/// RGBA color. `r`/`g`/`b` are channel values in `[0.0, 1.0]`; `a` is an
/// 8-bit alpha channel, opaque (255) unless the content stream specifies
/// otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel, in `[0.0, 1.0]`.
    pub r: f64,
    /// Green channel, in `[0.0, 1.0]`.
    pub g: f64,
    /// Blue channel, in `[0.0, 1.0]`.
    pub b: f64,
    /// Alpha channel, 8-bit.
    pub a: u8,
}

impl Color {
    /// Create a new RGB color with channel values in `[0.0, 1.0]`.
    ///
    /// A bare `(r, g, b)` triple is extended to `(r, g, b, 255)`: PDF
    /// content streams express color without an alpha channel.
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a new color with an explicit alpha channel.
    pub fn new_rgba(r: f64, g: f64, b: f64, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Black color (0, 0, 0), fully opaque.
    pub fn black() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// The color as an `(r, g, b, a)` tuple with alpha on the `0..=255` scale.
    pub fn as_rgba(&self) -> (f64, f64, f64, u8) {
        (self.r, self.g, self.b, self.a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// Fill rule for path painting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FillRule {
    /// Nonzero winding number rule (default).
    #[default]
    NonZeroWinding,
    /// Even-odd rule.
    EvenOdd,
}

/// Graphics state relevant to path painting.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsState {
    /// Current line width (default: 1.0 per PDF spec).
    pub line_width: f64,
    /// Current stroking color.
    pub stroke_color: Color,
    /// Current non-stroking (fill) color.
    pub fill_color: Color,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            line_width: 1.0,
            stroke_color: Color::black(),
            fill_color: Color::black(),
        }
    }
}

/// A painted path â€” the result of a painting operator applied to a constructed path.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintedPath {
    /// The path segments.
    pub path: Path,
    /// Whether the path is stroked.
    pub stroke: bool,
    /// Whether the path is filled.
    pub fill: bool,
    /// Fill rule used (only meaningful when `fill` is true).
    pub fill_rule: FillRule,
    /// Line width at the time of painting.
    pub line_width: f64,
    /// Stroking color at the time of painting.
    pub stroke_color: Color,
    /// Fill color at the time of painting.
    pub fill_color: Color,
}

impl PathBuilder {
    /// `S` operator: stroke the current path.
    ///
    /// Paints the path outline using the current stroking color and line width.
    /// Clears the current path after painting.
    pub fn stroke(&mut self, gs: &GraphicsState) -> PaintedPath {
        let path = self.take_path();
        PaintedPath {
            path,
            stroke: true,
            fill: false,
            fill_rule: FillRule::NonZeroWinding,
            line_width: gs.line_width,
            stroke_color: gs.stroke_color,
            fill_color: gs.fill_color,
        }
    }

    /// `s` operator: close the current subpath, then stroke.
    ///
    /// Equivalent to `h S`.
    pub fn close_and_stroke(&mut self, gs: &GraphicsState) -> PaintedPath {
        self.close_path();
        self.stroke(gs)
    }

    /// `f` or `F` operator: fill the current path using the nonzero winding rule.
    ///
    /// Any open subpaths are implicitly closed before filling.
    pub fn fill(&mut self, gs: &GraphicsState) -> PaintedPath {
        let path = self.take_path();
        PaintedPath {
            path,
            stroke: false,
            fill: true,
            fill_rule: FillRule::NonZeroWinding,
            line_width: gs.line_width,
            stroke_color: gs.stroke_color,
            fill_color: gs.fill_color,
        }
    }

    /// `f*` operator: fill the current path using the even-odd rule.
    pub fn fill_even_odd(&mut self, gs: &GraphicsState) -> PaintedPath {
        let path = self.take_path();
        PaintedPath {
            path,
            stroke: false,
            fill: true,
            fill_rule: FillRule::EvenOdd,
            line_width: gs.line_width,
            stroke_color: gs.stroke_color,
            fill_color: gs.fill_color,
        }
    }

    /// `B` operator: fill then stroke the current path (nonzero winding).
    pub fn fill_and_stroke(&mut self, gs: &GraphicsState) -> PaintedPath {
        let path = self.take_path();
        PaintedPath {
            path,
            stroke: true,
            fill: true,
            fill_rule: FillRule::NonZeroWinding,
            line_width: gs.line_width,
            stroke_color: gs.stroke_color,
            fill_color: gs.fill_color,
        }
    }

    /// `B*` operator: fill (even-odd) then stroke the current path.
    pub fn fill_even_odd_and_stroke(&mut self, gs: &GraphicsState) -> PaintedPath {
        let path = self.take_path();
        PaintedPath {
            path,
            stroke: true,
            fill: true,
            fill_rule: FillRule::EvenOdd,
            line_width: gs.line_width,
            stroke_color: gs.stroke_color,
            fill_color: gs.fill_color,
        }
    }

    /// `b` operator: close, fill (nonzero winding), then stroke.
    ///
    /// Equivalent to `h B`.
    pub fn close_fill_and_stroke(&mut self, gs: &GraphicsState) -> PaintedPath {
        self.close_path();
        self.fill_and_stroke(gs)
    }

    /// `b*` operator: close, fill (even-odd), then stroke.
    ///
    /// Equivalent to `h B*`.
    pub fn close_fill_even_odd_and_stroke(&mut self, gs: &GraphicsState) -> PaintedPath {
        self.close_path();
        self.fill_even_odd_and_stroke(gs)
    }

    /// `n` operator: end the path without painting.
    ///
    /// Discards the current path. Used primarily for clipping paths.
    /// Returns `None` since no painted path is produced.
    pub fn end_path(&mut self) -> Option<PaintedPath> {
        self.take_path();
        None
    }

    /// Take the current path segments and reset the builder for the next path.
    fn take_path(&mut self) -> Path {
        self.take_and_reset()
    }
}

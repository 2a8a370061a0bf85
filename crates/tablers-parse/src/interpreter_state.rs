//! Graphics state stack for the content stream interpreter.
//!
//! Implements the PDF graphics state model: a stack of states managed by
//! `q` (save) and `Q` (restore) operators, with CTM management via `cm`,
//! and color setting via G/g, RG/rg, K/k, SC/SCN/sc/scn operators.

use tablers_core::geometry::Ctm;
use tablers_core::painting::GraphicsState;

use crate::color_space::{ResolvedColorSpace, cmyk_to_color, color_from_components, gray_to_color, rgb_to_color};

/// Full interpreter state that combines the CTM with the graphics state.
///
/// This is the interpreter-level state that tracks everything needed
/// during content stream processing. The `q` operator pushes a copy
/// onto the stack; `Q` restores from the stack.
#[derive(Debug, Clone)]
pub struct InterpreterState {
    /// Current transformation matrix.
    ctm: Ctm,
    /// Current graphics state (colors, line width).
    graphics_state: GraphicsState,
    /// Saved state stack for q/Q operators.
    stack: Vec<SavedState>,
    /// Current stroking color space (set by CS operator).
    stroking_color_space: Option<ResolvedColorSpace>,
    /// Current non-stroking color space (set by cs operator).
    non_stroking_color_space: Option<ResolvedColorSpace>,
}

impl PartialEq for InterpreterState {
    fn eq(&self, other: &Self) -> bool {
        self.ctm == other.ctm && self.graphics_state == other.graphics_state
    }
}

/// A snapshot of the interpreter state saved by the `q` operator.
#[derive(Debug, Clone)]
struct SavedState {
    ctm: Ctm,
    graphics_state: GraphicsState,
    stroking_color_space: Option<ResolvedColorSpace>,
    non_stroking_color_space: Option<ResolvedColorSpace>,
}

impl Default for InterpreterState {
    fn default() -> Self {
        Self::new()
    }
}

impl InterpreterState {
    /// Create a new interpreter state with identity CTM and default graphics state.
    pub fn new() -> Self {
        Self {
            ctm: Ctm::identity(),
            graphics_state: GraphicsState::default(),
            stack: Vec::new(),
            stroking_color_space: None,
            non_stroking_color_space: None,
        }
    }

    /// Get the current transformation matrix.
    pub fn ctm(&self) -> &Ctm {
        &self.ctm
    }

    /// Get the current CTM as a 6-element array `[a, b, c, d, e, f]`.
    pub fn ctm_array(&self) -> [f64; 6] {
        [
            self.ctm.a, self.ctm.b, self.ctm.c, self.ctm.d, self.ctm.e, self.ctm.f,
        ]
    }

    /// Get the current graphics state.
    pub fn graphics_state(&self) -> &GraphicsState {
        &self.graphics_state
    }

    /// Get a mutable reference to the current graphics state.
    pub fn graphics_state_mut(&mut self) -> &mut GraphicsState {
        &mut self.graphics_state
    }

    /// Returns the current stack depth.
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    // --- q/Q operators ---

    /// `q` operator: save the current graphics state onto the stack.
    pub fn save_state(&mut self) {
        self.stack.push(SavedState {
            ctm: self.ctm,
            graphics_state: self.graphics_state.clone(),
            stroking_color_space: self.stroking_color_space.clone(),
            non_stroking_color_space: self.non_stroking_color_space.clone(),
        });
    }

    /// `Q` operator: restore the most recently saved graphics state.
    ///
    /// Returns `false` if the stack is empty (unbalanced Q).
    pub fn restore_state(&mut self) -> bool {
        if let Some(saved) = self.stack.pop() {
            self.ctm = saved.ctm;
            self.graphics_state = saved.graphics_state;
            self.stroking_color_space = saved.stroking_color_space;
            self.non_stroking_color_space = saved.non_stroking_color_space;
            true
        } else {
            false
        }
    }

    // --- cm operator ---

    /// `cm` operator: concatenate a matrix with the current CTM.
    ///
    /// The new matrix is pre-multiplied: CTM' = new_matrix × CTM_current.
    /// This follows the PDF spec where `cm` modifies the CTM by pre-concatenating.
    pub fn concat_matrix(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        let new_matrix = Ctm::new(a, b, c, d, e, f);
        self.ctm = new_matrix.concat(&self.ctm);
    }

    // --- w operator ---

    /// `w` operator: set line width.
    pub fn set_line_width(&mut self, width: f64) {
        self.graphics_state.line_width = width;
    }

    // --- Color operators ---

    /// `G` operator: set stroking color to DeviceGray.
    pub fn set_stroking_gray(&mut self, gray: f32) {
        self.stroking_color_space = None;
        self.graphics_state.stroke_color = gray_to_color(gray);
    }

    /// `g` operator: set non-stroking color to DeviceGray.
    pub fn set_non_stroking_gray(&mut self, gray: f32) {
        self.non_stroking_color_space = None;
        self.graphics_state.fill_color = gray_to_color(gray);
    }

    /// `RG` operator: set stroking color to DeviceRGB.
    pub fn set_stroking_rgb(&mut self, r: f32, g: f32, b: f32) {
        self.stroking_color_space = None;
        self.graphics_state.stroke_color = rgb_to_color(r, g, b);
    }

    /// `rg` operator: set non-stroking color to DeviceRGB.
    pub fn set_non_stroking_rgb(&mut self, r: f32, g: f32, b: f32) {
        self.non_stroking_color_space = None;
        self.graphics_state.fill_color = rgb_to_color(r, g, b);
    }

    /// `K` operator: set stroking color to DeviceCMYK.
    pub fn set_stroking_cmyk(&mut self, c: f32, m: f32, y: f32, k: f32) {
        self.stroking_color_space = None;
        self.graphics_state.stroke_color = cmyk_to_color(c, m, y, k);
    }

    /// `k` operator: set non-stroking color to DeviceCMYK.
    pub fn set_non_stroking_cmyk(&mut self, c: f32, m: f32, y: f32, k: f32) {
        self.non_stroking_color_space = None;
        self.graphics_state.fill_color = cmyk_to_color(c, m, y, k);
    }

    /// `SC`/`SCN` operator: set stroking color from components.
    ///
    /// If a stroking color space has been set (via CS), uses it to resolve
    /// the color. Otherwise falls back to inferring from component count.
    pub fn set_stroking_color(&mut self, components: &[f32]) {
        self.graphics_state.stroke_color = if let Some(ref cs) = self.stroking_color_space {
            cs.resolve_color(components)
        } else {
            color_from_components(components)
        };
    }

    /// `sc`/`scn` operator: set non-stroking color from components.
    ///
    /// If a non-stroking color space has been set (via cs), uses it to resolve
    /// the color. Otherwise falls back to inferring from component count.
    pub fn set_non_stroking_color(&mut self, components: &[f32]) {
        self.graphics_state.fill_color = if let Some(ref cs) = self.non_stroking_color_space {
            cs.resolve_color(components)
        } else {
            color_from_components(components)
        };
    }

    /// `CS` operator: set the stroking color space.
    pub fn set_stroking_color_space(&mut self, cs: ResolvedColorSpace) {
        self.stroking_color_space = Some(cs);
    }

    /// `cs` operator: set the non-stroking color space.
    pub fn set_non_stroking_color_space(&mut self, cs: ResolvedColorSpace) {
        self.non_stroking_color_space = Some(cs);
    }
}

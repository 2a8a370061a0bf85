//! Page coordinate normalization — rotation and CropBox transforms.
//!
//! Transforms coordinates from PDF native space (bottom-left origin)
//! to the user-visible page coordinate system (top-left origin),
//! accounting for page rotation (`/Rotate`) and CropBox.

use tablers_core::geometry::BBox;

/// Page coordinate normalization configuration.
///
/// Combines MediaBox, optional CropBox, and page rotation to provide
/// a unified transform from PDF native space to top-left origin
/// user-visible space.
///
/// # Coordinate Transform Pipeline
///
/// 1. Offset from MediaBox origin
/// 2. Apply rotation (0°/90°/180°/270° clockwise)
/// 3. Offset by CropBox position (in rotated space)
/// 4. Y-flip (bottom-left → top-left origin)
///
/// # Example
///
/// ```
/// use tablers_core::geometry::BBox;
/// use tablers_parse::page_geometry::PageGeometry;
///
/// // US Letter page, no crop, no rotation
/// let media_box = BBox::new(0.0, 0.0, 612.0, 792.0);
/// let geo = PageGeometry::new(media_box, None, 0);
///
/// assert_eq!(geo.width(), 612.0);
/// assert_eq!(geo.height(), 792.0);
///
/// // Point near top in PDF space (y=720) → near top in display (y=72)
/// let (x, y) = geo.normalize_point(72.0, 720.0);
/// assert!((x - 72.0).abs() < 0.01);
/// assert!((y - 72.0).abs() < 0.01);
/// ```
pub struct PageGeometry {
    rotation: i32,
    media_x0: f64,
    media_y0: f64,
    native_width: f64,
    native_height: f64,
    crop_rx0: f64,
    crop_ry0: f64,
    display_width: f64,
    display_height: f64,
}

impl PageGeometry {
    /// Create a new `PageGeometry` from page metadata.
    ///
    /// # Arguments
    ///
    /// * `media_box` - Page MediaBox as raw PDF coordinates in a [`BBox`].
    ///   The BBox fields map to PDF array values:
    ///   `x0` = left, `top` = y-min (PDF bottom), `x1` = right, `bottom` = y-max (PDF top).
    /// * `crop_box` - Optional CropBox (same coordinate convention as MediaBox).
    ///   If `None`, MediaBox is used as the visible viewport.
    /// * `rotation` - Page `/Rotate` value. Normalized to 0, 90, 180, or 270.
    pub fn new(media_box: BBox, crop_box: Option<BBox>, rotation: i32) -> Self {
        let rotation = rotation.rem_euclid(360);

        let media_x0 = media_box.x0;
        let media_y0 = media_box.top;
        let native_width = media_box.width();
        let native_height = media_box.height();

        let crop = crop_box.unwrap_or(media_box);

        // Adjust CropBox relative to MediaBox origin
        let cx0 = crop.x0 - media_x0;
        let cy0 = crop.top - media_y0;
        let cx1 = crop.x1 - media_x0;
        let cy1 = crop.bottom - media_y0;

        // Rotate CropBox corners to display space
        let (crop_rx0, crop_ry0, crop_rx1, crop_ry1) = match rotation {
            90 => (cy0, native_width - cx1, cy1, native_width - cx0),
            180 => (
                native_width - cx1,
                native_height - cy1,
                native_width - cx0,
                native_height - cy0,
            ),
            270 => (native_height - cy1, cx0, native_height - cy0, cx1),
            _ => (cx0, cy0, cx1, cy1), // 0 or fallback
        };

        Self {
            rotation,
            media_x0,
            media_y0,
            native_width,
            native_height,
            crop_rx0,
            crop_ry0,
            display_width: crop_rx1 - crop_rx0,
            display_height: crop_ry1 - crop_ry0,
        }
    }

    /// Visible page width after rotation and cropping.
    pub fn width(&self) -> f64 {
        self.display_width
    }

    /// Visible page height after rotation and cropping.
    pub fn height(&self) -> f64 {
        self.display_height
    }

    /// Page rotation in degrees (normalized to 0, 90, 180, or 270).
    pub fn rotation(&self) -> i32 {
        self.rotation
    }

    /// Transform a point from PDF native space to top-left origin display space.
    ///
    /// Applies: MediaBox offset → rotation → CropBox offset → y-flip.
    pub fn normalize_point(&self, x: f64, y: f64) -> (f64, f64) {
        // Step 1: Offset from MediaBox origin
        let px = x - self.media_x0;
        let py = y - self.media_y0;

        // Step 2: Apply rotation (clockwise)
        let (rx, ry) = match self.rotation {
            90 => (py, self.native_width - px),
            180 => (self.native_width - px, self.native_height - py),
            270 => (self.native_height - py, px),
            _ => (px, py), // 0 or fallback
        };

        // Step 3: CropBox offset
        let cx = rx - self.crop_rx0;
        let cy = ry - self.crop_ry0;

        // Step 4: Y-flip (bottom-left → top-left)
        (cx, self.display_height - cy)
    }

    /// Transform a bounding box from PDF native space to top-left origin display space.
    ///
    /// Takes min/max corners in native PDF coordinates and returns a [`BBox`]
    /// in display space with top-left origin. Corners are re-normalized after
    /// transformation since rotation may swap min/max.
    pub fn normalize_bbox(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> BBox {
        let (x0, y0) = self.normalize_point(min_x, min_y);
        let (x1, y1) = self.normalize_point(max_x, max_y);
        BBox::new(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
    }
}

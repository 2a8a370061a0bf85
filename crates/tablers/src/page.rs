//! `Page`: the per-page facade over extracted geometry and text.

use tablers_core::{
    BBox, Char, Curve, Edge, ExtractWarning, Line, PdfError, Rect, Table, TableFinder,
    TableSettings, TextOptions, Word, WordExtractor, WordOptions, blocks_to_text,
    cluster_lines_into_blocks, cluster_words_into_lines, derive_edges,
    sort_blocks_reading_order, split_lines_at_columns, words_to_text,
};

use crate::cropped_page::{self, CroppedPage, FilterMode, PageData};

/// A single page of a PDF document.
///
/// Exposes the page's geometry (dimensions, rotation, box definitions) and
/// its extracted content (characters, lines, rectangles, curves), plus
/// derived operations: word assembly, text extraction, table detection, and
/// spatial cropping.
pub struct Page {
    page_number: usize,
    width: f64,
    height: f64,
    rotation: i32,
    media_box: BBox,
    crop_box: Option<BBox>,
    trim_box: Option<BBox>,
    bleed_box: Option<BBox>,
    art_box: Option<BBox>,
    chars: Vec<Char>,
    lines: Vec<Line>,
    rects: Vec<Rect>,
    curves: Vec<Curve>,
    warnings: Vec<ExtractWarning>,
}

impl Page {
    /// Construct a page from characters only, with a default geometry
    /// (no rotation, no crop/trim/bleed/art box).
    pub fn new(page_number: usize, width: f64, height: f64, chars: Vec<Char>) -> Self {
        Self::with_geometry(page_number, width, height, chars, vec![], vec![], vec![])
    }

    /// Construct a page with geometric primitives but default box/rotation geometry.
    pub fn with_geometry(
        page_number: usize,
        width: f64,
        height: f64,
        chars: Vec<Char>,
        lines: Vec<Line>,
        rects: Vec<Rect>,
        curves: Vec<Curve>,
    ) -> Self {
        Page {
            page_number,
            width,
            height,
            rotation: 0,
            media_box: BBox::new(0.0, 0.0, width, height),
            crop_box: None,
            trim_box: None,
            bleed_box: None,
            art_box: None,
            chars,
            lines,
            rects,
            curves,
            warnings: Vec::new(),
        }
    }

    /// Construct a page from the full set of extracted content and geometry.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_extraction(
        page_number: usize,
        width: f64,
        height: f64,
        rotation: i32,
        media_box: BBox,
        crop_box: Option<BBox>,
        trim_box: Option<BBox>,
        bleed_box: Option<BBox>,
        art_box: Option<BBox>,
        chars: Vec<Char>,
        lines: Vec<Line>,
        rects: Vec<Rect>,
        curves: Vec<Curve>,
        warnings: Vec<ExtractWarning>,
    ) -> Self {
        Page {
            page_number,
            width,
            height,
            rotation,
            media_box,
            crop_box,
            trim_box,
            bleed_box,
            art_box,
            chars,
            lines,
            rects,
            curves,
            warnings,
        }
    }

    /// Zero-based page index within the document.
    pub fn page_number(&self) -> usize {
        self.page_number
    }

    /// Page width, accounting for rotation.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Page height, accounting for rotation.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Page rotation in degrees, one of `{0, 90, 180, 270}`.
    pub fn rotation(&self) -> i32 {
        self.rotation
    }

    /// The page's display bounding box (origin at top-left, width/height post-rotation).
    pub fn bbox(&self) -> BBox {
        BBox::new(0.0, 0.0, self.width, self.height)
    }

    /// The page's raw `/MediaBox`.
    pub fn media_box(&self) -> BBox {
        self.media_box
    }

    /// The page's `/CropBox`, if present and distinct from the media box.
    pub fn crop_box(&self) -> Option<BBox> {
        self.crop_box
    }

    /// The page's `/TrimBox`, if present.
    pub fn trim_box(&self) -> Option<BBox> {
        self.trim_box
    }

    /// The page's `/BleedBox`, if present.
    pub fn bleed_box(&self) -> Option<BBox> {
        self.bleed_box
    }

    /// The page's `/ArtBox`, if present.
    pub fn art_box(&self) -> Option<BBox> {
        self.art_box
    }

    /// The characters on this page.
    pub fn chars(&self) -> &[Char] {
        &self.chars
    }

    /// The straight line segments on this page.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// The rectangles on this page.
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// The curves on this page.
    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    /// Warnings accumulated while extracting this page's content.
    pub fn warnings(&self) -> &[ExtractWarning] {
        &self.warnings
    }

    /// Compute edges from this page's lines, rectangles, and curves.
    pub fn edges(&self) -> Vec<Edge> {
        derive_edges(&self.lines, &self.rects, &self.curves)
    }

    /// Assemble characters on this page into words.
    pub fn extract_words(&self, options: &WordOptions) -> Vec<Word> {
        WordExtractor::extract(&self.chars, options)
    }

    /// Extract this page's text, optionally using layout-aware reconstruction.
    pub fn extract_text(&self, options: &TextOptions) -> String {
        let words = self.extract_words(&WordOptions {
            y_tolerance: options.y_tolerance,
            ..WordOptions::default()
        });

        if !options.layout {
            return words_to_text(&words, options.y_tolerance);
        }

        let lines = cluster_words_into_lines(&words, options.y_tolerance);
        let split = split_lines_at_columns(lines, options.x_density);
        let mut blocks = cluster_lines_into_blocks(split, options.y_density);
        sort_blocks_reading_order(&mut blocks, options.x_density);
        blocks_to_text(&blocks)
    }

    /// Detect tables on this page using the edge-to-cell-to-table pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::ValidationError`] if `settings` has a negative
    /// tolerance or threshold field.
    pub fn find_tables(&self, settings: &TableSettings) -> Result<Vec<Table>, PdfError> {
        let edges = self.edges();
        let words = self.extract_words(&settings.text_settings);

        let finder = TableFinder::new(edges, words, self.bbox(), settings.clone())?
            .with_page_index(self.page_number);
        Ok(finder.find_tables())
    }

    /// Detect tables and return only the largest one found, if any.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::ValidationError`] under the same conditions as
    /// [`Self::find_tables`].
    pub fn extract_table(&self, settings: &TableSettings) -> Result<Option<Table>, PdfError> {
        let mut tables = self.find_tables(settings)?;
        tables.sort_by(|a, b| b.cells.len().cmp(&a.cells.len()));
        Ok(tables.into_iter().next())
    }

    /// Detect tables on this page, discarding any that failed cell-text attribution.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::ValidationError`] under the same conditions as
    /// [`Self::find_tables`].
    pub fn extract_tables(&self, settings: &TableSettings) -> Result<Vec<Table>, PdfError> {
        let tables = self.find_tables(settings)?;
        Ok(tables.into_iter().filter(|t| t.text_extracted).collect())
    }

    /// Crop to a bbox: objects whose center falls inside `bbox` are kept,
    /// with coordinates adjusted relative to the crop origin.
    pub fn crop(&self, bbox: BBox) -> CroppedPage {
        cropped_page::filter_and_build(self, bbox, FilterMode::Crop)
    }

    /// Keep only objects fully contained within `bbox`.
    pub fn within_bbox(&self, bbox: BBox) -> CroppedPage {
        cropped_page::filter_and_build(self, bbox, FilterMode::Within)
    }

    /// Keep only objects with no overlap with `bbox`.
    pub fn outside_bbox(&self, bbox: BBox) -> CroppedPage {
        cropped_page::filter_and_build(self, bbox, FilterMode::Outside)
    }
}

impl PageData for Page {
    fn chars_data(&self) -> &[Char] {
        &self.chars
    }
    fn lines_data(&self) -> &[Line] {
        &self.lines
    }
    fn rects_data(&self) -> &[Rect] {
        &self.rects
    }
    fn curves_data(&self) -> &[Curve] {
        &self.curves
    }
}

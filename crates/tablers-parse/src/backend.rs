//! PDF parsing backend trait.
//!
//! Defines the [`PdfBackend`] trait that abstracts PDF parsing operations.
//! This enables pluggable backends (e.g., lopdf, pdf-rs) for PDF reading.

use tablers_core::{BBox, ExtractOptions, PdfError};

use crate::handler::ContentHandler;

/// Trait abstracting PDF parsing operations.
///
/// A backend provides methods to open PDF documents, access pages,
/// extract page properties (MediaBox, CropBox, Rotate), and interpret
/// page content streams via a [`ContentHandler`] callback.
///
/// # Associated Types
///
/// - `Document`: The parsed PDF document representation.
/// - `Page`: A reference to a single page within a document.
/// - `Error`: Backend-specific error type, convertible to [`PdfError`].
///
/// # Usage
///
/// ```ignore
/// let doc = MyBackend::open(pdf_bytes)?;
/// let page_count = MyBackend::page_count(&doc);
/// let page = MyBackend::get_page(&doc, 0)?;
/// let media_box = MyBackend::page_media_box(&doc, &page)?;
/// MyBackend::interpret_page(&doc, &page, &mut handler, &options)?;
/// ```
pub trait PdfBackend {
    /// One-time process-wide initialization for this backend.
    ///
    /// Called at most once per process via [`BackendHandle::ensure_ready`],
    /// regardless of how many documents are opened. The default
    /// implementation is a no-op, appropriate for backends (like the
    /// bundled [`LopdfBackend`](crate::lopdf_backend::LopdfBackend)) with no
    /// native library to load.
    fn init() {}

    /// The parsed PDF document type.
    type Document;

    /// A reference to a single page within a document.
    type Page;

    /// Backend-specific error type, convertible to [`PdfError`].
    type Error: std::error::Error + Into<PdfError>;

    /// Parse PDF bytes into a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes do not represent a valid PDF document.
    /// If the document is encrypted, returns [`PdfError::AuthFailed`].
    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error>;

    /// Parse PDF bytes into a document, decrypting with the given password.
    ///
    /// Supports both user and owner passwords. If the PDF is not encrypted,
    /// the password is ignored and the document opens normally.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::AuthFailed`] if the password is incorrect.
    /// Returns other errors if the bytes are not a valid PDF document.
    fn open_with_password(bytes: &[u8], password: &[u8]) -> Result<Self::Document, Self::Error>;

    /// Return the number of pages in the document.
    fn page_count(doc: &Self::Document) -> usize;

    /// Access a page by 0-based index.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range or the page cannot be loaded.
    fn get_page(doc: &Self::Document, index: usize) -> Result<Self::Page, Self::Error>;

    /// Get the MediaBox for a page.
    ///
    /// MediaBox is required by the PDF specification and defines the boundaries
    /// of the physical page. The returned [`BBox`] uses the library's top-left
    /// origin, y-increases-downward coordinate system.
    ///
    /// # Errors
    ///
    /// Returns an error if the MediaBox cannot be resolved (e.g., missing
    /// from both the page and its parent page tree).
    fn page_media_box(doc: &Self::Document, page: &Self::Page) -> Result<BBox, Self::Error>;

    /// Get the CropBox for a page, if explicitly set.
    ///
    /// CropBox defines the visible region of the page. Returns `None` if
    /// not explicitly set (in which case MediaBox serves as the CropBox).
    ///
    /// # Errors
    ///
    /// Returns an error if the CropBox entry exists but is malformed.
    fn page_crop_box(doc: &Self::Document, page: &Self::Page) -> Result<Option<BBox>, Self::Error>;

    /// Get the page's TrimBox, if explicitly set.
    ///
    /// The default implementation returns `None`, appropriate for backends
    /// that do not resolve this optional box.
    fn page_trim_box(_doc: &Self::Document, _page: &Self::Page) -> Result<Option<BBox>, Self::Error> {
        Ok(None)
    }

    /// Get the page's BleedBox, if explicitly set.
    ///
    /// The default implementation returns `None`, appropriate for backends
    /// that do not resolve this optional box.
    fn page_bleed_box(_doc: &Self::Document, _page: &Self::Page) -> Result<Option<BBox>, Self::Error> {
        Ok(None)
    }

    /// Get the page's ArtBox, if explicitly set.
    ///
    /// The default implementation returns `None`, appropriate for backends
    /// that do not resolve this optional box.
    fn page_art_box(_doc: &Self::Document, _page: &Self::Page) -> Result<Option<BBox>, Self::Error> {
        Ok(None)
    }

    /// Get the page rotation angle in degrees.
    ///
    /// Returns one of: 0, 90, 180, or 270. Defaults to 0 if not specified.
    ///
    /// # Errors
    ///
    /// Returns an error if the Rotate entry exists but is malformed.
    fn page_rotate(doc: &Self::Document, page: &Self::Page) -> Result<i32, Self::Error>;

    /// Interpret the page's content stream, calling back into the handler.
    ///
    /// The interpreter processes PDF content stream operators (text, path)
    /// and notifies the `handler` of extracted content via
    /// [`ContentHandler`] callbacks. Resource limits from `options` are
    /// enforced during interpretation.
    ///
    /// # Errors
    ///
    /// Returns an error if content stream parsing fails or a resource limit
    /// is exceeded.
    fn interpret_page(
        doc: &Self::Document,
        page: &Self::Page,
        handler: &mut dyn ContentHandler,
        options: &ExtractOptions,
    ) -> Result<(), Self::Error>;
}

/// A process-wide handle to a lazily-initialized [`PdfBackend`].
///
/// Construction is cheap and only records the backend to use; the actual
/// one-time setup (`B::init`) runs at the first call to [`BackendHandle::ensure_ready`],
/// behind a [`std::sync::Once`] barrier shared across all handles for `B`.
/// Later handles — even ones that never call `ensure_ready` themselves —
/// reuse the same initialized state; construction never re-runs it.
pub struct BackendHandle<B: PdfBackend> {
    _marker: std::marker::PhantomData<B>,
}

impl<B: PdfBackend> BackendHandle<B> {
    /// Create a handle. Does not perform initialization.
    pub fn new() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }

    /// Run the one-time initialization barrier, if it has not already run.
    ///
    /// Idempotent: the second and later calls (from this handle or any other
    /// `BackendHandle<B>` in the process) are no-ops.
    pub fn ensure_ready(&self) {
        static INIT: std::sync::Once = std::sync::Once::new();
        INIT.call_once(|| {
            B::init();
        });
    }
}

impl<B: PdfBackend> Default for BackendHandle<B> {
    fn default() -> Self {
        Self::new()
    }
}

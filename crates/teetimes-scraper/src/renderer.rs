//! Page renderer capability.
//!
//! A [`PageRenderer`] hands out [`RenderSession`]s; each session navigates to
//! one URL at a time and returns a [`RenderedDocument`] that can be queried
//! for marker elements. Sessions are exclusively owned by one worker and must
//! be released with [`RenderSession::close`] exactly once.

use std::future::Future;

use crate::error::RenderError;

/// Factory for render sessions.
pub trait PageRenderer: Send + Sync + 'static {
    type Session: RenderSession;

    /// Acquire a fresh render session.
    fn open(&self) -> impl Future<Output = Result<Self::Session, RenderError>> + Send;
}

/// One page-rendering context.
pub trait RenderSession: Send + 'static {
    type Document: RenderedDocument;

    /// Navigate to `url` and wait for the page load to finish.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Navigation`] when the renderer reports the page
    /// could not be loaded; other variants signal adapter faults.
    fn navigate(
        &mut self,
        url: &str,
    ) -> impl Future<Output = Result<Self::Document, RenderError>> + Send;

    /// Release the session. Consumes `self` so a closed session cannot be reused.
    fn close(self) -> impl Future<Output = Result<(), RenderError>> + Send;
}

/// Handle to the document loaded by the most recent navigation. Only valid
/// while its owning session is open.
pub trait RenderedDocument: Send + Sync + 'static {
    type Element: Send + Sync + 'static;

    /// All elements currently matching `selector`, in document order.
    fn find_all(
        &self,
        selector: &str,
    ) -> impl Future<Output = Result<Vec<Self::Element>, RenderError>> + Send;

    /// Visible text of `element`.
    fn text(
        &self,
        element: &Self::Element,
    ) -> impl Future<Output = Result<String, RenderError>> + Send;
}

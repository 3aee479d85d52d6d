use std::future::Future;

use super::{FetchError, Page};

/// Capability to fetch one page of a collection.
///
/// Implementations are bound to one logical collection (the user's playlists,
/// the tracks of one playlist) and are moved into the task driving a
/// traversal, hence the `Send + Sync + 'static` bounds.
pub trait PageSource<T>: Send + Sync + 'static {
    fn fetch_page(
        &self,
        token: &str,
        offset: u32,
        limit: u32,
    ) -> impl Future<Output = Result<Page<T>, FetchError>> + Send;
}

/// Page source backed by a closure receiving `(token, offset, limit)`.
pub struct FnSource<F>(F);

/// Wraps a closure so it can be used as a [`PageSource`].
///
/// ```ignore
/// let source = source_fn(|_token, offset, limit| async move {
///     Ok(Page::new((offset..offset + limit).collect(), 100))
/// });
/// ```
pub fn source_fn<F>(f: F) -> FnSource<F> {
    FnSource(f)
}

impl<T, F, Fut> PageSource<T> for FnSource<F>
where
    T: Send + 'static,
    F: Fn(String, u32, u32) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Page<T>, FetchError>> + Send,
{
    fn fetch_page(
        &self,
        token: &str,
        offset: u32,
        limit: u32,
    ) -> impl Future<Output = Result<Page<T>, FetchError>> + Send {
        (self.0)(token.to_string(), offset, limit)
    }
}

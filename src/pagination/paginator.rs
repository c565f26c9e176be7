use crate::Result;
use crate::checks::Cancellation;
use core::future::Future;
use core::num::NonZeroUsize;
use futures::Stream;
use std::collections::{HashSet, VecDeque};
use thiserror::Error;

/// Log target for pagination
const LOG_TARGET: &str = "pagination";

/// One page returned by a list or describe call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,

    /// Opaque continuation token; `None` (or an empty token) marks the last page.
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    #[must_use]
    pub const fn new(items: Vec<T>, next_token: Option<String>) -> Self {
        Self { items, next_token }
    }

    #[must_use]
    pub const fn last(items: Vec<T>) -> Self {
        Self { items, next_token: None }
    }
}

/// Why pagination stopped before the provider ran out of pages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("pagination was cancelled after {pages} page(s)")]
    Cancelled { pages: usize },

    #[error("pagination stopped after reaching the limit of {limit} page(s)")]
    PageLimit { limit: usize },

    #[error("the provider returned continuation token '{token}' twice")]
    RepeatedToken { token: String },
}

/// Limits applied to one pagination loop.
#[derive(Debug, Clone, Default)]
pub struct PaginationOptions {
    /// Maximum number of pages to request. Unlimited when unset.
    pub max_pages: Option<NonZeroUsize>,

    /// Checked before every page request.
    pub cancellation: Option<Cancellation>,
}

impl PaginationOptions {
    #[must_use]
    pub const fn with_max_pages(mut self, max_pages: NonZeroUsize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, cancellation: Cancellation) -> Self {
        self.cancellation = Some(cancellation);
        self
    }
}

enum Cursor {
    Start,
    Token(String),
    Failed(PaginationError),
    Done,
}

struct State<F, T> {
    fetch: F,
    options: PaginationOptions,
    cursor: Cursor,
    buffered: VecDeque<T>,
    pages: usize,
    seen_tokens: HashSet<String>,
}

impl<F, T> State<F, T> {
    fn ensure_may_fetch(&self) -> Result<(), PaginationError> {
        if self.options.cancellation.as_ref().is_some_and(Cancellation::is_cancelled) {
            return Err(PaginationError::Cancelled { pages: self.pages });
        }

        match self.options.max_pages {
            Some(limit) if self.pages >= limit.get() => Err(PaginationError::PageLimit { limit: limit.get() }),
            _ => Ok(()),
        }
    }

    fn advance(&mut self, next_token: Option<String>) {
        self.cursor = match next_token {
            Some(token) if token.is_empty() => Cursor::Done,
            Some(token) if !self.seen_tokens.insert(token.clone()) => Cursor::Failed(PaginationError::RepeatedToken { token }),
            Some(token) => Cursor::Token(token),
            None => Cursor::Done,
        };
    }
}

/// Lazily yield every item behind a continuation-token API.
///
/// `fetch` is called with `None` for the first page and with the previous page's token after
/// that, until a page comes back without a token. Items are yielded as soon as their page
/// arrives, so a consumer has already seen every earlier item when a later page fails. The
/// first error ends the stream.
pub fn paginate<T, F, Fut>(fetch: F) -> impl Stream<Item = Result<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    paginate_with(PaginationOptions::default(), fetch)
}

/// [`paginate`] with a page limit and/or cancellation token.
pub fn paginate_with<T, F, Fut>(options: PaginationOptions, fetch: F) -> impl Stream<Item = Result<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let state = State {
        fetch,
        options,
        cursor: Cursor::Start,
        buffered: VecDeque::new(),
        pages: 0,
        seen_tokens: HashSet::new(),
    };

    futures::stream::try_unfold(state, next_item)
}

async fn next_item<T, F, Fut>(mut state: State<F, T>) -> Result<Option<(T, State<F, T>)>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    loop {
        if let Some(item) = state.buffered.pop_front() {
            return Ok(Some((item, state)));
        }

        let token = match core::mem::replace(&mut state.cursor, Cursor::Done) {
            Cursor::Done => return Ok(None),
            Cursor::Failed(e) => return Err(e.into()),
            Cursor::Start => None,
            Cursor::Token(token) => Some(token),
        };

        state.ensure_may_fetch()?;

        let page = (state.fetch)(token).await?;
        state.pages += 1;
        log::trace!(
            target: LOG_TARGET,
            "Fetched page {} with {} item(s), more pages: {}",
            state.pages,
            page.items.len(),
            page.next_token.is_some()
        );

        state.advance(page.next_token);
        state.buffered.extend(page.items);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::CancellationSource;
    use anyhow::anyhow;
    use futures::{StreamExt, TryStreamExt};
    use std::sync::{Arc, Mutex};

    type Requests = Arc<Mutex<Vec<Option<String>>>>;

    /// Serves canned pages in order, asserting the token each one is requested with.
    fn serve(
        pages: Vec<(Option<&'static str>, Result<Page<&'static str>>)>,
    ) -> (impl FnMut(Option<String>) -> futures::future::Ready<Result<Page<&'static str>>>, Requests) {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);
        let mut pages: VecDeque<_> = pages.into_iter().collect();
        let fetch = move |token: Option<String>| {
            log.lock().unwrap().push(token.clone());
            let result = match pages.pop_front() {
                Some((expected, page)) => {
                    assert_eq!(token.as_deref(), expected, "unexpected continuation token");
                    page
                }
                None => Err(anyhow!("no more canned pages")),
            };
            futures::future::ready(result)
        };
        (fetch, requests)
    }

    #[tokio::test]
    async fn test_two_pages_fetch_twice() {
        let (fetch, requests) = serve(vec![
            (None, Ok(Page::new(vec!["r1"], Some("t1".to_string())))),
            (Some("t1"), Ok(Page::last(vec!["r2"]))),
        ]);

        let items: Vec<_> = paginate(fetch).try_collect().await.unwrap();

        assert_eq!(items, ["r1", "r2"]);
        assert_eq!(*requests.lock().unwrap(), [None, Some("t1".to_string())]);
    }

    #[tokio::test]
    async fn test_empty_first_page() {
        let (fetch, requests) = serve(vec![(None, Ok(Page::last(vec![])))]);
        let items: Vec<&str> = paginate(fetch).try_collect().await.unwrap();
        assert!(items.is_empty());
        assert_eq!(requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_token_ends_pagination() {
        let (fetch, requests) = serve(vec![(None, Ok(Page::new(vec!["a"], Some(String::new()))))]);
        let items: Vec<_> = paginate(fetch).try_collect().await.unwrap();
        assert_eq!(items, ["a"]);
        assert_eq!(requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_mid_pagination_yields_earlier_items_first() {
        let (fetch, _requests) = serve(vec![
            (None, Ok(Page::new(vec!["r1", "r2"], Some("t1".to_string())))),
            (Some("t1"), Err(anyhow!("throttling"))),
        ]);

        let results: Vec<_> = paginate(fetch).collect().await;

        assert_eq!(results.len(), 3);
        assert_eq!(*results[0].as_ref().unwrap(), "r1");
        assert_eq!(*results[1].as_ref().unwrap(), "r2");
        assert_eq!(results[2].as_ref().unwrap_err().to_string(), "throttling");
    }

    #[tokio::test]
    async fn test_repeated_token_is_an_error() {
        let (fetch, requests) = serve(vec![
            (None, Ok(Page::new(vec!["a"], Some("t1".to_string())))),
            (Some("t1"), Ok(Page::new(vec!["b"], Some("t1".to_string())))),
        ]);

        let results: Vec<_> = paginate(fetch).collect().await;

        assert_eq!(results.len(), 3);
        assert_eq!(*results[1].as_ref().unwrap(), "b");
        let err = results[2].as_ref().unwrap_err();
        assert_eq!(
            err.downcast_ref::<PaginationError>(),
            Some(&PaginationError::RepeatedToken { token: "t1".to_string() })
        );
        assert_eq!(requests.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_page_limit() {
        let (fetch, requests) = serve(vec![
            (None, Ok(Page::new(vec!["a"], Some("t1".to_string())))),
            (Some("t1"), Ok(Page::new(vec!["b"], Some("t2".to_string())))),
        ]);
        let options = PaginationOptions::default().with_max_pages(NonZeroUsize::new(1).unwrap());

        let results: Vec<_> = paginate_with(options, fetch).collect().await;

        assert_eq!(results.len(), 2);
        assert_eq!(*results[0].as_ref().unwrap(), "a");
        assert_eq!(
            results[1].as_ref().unwrap_err().downcast_ref::<PaginationError>(),
            Some(&PaginationError::PageLimit { limit: 1 })
        );
        assert_eq!(requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_cancellation_stops_before_next_request() {
        let source = CancellationSource::new();
        let (fetch, requests) = serve(vec![
            (None, Ok(Page::new(vec!["a"], Some("t1".to_string())))),
            (Some("t1"), Ok(Page::last(vec!["b"]))),
        ]);
        let options = PaginationOptions::default().with_cancellation(source.token());
        let mut stream = core::pin::pin!(paginate_with(options, fetch));

        assert_eq!(stream.next().await.unwrap().unwrap(), "a");
        source.cancel();
        let err = stream.next().await.unwrap().unwrap_err();

        assert_eq!(
            err.downcast_ref::<PaginationError>(),
            Some(&PaginationError::Cancelled { pages: 1 })
        );
        assert!(stream.next().await.is_none());
        assert_eq!(requests.lock().unwrap().len(), 1);
    }
}

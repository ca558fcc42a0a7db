//! Paginated listing
//!
//! The disk API lists every file of the account as a flat, offset-paginated
//! sequence with no server-side path filter. [`ListingWalker`] turns those
//! pages into a single sequence of entries below one root, and
//! [`ListingStream`] runs a walker on a background task, handing objects to
//! the consumer through a bounded channel.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::{Stream, StreamExt, TryStreamExt, stream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{Error, Result};
use crate::object::Object;
use crate::traits::{DiskApi, ResourceInfo};

/// One listed file below the walker root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    /// Path relative to the root, prefix stripped
    pub name: String,
    pub info: ResourceInfo,
}

/// Cursor over the flat file listing, scoped to a root prefix
///
/// The walk ends after the first page holding fewer items than the page
/// size. A remote that returns a short page before the true end would end
/// the walk early.
pub struct ListingWalker {
    api: Arc<dyn DiskApi>,
    root_prefix: String,
    page_size: u32,
    offset: u32,
    pages: usize,
    done: bool,
}

impl ListingWalker {
    pub fn new(api: Arc<dyn DiskApi>, root_prefix: impl Into<String>, page_size: u32) -> Self {
        Self {
            api,
            root_prefix: root_prefix.into(),
            page_size: page_size.max(1),
            offset: 0,
            pages: 0,
            done: false,
        }
    }

    /// Number of pages requested so far
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Fetch the next page and keep the files below the root
    ///
    /// Returns `None` once the listing is exhausted. After an error the
    /// walker is finished as well.
    pub async fn next_page(&mut self) -> Result<Option<Vec<ListEntry>>> {
        if self.done {
            return Ok(None);
        }

        self.pages += 1;
        let page = match self.api.list_files(self.page_size, self.offset).await {
            Ok(page) => page,
            Err(e) => {
                self.done = true;
                return Err(e);
            }
        };

        let received = page.items.len();
        tracing::debug!(offset = self.offset, received, "listing page");
        self.offset = self.offset.saturating_add(received as u32);
        if received < self.page_size as usize {
            self.done = true;
        }

        let root = self.root_prefix.as_str();
        let entries = page
            .items
            .into_iter()
            .filter(|info| !info.is_dir())
            .filter_map(|info| {
                let name = info.path.strip_prefix(root)?.to_string();
                (!name.is_empty()).then_some(ListEntry { name, info })
            })
            .collect();

        Ok(Some(entries))
    }

    /// Consume the walker as a lazy stream of entries
    ///
    /// The stream yields at most one error, after which it ends.
    pub fn into_stream(self) -> impl Stream<Item = Result<ListEntry>> + Send + 'static {
        stream::try_unfold(self, |mut walker| async move {
            let page = walker.next_page().await?;
            Ok::<_, Error>(page.map(|entries| {
                (stream::iter(entries.into_iter().map(Ok::<_, Error>)), walker)
            }))
        })
        .try_flatten()
    }
}

/// Objects discovered by a background listing
///
/// Yields objects in listing order. Dropping the stream, or calling
/// [`cancel`](Self::cancel), stops the producer before it requests another
/// page. A listing error is logged and ends the stream; [`finish`](Self::finish)
/// reports it.
pub struct ListingStream {
    rx: mpsc::Receiver<Object>,
    task: JoinHandle<Result<usize>>,
}

impl ListingStream {
    /// Start walking on a new task. Must be called within a tokio runtime.
    pub fn spawn(walker: ListingWalker, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let task = tokio::spawn(async move {
            let root = walker.root_prefix.clone();
            let mut entries = Box::pin(walker.into_stream());
            let mut sent = 0usize;

            while let Some(entry) = entries.next().await {
                match entry {
                    Ok(entry) => {
                        let object = Object::with_info(entry.name, &entry.info);
                        if tx.send(object).await.is_err() {
                            tracing::debug!(root = %root, sent, "listing consumer gone");
                            break;
                        }
                        sent += 1;
                    }
                    Err(e) => {
                        tracing::error!(root = %root, error = %e, "couldn't list");
                        return Err(e);
                    }
                }
            }
            Ok(sent)
        });

        Self { rx, task }
    }

    /// Receive the next object
    pub async fn recv(&mut self) -> Option<Object> {
        self.rx.recv().await
    }

    /// Ask the producer to stop; objects already buffered can still be received
    pub fn cancel(&mut self) {
        self.rx.close();
    }

    /// Wait for the producer and return how many objects it handed over
    ///
    /// Objects not yet received are discarded.
    pub async fn finish(self) -> Result<usize> {
        let Self { rx, task } = self;
        drop(rx);
        task.await
            .map_err(|e| Error::General(format!("listing task failed: {e}")))?
    }
}

impl Stream for ListingStream {
    type Item = Object;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Object>> {
        self.rx.poll_recv(cx)
    }
}

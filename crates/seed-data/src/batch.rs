//! Concurrent book publishing with progress reporting.

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{error, info, warn};
use uuid::Uuid;

use bookshelf::models::{BookRecord, BookUploadRequest};
use bookshelf::{AssetStore, Catalog};

use crate::publisher::BookPublisher;

/// One book to publish and the author it belongs to.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub request: BookUploadRequest,
    pub author_id: Uuid,
}

/// A skipped item. `index` and `title` are unknown when the task panicked.
#[derive(Debug, Clone)]
pub struct BatchFailure {
    pub index: Option<usize>,
    pub title: Option<String>,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    /// Created books, in item order.
    pub created: Vec<BookRecord>,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Pairs requests with authors by position. Extra entries on either side are
/// dropped with a warning.
pub fn pair_with_authors(requests: Vec<BookUploadRequest>, author_ids: &[Uuid]) -> Vec<BatchItem> {
    if requests.len() != author_ids.len() {
        let paired = requests.len().min(author_ids.len());
        warn!(
            "{} book requests but {} authors; only {} books will be published",
            requests.len(),
            author_ids.len(),
            paired
        );
    }

    requests
        .into_iter()
        .zip(author_ids.iter().copied())
        .map(|(request, author_id)| BatchItem { request, author_id })
        .collect()
}

/// Publishes every item as its own task and waits for all of them.
///
/// A failing item is logged and reported without affecting the others.
pub async fn publish_batch<C, A>(
    publisher: Arc<BookPublisher<C, A>>,
    items: Vec<BatchItem>,
) -> BatchReport
where
    C: Catalog + 'static,
    A: AssetStore + 'static,
{
    let total = items.len();
    info!("Publishing {} books...", total);

    let mut tasks = JoinSet::new();
    for (index, item) in items.into_iter().enumerate() {
        let publisher = Arc::clone(&publisher);
        tasks.spawn(async move {
            let result = publisher.create_book(&item.request, item.author_id).await;
            (index, item.request.title, result)
        });
    }

    let mut created = Vec::with_capacity(total);
    let mut failures = Vec::new();
    let mut done = 0usize;

    while let Some(joined) = tasks.join_next().await {
        done += 1;
        match joined {
            Ok((index, _, Ok(book))) => created.push((index, book)),
            Ok((index, title, Err(e))) => {
                error!("Skipping book {} ({}): {}", index, title, e);
                failures.push(BatchFailure {
                    index: Some(index),
                    title: Some(title),
                    error: e.to_string(),
                });
            }
            Err(e) => {
                error!("Book task failed: {}", e);
                failures.push(BatchFailure {
                    index: None,
                    title: None,
                    error: e.to_string(),
                });
            }
        }
        info!("Progress: {:.0}%", done as f64 / total as f64 * 100.0);
    }

    created.sort_by_key(|(index, _)| *index);
    failures.sort_by_key(|f| f.index);

    info!(
        "Finished publishing: {} created, {} failed",
        created.len(),
        failures.len()
    );

    BatchReport {
        created: created.into_iter().map(|(_, book)| book).collect(),
        failures,
    }
}

//! Shared fixtures.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use reading_progress::{
    Chapter, FeedError, InMemoryStore, RemoteFeed, StaticFeed, Stores, Title,
};

pub type MemStores = Stores<InMemoryStore, InMemoryStore>;

pub fn stores() -> MemStores {
    Stores::new(InMemoryStore::new(), InMemoryStore::new())
}

pub fn title(id: &str, name: &str, author: &str) -> Title {
    Title::new(id).unwrap().with_name(name).with_author(author)
}

pub fn chapter(title_id: &str, code: &str, no: &str) -> Chapter {
    Chapter::new(title_id, code, no, format!("Chapter {no}")).unwrap()
}

/// Wraps a feed and counts how often it is fetched.
#[derive(Clone)]
pub struct CountingFeed {
    inner: StaticFeed,
    calls: Arc<AtomicUsize>,
}

impl CountingFeed {
    pub fn new(inner: StaticFeed) -> Self {
        Self {
            inner,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RemoteFeed for CountingFeed {
    async fn fetch_text(&self) -> Result<String, FeedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_text().await
    }
}

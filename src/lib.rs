//! Reading-progress tracker core.
//!
//! Titles and their chapters live in a durable key-value store, one record
//! per title and one per chapter. A session store caches a denormalized
//! snapshot of the whole collection so a reload does not rescan everything,
//! and a remote tab-separated feed refreshes title metadata.
//!
//! Every operation takes explicit store handles ([`Stores`]), so any
//! [`KeyValueStore`] implementation can stand behind either layer.

mod chapter;
mod config;
mod error;
mod keys;
mod notice;
mod record;
mod remote;
mod storage;
mod title;
mod title_list;
mod tracker;

pub use chapter::{newest_first, Chapter};
pub use config::{TrackerConfig, DEFAULT_FEED_URL};
pub use error::{FeedError, StoreError, TrackerError, ValidationError};
pub use keys::{StoreKey, CHAPTER_SEPARATOR, RESERVED_PREFIX};
pub use notice::{Notices, FATAL};
pub use record::{Collection, Entity, Record};
#[cfg(feature = "http")]
pub use remote::HttpFeed;
pub use remote::{parse_feed, FeedRow, RemoteFeed, StaticFeed};
pub use storage::{
    decode, encode, InMemoryStore, JsonFileStore, KeyValueStore, StoreExt, Stores,
    DEFAULT_SESSION_KEY,
};
pub use title::Title;
pub use title_list::{TitleList, LOCAL_FAILURE_NOTICE};
pub use tracker::Tracker;

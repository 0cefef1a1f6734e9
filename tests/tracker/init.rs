//! The top-level entry point.

use reading_progress::{Collection, Notices, StaticFeed, TitleList};

use crate::support::{stores, title, CountingFeed};

#[tokio::test]
async fn cached_collection_short_circuits_scan_and_sync() {
    let stores = stores();
    let cached = TitleList::from_titles(vec![title("cached", "Cached", "")]);
    cached.save_to_session(&stores).unwrap();
    title("local-only", "Local", "").save_to_local(&stores).unwrap();

    let feed = CountingFeed::new(StaticFeed::new("h\ncached\tRemote\tName"));
    let titles = TitleList::init(&stores, &feed, &Notices::new()).await.unwrap();

    assert_eq!(titles, cached);
    assert_eq!(feed.calls(), 0);
}

#[tokio::test]
async fn cold_start_scans_syncs_once_and_caches() {
    let stores = stores();
    title("t", "Old", "").save_to_local(&stores).unwrap();
    assert!(TitleList::from_session(&stores).unwrap().is_none());

    let feed = CountingFeed::new(StaticFeed::new("h\nt\tNew\tAuthor"));
    let titles = TitleList::init(&stores, &feed, &Notices::new()).await.unwrap();

    assert_eq!(feed.calls(), 1);
    assert_eq!(titles.get("t").unwrap().name, "New");
    assert_eq!(TitleList::from_session(&stores).unwrap(), Some(titles.clone()));

    // second call is served from the cache
    let again = TitleList::init(&stores, &feed, &Notices::new()).await.unwrap();
    assert_eq!(feed.calls(), 1);
    assert_eq!(again, titles);
}

#[tokio::test]
async fn cold_start_with_empty_store_caches_empty_collection() {
    let stores = stores();
    let feed = CountingFeed::new(StaticFeed::unavailable("offline"));
    let titles = TitleList::init(&stores, &feed, &Notices::new()).await.unwrap();
    assert_eq!(titles.size(), 0);
    assert_eq!(TitleList::from_session(&stores).unwrap(), Some(TitleList::new()));
}

//! Reconciling local titles with the remote feed.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use reading_progress::{
    KeyValueStore, Notices, StaticFeed, StoreExt, Title, TitleList, LOCAL_FAILURE_NOTICE,
};
use serde_json::json;

use crate::support::{stores, title};

#[tokio::test]
async fn matching_titles_take_remote_metadata() {
    let stores = stores();
    stores.local.set("_foo", "bar").unwrap();
    title("title1", "Old Title", "bar").save_to_local(&stores).unwrap();
    title("title2", "foo", "Old Author").save_to_local(&stores).unwrap();
    let untouched = title("title4", "Mine", "Me");
    untouched.save_to_local(&stores).unwrap();

    let feed = StaticFeed::new(
        "header\n\
         title1\tNew Title\tbar\tnewbaz\n\
         title2\tfoo\tNew Author\tnewbaz\n\
         title3\tfoo\tbar\tNew Channels",
    );
    let titles = TitleList::from_local_and_sync(&stores, &feed, &Notices::new())
        .await
        .unwrap();

    let expected = TitleList::from_titles(vec![
        title("title1", "New Title", "bar").with_channels("newbaz"),
        title("title2", "foo", "New Author").with_channels("newbaz"),
        untouched.clone(),
    ]);
    assert_eq!(titles, expected);

    // durable records follow the in-memory ones
    assert_eq!(Title::from_local(&stores, "title1").unwrap(), expected.get("title1").cloned());
    assert_eq!(Title::from_local(&stores, "title2").unwrap(), expected.get("title2").cloned());
    assert_eq!(Title::from_local(&stores, "title4").unwrap(), Some(untouched));

    // the feed cannot create titles
    assert!(!stores.local.contains("title3").unwrap());
}

#[tokio::test]
async fn unchanged_titles_are_not_rewritten() {
    let stores = stores();
    title("t", "Same", "Same").save_to_local(&stores).unwrap();
    // a raw value that would be normalized if it were re-persisted
    stores
        .local
        .set_raw("t", r#"{"author":"Same","name":"Same","touched":0}"#.into())
        .unwrap();

    let feed = StaticFeed::new("h\nt\tSame\tSame");
    TitleList::from_local_and_sync(&stores, &feed, &Notices::new())
        .await
        .unwrap();

    assert_eq!(
        stores.local.get_raw("t").unwrap().unwrap(),
        r#"{"author":"Same","name":"Same","touched":0}"#
    );
}

#[tokio::test]
async fn feed_failure_returns_local_only() {
    let stores = stores();
    title("t", "Local", "Me").save_to_local(&stores).unwrap();
    let local = TitleList::from_local(&stores).unwrap();

    let titles = TitleList::from_local_and_sync(
        &stores,
        &StaticFeed::unavailable("network down"),
        &Notices::new(),
    )
    .await
    .unwrap();

    assert_eq!(titles, local);
    assert_eq!(
        stores.local.get("t").unwrap().unwrap(),
        json!({ "name": "Local", "author": "Me", "touched": 0 })
    );
}

#[tokio::test]
async fn local_failure_notifies_user_and_yields_empty() {
    let stores = stores();
    stores.local.set_raw("broken", "[not json".into()).unwrap();

    let notices = Notices::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    notices.on_fatal(move |message| sink.lock().unwrap().push(message));

    let titles = TitleList::from_local_and_sync(&stores, &StaticFeed::new("h"), &notices)
        .await
        .unwrap();
    assert_eq!(titles, TitleList::new());

    // EventEmitter is async, give it time
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(*seen.lock().unwrap(), vec![LOCAL_FAILURE_NOTICE.to_string()]);
}

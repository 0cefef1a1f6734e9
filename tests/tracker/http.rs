//! HTTP feed integration tests.
//!
//! Serves a TSV body from an axum server and syncs against it with HttpFeed.

use std::time::Duration;

use axum::{http::StatusCode, routing::get, Router};
use reading_progress::{FeedError, HttpFeed, Notices, RemoteFeed, TitleList};

use crate::support::{stores, title};

/// Bind to port 0 and return the actual address.
async fn start_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn fetches_and_parses_rows() {
    let app = Router::new().route(
        "/titles.tsv",
        get(|| async { "id\tname\tauthor\tchannels\nt1\tDune\tHerbert\tweb\n" }),
    );
    let base = start_server(app).await;

    let rows = HttpFeed::new(format!("{base}/titles.tsv"))
        .fetch_rows()
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Dune");
    assert_eq!(rows[0].channels.as_deref(), Some("web"));
}

#[tokio::test]
async fn error_status_is_a_feed_error() {
    let app = Router::new().route("/titles.tsv", get(|| async { StatusCode::NOT_FOUND }));
    let base = start_server(app).await;

    let err = HttpFeed::new(format!("{base}/titles.tsv"))
        .fetch_text()
        .await
        .unwrap_err();
    assert_eq!(err, FeedError::Status(404));
}

#[tokio::test]
async fn slow_feed_times_out_and_falls_back_to_local() {
    let app = Router::new().route(
        "/titles.tsv",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "h\nt\tRemote\tName"
        }),
    );
    let base = start_server(app).await;

    let stores = stores();
    title("t", "Local", "").save_to_local(&stores).unwrap();

    let feed = HttpFeed::new(format!("{base}/titles.tsv")).with_timeout(Duration::from_millis(100));
    let titles = TitleList::from_local_and_sync(&stores, &feed, &Notices::new())
        .await
        .unwrap();
    assert_eq!(titles.get("t").unwrap().name, "Local");
}

#[tokio::test]
async fn sync_over_http_updates_local_titles() {
    let app = Router::new().route("/titles.tsv", get(|| async { "h\nt\tRemote\tName\tapp" }));
    let base = start_server(app).await;

    let stores = stores();
    title("t", "Local", "").save_to_local(&stores).unwrap();

    let feed = HttpFeed::new(format!("{base}/titles.tsv"));
    let titles = TitleList::from_local_and_sync(&stores, &feed, &Notices::new())
        .await
        .unwrap();
    let t = titles.get("t").unwrap();
    assert_eq!((t.name.as_str(), t.author.as_str()), ("Remote", "Name"));
    assert_eq!(t.channels.as_deref(), Some("app"));
}

//! Progress persists across sessions through the file-backed durable store.

use reading_progress::{
    Chapter, InMemoryStore, JsonFileStore, StaticFeed, Stores, Title, Tracker,
};

fn open_session(path: &std::path::Path) -> Tracker<JsonFileStore, InMemoryStore, StaticFeed> {
    let stores = Stores::new(JsonFileStore::open(path).unwrap(), InMemoryStore::new());
    Tracker::new(stores, StaticFeed::unavailable("offline"))
}

#[tokio::test]
async fn new_session_rebuilds_from_durable_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("progress.json");

    {
        let tracker = open_session(&path);
        let mut titles = tracker.init().await.unwrap();
        let title = Title::new("dune")
            .unwrap()
            .with_name("Dune")
            .with_touched(7);
        tracker.add_title(&mut titles, title).unwrap();
        for (code, no) in [("c1", "1"), ("c2", "2")] {
            let chapter = Chapter::new("dune", code, no, format!("Part {no}")).unwrap();
            tracker.add_chapter(&mut titles, chapter).unwrap();
        }
        assert!(tracker.remove_chapter(&mut titles, "dune", "c1").unwrap());
    }

    let tracker = open_session(&path);
    let mut titles = tracker.init().await.unwrap();
    let dune = titles.get_mut("dune").unwrap();
    assert_eq!(dune.name, "Dune");
    assert_eq!(dune.touched, 7);
    assert_eq!(dune.chapters().len(), 1);
    assert_eq!(dune.last_chapter().unwrap().name, "Part 2");
}

//! Building the collection from the durable store.

use reading_progress::{Collection, KeyValueStore, StoreExt, Title, TitleList};

use crate::support::{chapter, stores, title};

#[test]
fn reconstructs_every_title_with_its_own_chapters() {
    let stores = stores();
    let ids = ["alpha", "beta", "gamma"];
    for id in ids {
        title(id, id, "someone").save_to_local(&stores).unwrap();
        for (code, no) in [("c1", "01"), ("c3", "03"), ("c2", "02")] {
            chapter(id, code, no).save_to_local(&stores).unwrap();
        }
    }
    stores.local.set("_meta", "internal").unwrap();

    let titles = TitleList::from_local(&stores).unwrap();

    assert_eq!(titles.size(), 3);
    for id in ids {
        let t = titles.get(id).unwrap();
        assert!(t.is_sorted());
        assert!(t.chapters().iter().all(|c| c.title_id == id));
        let nos: Vec<_> = t.chapters().iter().map(|c| c.no.as_str()).collect();
        assert_eq!(nos, vec!["03", "02", "01"]);
    }
}

#[test]
fn orphan_chapters_are_dropped_not_errors() {
    let stores = stores();
    title("kept", "Kept", "").save_to_local(&stores).unwrap();
    chapter("kept", "c1", "1").save_to_local(&stores).unwrap();
    chapter("gone", "c1", "1").save_to_local(&stores).unwrap();

    let titles = TitleList::from_local(&stores).unwrap();
    assert_eq!(titles.size(), 1);
    assert_eq!(titles.get("kept").unwrap().chapters().len(), 1);
    // the orphan record itself is left in place
    assert!(stores.local.contains("gone|c1").unwrap());
}

#[test]
fn chapter_codes_containing_separator_attach_to_their_title() {
    let stores = stores();
    title("t", "T", "").save_to_local(&stores).unwrap();
    chapter("t", "vol1|ch1", "1").save_to_local(&stores).unwrap();

    let titles = TitleList::from_local(&stores).unwrap();
    assert_eq!(titles.get("t").unwrap().chapters()[0].code, "vol1|ch1");
}

#[test]
fn reserved_only_store_is_empty() {
    let stores = stores();
    stores.local.set("_foo", "bar").unwrap();
    stores.local.set("_bar", &serde_json::json!({ "x": 1 })).unwrap();
    assert_eq!(TitleList::from_local(&stores).unwrap(), TitleList::new());
}

#[test]
fn title_metadata_and_channels_survive_the_scan() {
    let stores = stores();
    let original = Title::new("dune")
        .unwrap()
        .with_name("Dune")
        .with_author("Herbert")
        .with_touched(42)
        .with_channels("web,app");
    original.save_to_local(&stores).unwrap();

    let titles = TitleList::from_local(&stores).unwrap();
    assert_eq!(titles.get("dune"), Some(&original));
}

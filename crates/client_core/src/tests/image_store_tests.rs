use super::*;

fn png(marker: u8) -> PlotImage {
    PlotImage {
        bytes: vec![0x89, b'P', b'N', b'G', marker],
        mime_type: "image/png",
    }
}

#[test]
fn blob_handles_are_unique_blob_urls() {
    let store = BlobImageStore::new();
    let first = store.create(png(1)).expect("create");
    let second = store.create(png(2)).expect("create");

    assert!(first.as_str().starts_with("blob:pathgauge/"));
    assert_ne!(first, second);
    assert_eq!(store.live_handles(), 2);
    assert_eq!(store.get(&second), Some(png(2)));
}

#[test]
fn replacing_the_plot_releases_the_previous_handle() {
    let store = BlobImageStore::new();
    let mut slot = PlotSlot::new(Arc::new(store.clone()));

    let first = slot.replace(png(1)).expect("first").clone();
    for marker in 2..10 {
        slot.replace(png(marker)).expect("replace");
        assert_eq!(store.live_handles(), 1);
    }

    assert_eq!(store.get(&first), None);
    let current = slot.current().expect("current handle");
    assert_eq!(store.get(current), Some(png(9)));
}

#[test]
fn clearing_is_idempotent() {
    let store = BlobImageStore::new();
    let mut slot = PlotSlot::new(Arc::new(store.clone()));
    slot.replace(png(1)).expect("create");

    slot.clear();
    slot.clear();

    assert!(slot.current().is_none());
    assert_eq!(store.live_handles(), 0);
}

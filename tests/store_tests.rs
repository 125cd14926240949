use std::path::Path;

use chrono::{TimeZone, Utc};
use hotmirror::io::{FsStore, MemoryStore, Store};
use hotmirror::protocol::prelude::*;
use hotmirror::{publish_latest, read_manifest};
use tempfile::TempDir;

fn publish_with(store: &dyn Store, root: &Path) -> Vec<Vec<u8>> {
    let snapshot = root.join("hotwords_merged.txt");
    store
        .write_atomic(&snapshot, "【AI】:[GPT,Claude]\n【科技】:[芯片]\n".as_bytes())
        .expect("seed snapshot");
    let origin = OriginIdentity::new("acme", "hotwords", "main").unwrap();
    let stamp = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
    let out = root.join("output");
    publish_latest(store, &snapshot, "hotwords.txt", &out, &origin, stamp).expect("publish");

    let mut files = store.list(&out).expect("list");
    files.sort();
    files
        .iter()
        .map(|p| store.read(p).expect("read back"))
        .collect()
}

#[test]
fn fs_and_memory_stores_publish_identical_bytes() {
    let tmp = TempDir::new().unwrap();
    let on_disk = publish_with(&FsStore::new(), tmp.path());
    let in_memory = publish_with(&MemoryStore::new(), tmp.path());
    assert_eq!(on_disk.len(), 3);
    assert_eq!(on_disk, in_memory);
}

#[test]
fn missing_manifest_is_an_error_not_a_default() {
    let tmp = TempDir::new().unwrap();
    let err = read_manifest(&FsStore::new(), &tmp.path().join(MANIFEST_FILE)).unwrap_err();
    assert!(err.to_string().contains(MANIFEST_FILE));
}

#[test]
fn corrupt_manifest_is_rejected() {
    let store = MemoryStore::new();
    store.insert(MANIFEST_FILE, r#"{"generatedAt": "2026-03-01T00:00:00Z""#);
    assert!(read_manifest(&store, Path::new(MANIFEST_FILE)).is_err());
}

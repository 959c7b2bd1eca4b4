// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn memory_store_round_trip() {
    let store = MemoryStore::new();
    store
        .put("parent:a", vec!["x".to_string(), "y".to_string()])
        .unwrap();
    assert_eq!(store.get("parent:a").unwrap(), vec!["x", "y"]);
    assert!(store.get("parent:b").unwrap().is_empty());
}

#[test]
fn empty_put_removes_key() {
    let store = MemoryStore::new();
    store.put("k", vec!["v".to_string()]).unwrap();
    store.put("k", vec![]).unwrap();
    assert!(store.get("k").unwrap().is_empty());
}

#[test]
fn file_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deps.json");

    {
        let store = FileStore::open(&path).unwrap();
        store
            .put("parent:github://o/r/dinghyfile", vec!["m1".to_string()])
            .unwrap();
    }

    let store = FileStore::open(&path).unwrap();
    assert_eq!(
        store.get("parent:github://o/r/dinghyfile").unwrap(),
        vec!["m1"]
    );
}

#[test]
fn file_store_remove_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deps.json");

    let store = FileStore::open(&path).unwrap();
    store.put("a", vec!["1".to_string()]).unwrap();
    store.put("b", vec!["2".to_string()]).unwrap();
    store.remove("a").unwrap();
    drop(store);

    let store = FileStore::open(&path).unwrap();
    assert!(store.get("a").unwrap().is_empty());
    assert_eq!(store.get("b").unwrap(), vec!["2"]);
}

#[test]
fn corrupt_file_is_moved_aside() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deps.json");
    std::fs::write(&path, "not json at all").unwrap();

    let store = FileStore::open(&path).unwrap();
    assert!(store.get("anything").unwrap().is_empty());
    assert!(path.with_extension("bak").exists());
}

#[test]
fn file_store_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/dir/deps.json");

    let store = FileStore::open(&path).unwrap();
    store.put("k", vec!["v".to_string()]).unwrap();
    assert!(path.exists());
}

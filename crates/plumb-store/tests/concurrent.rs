//! Thread-safety stress tests for the ObjectStore.
//!
//! Many threads writing the same content must all succeed, agree on the id,
//! and leave exactly one complete object behind.

use std::fs;
use std::sync::{Arc, Barrier};
use std::thread;

use plumb_object::ObjectKind;
use plumb_store::ObjectStore;

fn temp_store() -> (tempfile::TempDir, ObjectStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = ObjectStore::open(dir.path()).unwrap();
    (dir, store)
}

#[test]
fn concurrent_puts_of_same_content() {
    let (dir, store) = temp_store();
    let store = Arc::new(store);
    let barrier = Arc::new(Barrier::new(16));

    let mut handles = Vec::new();
    for _ in 0..16 {
        let store = Arc::clone(&store);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            store.put(ObjectKind::Blob, b"racing writers\n").unwrap()
        }));
    }

    let oids: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(oids.windows(2).all(|w| w[0] == w[1]));

    let raw = store.get(&oids[0]).unwrap();
    assert_eq!(raw.data, b"racing writers\n");

    // One bucket, one object, no stray temp files.
    let top: Vec<_> = fs::read_dir(dir.path()).unwrap().map(|e| e.unwrap()).collect();
    assert_eq!(top.len(), 1);
    assert_eq!(fs::read_dir(top[0].path()).unwrap().count(), 1);
}

#[test]
fn concurrent_puts_into_shared_bucket() {
    let (_dir, store) = temp_store();
    let store = Arc::new(store);

    let mut handles = Vec::new();
    for thread_id in 0..8 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            (0..50)
                .map(|i| {
                    let content = format!("thread {thread_id} object {i}\n");
                    let oid = store.put(ObjectKind::Blob, content.as_bytes()).unwrap();
                    (oid, content)
                })
                .collect::<Vec<_>>()
        }));
    }

    for handle in handles {
        for (oid, content) in handle.join().unwrap() {
            assert_eq!(store.get(&oid).unwrap().data, content.as_bytes());
        }
    }
}

#[test]
fn concurrent_reads() {
    let (_dir, store) = temp_store();
    let mut expected = Vec::new();
    for i in 0..50 {
        let content = format!("concurrent test object {i}\n").into_bytes();
        let oid = store.put(ObjectKind::Blob, &content).unwrap();
        expected.push((oid, content));
    }

    let store = Arc::new(store);
    let expected = Arc::new(expected);

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let store = Arc::clone(&store);
            let expected = Arc::clone(&expected);
            thread::spawn(move || {
                for (oid, content) in expected.iter() {
                    assert_eq!(&store.get(oid).unwrap().data, content);
                    assert_eq!(
                        store.read_header(oid).unwrap(),
                        (ObjectKind::Blob, content.len())
                    );
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}

use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;

use chirpy_auth::{Argon2Hasher, SystemClock};
use chirpy_db::{Database, SortOrder};

const THREADS: u64 = 8;
const PER_THREAD: u64 = 10;

fn open(dir: &tempfile::TempDir) -> Arc<Database> {
    let hasher = Argon2Hasher::with_params(8, 1).unwrap();
    let db = Database::open(
        &dir.path().join("database.json"),
        Arc::new(hasher),
        Arc::new(SystemClock),
    )
    .unwrap();
    Arc::new(db)
}

#[test]
fn concurrent_creates_lose_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir);

    let handles: Vec<_> = (0..THREADS)
        .map(|author| {
            let db = db.clone();
            thread::spawn(move || {
                (0..PER_THREAD)
                    .map(|n| db.create_chirp(&format!("{author}-{n}"), author + 1).unwrap().id)
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let ids: BTreeSet<u64> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();

    let total = THREADS * PER_THREAD;
    assert_eq!(ids, (1..=total).collect::<BTreeSet<_>>());

    let stored = db.list_chirps(None, SortOrder::Asc).unwrap();
    assert_eq!(stored.len() as u64, total);
    assert!(stored.windows(2).all(|w| w[0].id < w[1].id));
}

#[test]
fn readers_never_see_a_torn_document() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir);

    let writer = {
        let db = db.clone();
        thread::spawn(move || {
            for n in 0..50 {
                db.create_chirp(&format!("chirp {n}"), 1).unwrap();
                db.revoke_token(&format!("token {n}")).unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let db = db.clone();
            thread::spawn(move || {
                for _ in 0..50 {
                    // Every load must parse; a half-written file would not.
                    let doc = db.store().load().unwrap();
                    assert!(doc.chirps.len() >= doc.revoked_tokens.len());
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for r in readers {
        r.join().unwrap();
    }

    let doc = db.store().load().unwrap();
    assert_eq!(doc.chirps.len(), 50);
    assert_eq!(doc.revoked_tokens.len(), 50);
}

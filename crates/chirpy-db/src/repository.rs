use std::collections::BTreeMap;
use std::marker::PhantomData;

use tracing::debug;

use chirpy_types::models::{Chirp, User};
use chirpy_types::{Error, Result};

use crate::document::Document;
use crate::store::Store;

/// A record that lives in one of the document's id-keyed maps.
pub trait Record: Clone {
    fn id(&self) -> u64;
}

impl Record for Chirp {
    fn id(&self) -> u64 {
        self.id
    }
}

impl Record for User {
    fn id(&self) -> u64 {
        self.id
    }
}

/// Selects one map inside [`Document`] together with its id sequence.
pub trait Collection {
    type Record: Record;

    const NAME: &'static str;

    fn records(doc: &Document) -> &BTreeMap<u64, Self::Record>;
    fn records_mut(doc: &mut Document) -> &mut BTreeMap<u64, Self::Record>;
    fn sequence_mut(doc: &mut Document) -> &mut u64;
}

pub struct Chirps;
pub struct Users;

impl Collection for Chirps {
    type Record = Chirp;
    const NAME: &'static str = "chirp";

    fn records(doc: &Document) -> &BTreeMap<u64, Chirp> {
        &doc.chirps
    }

    fn records_mut(doc: &mut Document) -> &mut BTreeMap<u64, Chirp> {
        &mut doc.chirps
    }

    fn sequence_mut(doc: &mut Document) -> &mut u64 {
        &mut doc.sequences.chirps
    }
}

impl Collection for Users {
    type Record = User;
    const NAME: &'static str = "user";

    fn records(doc: &Document) -> &BTreeMap<u64, User> {
        &doc.users
    }

    fn records_mut(doc: &mut Document) -> &mut BTreeMap<u64, User> {
        &mut doc.users
    }

    fn sequence_mut(doc: &mut Document) -> &mut u64 {
        &mut doc.sequences.users
    }
}

/// Reserve the next id for collection `C` inside `doc`.
///
/// Takes the larger of the stored high-water mark and the largest live id,
/// so documents written without a sequence still never hand out a live id.
pub(crate) fn allocate_id<C: Collection>(doc: &mut Document) -> u64 {
    let max_live = C::records(doc).keys().next_back().copied().unwrap_or(0);
    let seq = C::sequence_mut(doc);
    *seq = (*seq).max(max_live) + 1;
    *seq
}

/// CRUD over one collection. Every call is a full load (and, for
/// mutations, save) of the document.
pub struct Repository<'a, C> {
    store: &'a Store,
    _collection: PhantomData<C>,
}

impl<'a, C: Collection> Repository<'a, C> {
    pub fn new(store: &'a Store) -> Self {
        Self {
            store,
            _collection: PhantomData,
        }
    }

    /// Allocate an id, build the record from it, insert and save.
    pub fn create<F>(&self, build: F) -> Result<C::Record>
    where
        F: FnOnce(u64, &Document) -> Result<C::Record>,
    {
        self.store.mutate(|doc| {
            let id = allocate_id::<C>(doc);
            let record = build(id, doc)?;
            C::records_mut(doc).insert(id, record.clone());
            debug!("Created {} {}", C::NAME, id);
            Ok(record)
        })
    }

    pub fn read_one(&self, id: u64) -> Result<C::Record> {
        let doc = self.store.load()?;
        C::records(&doc).get(&id).cloned().ok_or(Error::NotFound)
    }

    /// All records, ascending by id.
    pub fn read_all(&self) -> Result<Vec<C::Record>> {
        self.read_where(|_| true)
    }

    /// Records matching `keep`, ascending by id.
    pub fn read_where<P>(&self, keep: P) -> Result<Vec<C::Record>>
    where
        P: Fn(&C::Record) -> bool,
    {
        let doc = self.store.load()?;
        let mut records: Vec<_> = C::records(&doc).values().filter(|r| keep(r)).cloned().collect();
        records.sort_by_key(|r| r.id());
        Ok(records)
    }

    /// Apply `change` to the record in place and save.
    pub fn update<F>(&self, id: u64, change: F) -> Result<C::Record>
    where
        F: FnOnce(&mut C::Record) -> Result<()>,
    {
        self.store.mutate(|doc| {
            let record = C::records_mut(doc).get_mut(&id).ok_or(Error::NotFound)?;
            change(record)?;
            debug!("Updated {} {}", C::NAME, id);
            Ok(record.clone())
        })
    }

    /// Remove the record if present. Deleting an absent id is a no-op.
    pub fn delete(&self, id: u64) -> Result<()> {
        self.store.mutate(|doc| {
            if C::records_mut(doc).remove(&id).is_some() {
                debug!("Deleted {} {}", C::NAME, id);
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chirp(id: u64, author_id: u64) -> Chirp {
        Chirp {
            id,
            body: format!("chirp {id}"),
            author_id,
        }
    }

    #[test]
    fn allocation_ignores_live_count() {
        let mut doc = Document::default();
        assert_eq!(allocate_id::<Chirps>(&mut doc), 1);
        doc.chirps.insert(1, chirp(1, 1));
        assert_eq!(allocate_id::<Chirps>(&mut doc), 2);
        doc.chirps.insert(2, chirp(2, 1));

        doc.chirps.remove(&1);
        assert_eq!(allocate_id::<Chirps>(&mut doc), 3);
    }

    #[test]
    fn allocation_recovers_from_missing_sequence() {
        let mut doc = Document::default();
        doc.chirps.insert(5, chirp(5, 1));
        doc.chirps.insert(9, chirp(9, 1));
        assert_eq!(allocate_id::<Chirps>(&mut doc), 10);
        assert_eq!(doc.sequences.chirps, 10);
    }

    #[test]
    fn sequences_are_per_collection() {
        let mut doc = Document::default();
        allocate_id::<Chirps>(&mut doc);
        allocate_id::<Chirps>(&mut doc);
        assert_eq!(allocate_id::<Users>(&mut doc), 1);
    }

    #[test]
    fn read_where_sorts_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("db.json")).unwrap();
        let mut doc = Document::default();
        for (id, author) in [(4, 1), (2, 2), (9, 1), (1, 1)] {
            doc.chirps.insert(id, chirp(id, author));
        }
        store.save(&doc).unwrap();

        let repo = Repository::<Chirps>::new(&store);
        let ids: Vec<u64> = repo.read_all().unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 4, 9]);

        let ids: Vec<u64> = repo
            .read_where(|c| c.author_id == 1)
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![1, 4, 9]);
    }

    #[test]
    fn update_and_delete_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("db.json")).unwrap();
        let repo = Repository::<Users>::new(&store);

        assert!(matches!(repo.read_one(1), Err(Error::NotFound)));
        assert!(matches!(repo.update(1, |_| Ok(())), Err(Error::NotFound)));
        repo.delete(1).unwrap();
    }
}

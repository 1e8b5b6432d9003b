//! # Entity Repository
//!
//! Typed reads over the record store. Writes go through [`UnitOfWork`].

mod codec;
mod unit_of_work;

pub use codec::RecordCodec;
pub use unit_of_work::UnitOfWork;

use ac_01_record_store::KeyValueStore;
use tracing::debug;

use crate::domain::entities::{Certificate, Class, Course, Record, Score, Student, Subject, Teacher};
use crate::domain::errors::AcademyError;
use crate::domain::keys::EntityKey;

/// Read view of the store for the duration of one operation.
pub struct Repository<'a> {
    store: &'a dyn KeyValueStore,
    codec: RecordCodec,
}

impl<'a> Repository<'a> {
    pub fn new(store: &'a dyn KeyValueStore, codec: RecordCodec) -> Self {
        Self { store, codec }
    }

    pub fn codec(&self) -> RecordCodec {
        self.codec
    }

    /// A fresh unit of work using this repository's codec.
    pub fn unit_of_work(&self) -> UnitOfWork {
        UnitOfWork::new(self.codec)
    }

    pub fn exists(&self, key: &EntityKey) -> Result<bool, AcademyError> {
        Ok(self.store.exists(key.as_bytes())?)
    }

    /// `Ok(None)` when the key is absent.
    pub fn find<T: Record>(&self, key: &EntityKey) -> Result<Option<T>, AcademyError> {
        match self.store.get(key.as_bytes())? {
            Some(bytes) => self.codec.decode(&bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Fails `NotFound` when the key is absent.
    pub fn load<T: Record>(&self, key: &EntityKey) -> Result<T, AcademyError> {
        self.find(key)?
            .ok_or_else(|| AcademyError::not_found(key.kind(), key.id()))
    }

    /// Every record of kind `T`, in key order.
    pub fn scan<T: Record>(&self) -> Result<Vec<T>, AcademyError> {
        let entries = self.store.prefix_scan(T::KIND.prefix().as_bytes())?;
        debug!("[ac-03] Scanned {} {} records", entries.len(), T::KIND);
        entries
            .iter()
            .map(|(_, bytes)| self.codec.decode(bytes))
            .collect()
    }

    /// Fails `AlreadyExists` when the key is taken.
    pub fn ensure_absent(&self, key: &EntityKey) -> Result<(), AcademyError> {
        if self.exists(key)? {
            return Err(AcademyError::already_exists(key.kind(), key.id()));
        }
        Ok(())
    }

    pub fn course(&self, id: &str) -> Result<Course, AcademyError> {
        self.load(&EntityKey::course(id))
    }

    pub fn subject(&self, id: &str) -> Result<Subject, AcademyError> {
        self.load(&EntityKey::subject(id))
    }

    pub fn class(&self, id: &str) -> Result<Class, AcademyError> {
        self.load(&EntityKey::class(id))
    }

    pub fn teacher(&self, username: &str) -> Result<Teacher, AcademyError> {
        self.load(&EntityKey::teacher(username))
    }

    pub fn student(&self, username: &str) -> Result<Student, AcademyError> {
        self.load(&EntityKey::student(username))
    }

    pub fn certificate(&self, id: &str) -> Result<Certificate, AcademyError> {
        self.load(&EntityKey::certificate(id))
    }

    pub fn find_score(&self, subject_id: &str, student: &str) -> Result<Option<Score>, AcademyError> {
        self.find(&EntityKey::score(subject_id, student))
    }

    /// Resolve every id of a relationship list, failing `NotFound` on the
    /// first dangling reference.
    pub fn load_all<'i, T, I>(&self, ids: I, key: fn(&str) -> EntityKey) -> Result<Vec<T>, AcademyError>
    where
        T: Record,
        I: IntoIterator<Item = &'i String>,
    {
        ids.into_iter().map(|id| self.load(&key(id))).collect()
    }
}

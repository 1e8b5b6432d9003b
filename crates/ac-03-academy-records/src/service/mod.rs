//! # Academy Records Service
//!
//! Gated entry points for every operation. Each entry point:
//!
//! 1. Checks the caller against the [`AccessPolicy`] before touching the store
//! 2. Loads every entity it will touch through a [`Repository`]
//! 3. Validates every precondition
//! 4. Stages all writes in a [`UnitOfWork`] and commits them as one batch
//!
//! A failure at steps 1-3 leaves the store untouched. The store lock is held
//! from the first read to the commit, so operations are serialized.

mod catalog;
mod config;
mod credential;
mod engine;
mod enrollment;
mod queries;

pub use catalog::ClassDetails;
pub use config::ServiceConfig;

use ac_01_record_store::KeyValueStore;
use ac_02_identity_gate::{AccessPolicy, IdentityError};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::domain::errors::AcademyError;
use crate::repository::{Repository, UnitOfWork};

/// Counters kept by the service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Mutations that committed a unit of work.
    pub mutations_committed: u64,
    /// Keys written or deleted across all commits.
    pub records_written: u64,
    /// Mutations that failed a precondition or the commit.
    pub mutations_rejected: u64,
    /// Requests refused by the identity gate.
    pub requests_denied: u64,
    /// Read-only queries answered.
    pub queries_served: u64,
}

/// The academic-records service over a key-value store.
pub struct AcademyService<S: KeyValueStore> {
    store: Mutex<S>,
    config: ServiceConfig,
    policy: AccessPolicy,
    stats: Mutex<ServiceStats>,
}

impl<S: KeyValueStore> AcademyService<S> {
    pub fn new(store: S, config: ServiceConfig) -> Self {
        let policy = AccessPolicy::new(config.identity.clone());
        Self {
            store: Mutex::new(store),
            config,
            policy,
            stats: Mutex::new(ServiceStats::default()),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    pub fn stats(&self) -> ServiceStats {
        self.stats.lock().clone()
    }

    /// Give the store back, e.g. to inspect it after a run.
    pub fn into_store(self) -> S {
        self.store.into_inner()
    }

    /// Turn an identity-gate decision into a service error, counting denials.
    fn gate<T>(&self, decision: Result<T, IdentityError>) -> Result<T, AcademyError> {
        decision.map_err(|e| {
            self.stats.lock().requests_denied += 1;
            AcademyError::from(e)
        })
    }

    /// Run a read-validate-stage step and commit what it staged.
    fn execute<F>(&self, operation: &'static str, stage: F) -> Result<(), AcademyError>
    where
        F: FnOnce(&Repository<'_>) -> Result<UnitOfWork, AcademyError>,
    {
        let mut store = self.store.lock();
        let staged = stage(&Repository::new(&*store, self.config.codec));
        let result = staged.and_then(|uow| uow.commit(&mut *store));
        drop(store);

        let mut stats = self.stats.lock();
        match result {
            Ok(written) => {
                stats.mutations_committed += 1;
                stats.records_written += written as u64;
                info!("[ac-03] {} committed ({} records)", operation, written);
                Ok(())
            }
            Err(e) => {
                stats.mutations_rejected += 1;
                warn!("[ac-03] {} rejected: {}", operation, e);
                Err(e)
            }
        }
    }

    /// Run a read-only step.
    fn read<T, F>(&self, operation: &'static str, query: F) -> Result<T, AcademyError>
    where
        F: FnOnce(&Repository<'_>) -> Result<T, AcademyError>,
    {
        let store = self.store.lock();
        let result = query(&Repository::new(&*store, self.config.codec));
        drop(store);

        self.stats.lock().queries_served += 1;
        if let Err(e) = &result {
            debug!("[ac-03] {} failed: {}", operation, e);
        }
        result
    }
}

//! One-shot invocation against the file-backed store.

use ac_01_record_store::{DatabaseLock, FileBackedKVStore};
use ac_02_identity_gate::CredentialClaims;
use ac_03_academy_records::{invoke, AcademyService, ErrorPayload};
use anyhow::{Context, Result};
use tracing::info;

use crate::config::NodeConfig;

/// Open the store, run `function` for the caller described by `credential`,
/// and release the store again.
///
/// The outer `Result` covers host failures (lock, I/O, corrupt store); the
/// inner one is the operation's own outcome.
pub fn run_once(
    config: &NodeConfig,
    credential: &[u8],
    function: &str,
    args: &[String],
) -> Result<Result<Option<Vec<u8>>, ErrorPayload>> {
    let _lock = DatabaseLock::acquire(&config.data_dir)
        .with_context(|| format!("locking {}", config.data_dir.display()))?;

    let store = FileBackedKVStore::open(config.store_path())
        .with_context(|| format!("opening {}", config.store_path().display()))?;
    let service = AcademyService::new(store, config.service.clone());

    let identity = CredentialClaims::new(credential, config.service.identity.identity_attribute.clone());
    let outcome = invoke(&service, &identity, function, args);

    let stats = service.stats();
    info!(
        "{} done: committed={} records={} rejected={} denied={}",
        function,
        stats.mutations_committed,
        stats.records_written,
        stats.mutations_rejected,
        stats.requests_denied
    );
    Ok(outcome)
}

//! URL and check persistence
//!
//! Uses the sled embedded database with three trees:
//! - `urls`: big-endian id -> bincode [`UrlEntry`]
//! - `hosts`: canonical host -> big-endian id (the uniqueness constraint)
//! - `checks`: url id ++ check id -> bincode [`CheckRecord`]
//!
//! Host uniqueness and the entry-must-exist rule for checks are enforced
//! inside multi-tree transactions, so two concurrent submissions of the same
//! new host resolve to one entry and a losing insert reports the winner's id.

use std::path::Path;

use chrono::Utc;
use sled::transaction::{ConflictableTransactionError, TransactionError};
use sled::Transactional;
use thiserror::Error;

use crate::types::{CheckRecord, SeoFields, UrlEntry, UrlSummary};

/// Errors from the embedded store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("URL entry not found")]
    NotFound,
    #[error("database error: {0}")]
    Db(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Codec(#[from] bincode::Error),
}

/// Result of inserting a host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new entry was created with this id
    Created(u64),
    /// The host already exists under this id; nothing was written
    Exists(u64),
}

/// Embedded storage for URL entries and their check history
pub struct UrlStore {
    db: sled::Db,
    urls: sled::Tree,
    /// Secondary index: canonical host -> url id
    hosts: sled::Tree,
    /// Check records keyed by (url_id, check_id), so key order is creation order
    checks: sled::Tree,
}

impl UrlStore {
    /// Open or create the store under `data_dir`
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = sled::open(data_dir.as_ref().join("pagecheck.sled"))?;
        let urls = db.open_tree("urls")?;
        let hosts = db.open_tree("hosts")?;
        let checks = db.open_tree("checks")?;
        Ok(Self {
            db,
            urls,
            hosts,
            checks,
        })
    }

    /// Insert a canonical host, or report the existing entry.
    ///
    /// The host index lookup and both writes happen in one transaction;
    /// that transaction is the uniqueness constraint.
    pub fn insert(&self, host: &str) -> Result<InsertOutcome, StoreError> {
        let id = self.db.generate_id()?;
        let entry = UrlEntry {
            id,
            host: host.trim().to_string(),
            created_at: Utc::now(),
        };
        let data = bincode::serialize(&entry)?;
        let host_key = index_key(host);
        let id_bytes = id.to_be_bytes();

        let result = (&self.hosts, &self.urls).transaction(|(hosts, urls)| {
            if let Some(existing) = hosts.get(host_key.as_bytes())? {
                return Err(ConflictableTransactionError::Abort(decode_id(&existing)));
            }
            hosts.insert(host_key.as_bytes(), &id_bytes[..])?;
            urls.insert(&id_bytes[..], data.as_slice())?;
            Ok(())
        });

        match result {
            Ok(()) => Ok(InsertOutcome::Created(id)),
            Err(TransactionError::Abort(existing_id)) => Ok(InsertOutcome::Exists(existing_id)),
            Err(TransactionError::Storage(e)) => Err(e.into()),
        }
    }

    /// Look up an entry id by canonical host
    pub fn find_by_host(&self, host: &str) -> Result<Option<u64>, StoreError> {
        Ok(self
            .hosts
            .get(index_key(host).as_bytes())?
            .map(|v| decode_id(&v)))
    }

    /// Fetch an entry by id
    pub fn get(&self, id: u64) -> Result<Option<UrlEntry>, StoreError> {
        match self.urls.get(id.to_be_bytes())? {
            Some(data) => Ok(Some(bincode::deserialize(&data)?)),
            None => Ok(None),
        }
    }

    /// Append one check record for an existing entry.
    ///
    /// The existence test and the insert share a transaction, so a check can
    /// never be half-written or attached to a missing entry.
    pub fn insert_check(
        &self,
        url_id: u64,
        status_code: u16,
        seo: SeoFields,
    ) -> Result<CheckRecord, StoreError> {
        let id = self.db.generate_id()?;
        let record = CheckRecord {
            id,
            url_id,
            status_code,
            seo,
            created_at: Utc::now(),
        };
        let data = bincode::serialize(&record)?;
        let url_key = url_id.to_be_bytes();
        let check_key = check_key(url_id, id);

        let result = (&self.urls, &self.checks).transaction(|(urls, checks)| {
            if urls.get(&url_key)?.is_none() {
                return Err(ConflictableTransactionError::Abort(()));
            }
            checks.insert(&check_key[..], data.as_slice())?;
            Ok(())
        });

        match result {
            Ok(()) => Ok(record),
            Err(TransactionError::Abort(())) => Err(StoreError::NotFound),
            Err(TransactionError::Storage(e)) => Err(e.into()),
        }
    }

    /// All checks for an entry, newest first
    pub fn list_checks(&self, url_id: u64) -> Result<Vec<CheckRecord>, StoreError> {
        let mut checks = Vec::new();
        for item in self.checks.scan_prefix(url_id.to_be_bytes()) {
            let (_, data) = item?;
            checks.push(bincode::deserialize(&data)?);
        }
        checks.reverse();
        Ok(checks)
    }

    /// All entries, newest first, each with its most recent check
    pub fn list_all(&self) -> Result<Vec<UrlSummary>, StoreError> {
        let mut summaries = Vec::new();
        for item in self.urls.iter().rev() {
            let (_, data) = item?;
            let entry: UrlEntry = bincode::deserialize(&data)?;
            let last_check = self.last_check(entry.id)?;
            summaries.push(UrlSummary { entry, last_check });
        }
        Ok(summaries)
    }

    /// Most recent check for an entry, if any
    fn last_check(&self, url_id: u64) -> Result<Option<CheckRecord>, StoreError> {
        match self.checks.scan_prefix(url_id.to_be_bytes()).rev().next() {
            Some(item) => {
                let (_, data) = item?;
                Ok(Some(bincode::deserialize(&data)?))
            }
            None => Ok(None),
        }
    }

    /// Flush pending writes to disk
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }
}

/// Host index key: trimmed and lowercased, so lookup matches the
/// case-insensitive uniqueness rule even for rows predating normalization.
fn index_key(host: &str) -> String {
    host.trim().to_lowercase()
}

fn check_key(url_id: u64, check_id: u64) -> [u8; 16] {
    let mut key = [0u8; 16];
    key[..8].copy_from_slice(&url_id.to_be_bytes());
    key[8..].copy_from_slice(&check_id.to_be_bytes());
    key
}

fn decode_id(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[..8]);
    u64::from_be_bytes(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_store() -> (TempDir, UrlStore) {
        let dir = TempDir::new().unwrap();
        let store = UrlStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_insert_and_get() {
        let (_dir, store) = open_store();
        let InsertOutcome::Created(id) = store.insert("https://example.com").unwrap() else {
            panic!("expected a new entry");
        };
        let entry = store.get(id).unwrap().unwrap();
        assert_eq!(entry.host, "https://example.com");
        assert_eq!(store.find_by_host("https://example.com").unwrap(), Some(id));
    }

    #[test]
    fn test_insert_duplicate_reports_existing_id() {
        let (_dir, store) = open_store();
        let InsertOutcome::Created(id) = store.insert("https://example.com").unwrap() else {
            panic!("expected a new entry");
        };
        assert_eq!(
            store.insert("https://example.com").unwrap(),
            InsertOutcome::Exists(id)
        );
        // Uniqueness is case-insensitive and whitespace-trimmed
        assert_eq!(
            store.insert("  HTTPS://EXAMPLE.COM ").unwrap(),
            InsertOutcome::Exists(id)
        );
        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_insert_check_requires_existing_entry() {
        let (_dir, store) = open_store();
        let err = store
            .insert_check(9999, 200, SeoFields::default())
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
        assert!(store.list_checks(9999).unwrap().is_empty());
    }

    #[test]
    fn test_list_checks_newest_first() {
        let (_dir, store) = open_store();
        let InsertOutcome::Created(id) = store.insert("https://example.com").unwrap() else {
            panic!("expected a new entry");
        };

        let first = store.insert_check(id, 200, SeoFields::default()).unwrap();
        let second = store.insert_check(id, 301, SeoFields::default()).unwrap();

        let checks = store.list_checks(id).unwrap();
        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].id, second.id);
        assert_eq!(checks[1].id, first.id);
    }

    #[test]
    fn test_list_all_includes_latest_check() {
        let (_dir, store) = open_store();
        let InsertOutcome::Created(a) = store.insert("https://a.example").unwrap() else {
            panic!("expected a new entry");
        };
        let InsertOutcome::Created(b) = store.insert("https://b.example").unwrap() else {
            panic!("expected a new entry");
        };

        store.insert_check(a, 200, SeoFields::default()).unwrap();
        let latest = store.insert_check(a, 301, SeoFields::default()).unwrap();

        let summaries = store.list_all().unwrap();
        // Newest entry first
        assert_eq!(summaries[0].entry.id, b);
        assert!(summaries[0].last_check.is_none());
        assert_eq!(summaries[1].entry.id, a);
        assert_eq!(summaries[1].last_check.as_ref().unwrap().id, latest.id);
    }

    #[test]
    fn test_checks_do_not_leak_across_entries() {
        let (_dir, store) = open_store();
        let InsertOutcome::Created(a) = store.insert("https://a.example").unwrap() else {
            panic!("expected a new entry");
        };
        let InsertOutcome::Created(b) = store.insert("https://b.example").unwrap() else {
            panic!("expected a new entry");
        };

        store.insert_check(a, 200, SeoFields::default()).unwrap();
        assert!(store.list_checks(b).unwrap().is_empty());
    }
}

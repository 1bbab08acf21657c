//! Workflow orchestration
//!
//! Ties the pipeline together: normalize on submission, then
//! lookup -> fetch -> extract -> record on a triggered check. Each workflow
//! is one synchronous unit of work per user action; failures resolve to a
//! typed outcome for the surface to report, never a crash.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::analyze::{self, FetchError, NormalizeError, PageFetcher};
use crate::config::FetchConfig;
use crate::store::{InsertOutcome, StoreError, UrlStore};
use crate::types::{CheckRecord, UrlEntry, UrlSummary};

/// Outcome of a URL submission
#[derive(Debug)]
pub enum SubmitOutcome {
    /// A new entry was created
    Created(u64),
    /// The host was already known; nothing changed
    Exists(u64),
    /// The input failed validation; nothing changed
    Invalid(NormalizeError),
}

/// Errors from a triggered check
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("URL entry not found")]
    NotFound,
    /// The fetch failed; existing history is untouched
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("storage failed: {0}")]
    Storage(#[from] StoreError),
}

/// The page analyzer service
pub struct Analyzer {
    store: Arc<UrlStore>,
    fetcher: PageFetcher,
}

impl Analyzer {
    pub fn new(store: Arc<UrlStore>, fetch_config: &FetchConfig) -> Result<Self, FetchError> {
        let fetcher = PageFetcher::new(fetch_config)?;
        Ok(Self { store, fetcher })
    }

    /// Submit a raw URL string.
    ///
    /// Validation failures and duplicates report an outcome without touching
    /// the store; only storage failures are errors.
    pub fn submit_url(&self, raw: &str) -> Result<SubmitOutcome, StoreError> {
        let host = match analyze::normalize(raw) {
            Ok(host) => host,
            Err(e) => {
                debug!("Rejected URL submission: {}", e);
                return Ok(SubmitOutcome::Invalid(e));
            }
        };

        match self.store.insert(&host)? {
            InsertOutcome::Created(id) => {
                info!("Added URL {} as entry {}", host, id);
                Ok(SubmitOutcome::Created(id))
            }
            InsertOutcome::Exists(id) => {
                info!("URL {} already exists as entry {}", host, id);
                Ok(SubmitOutcome::Exists(id))
            }
        }
    }

    /// Run one check against a stored entry.
    ///
    /// Not-found and fetch failures leave the history untouched; a check row
    /// is only written for a successful fetch.
    pub async fn run_check(&self, id: u64) -> Result<CheckRecord, CheckError> {
        let entry = self.store.get(id)?.ok_or(CheckError::NotFound)?;

        let page = match self.fetcher.fetch(&entry.host).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Check of {} failed: {}", entry.host, e);
                return Err(e.into());
            }
        };

        let seo = analyze::extract(&page.body);
        let record = self.store.insert_check(id, page.status_code, seo)?;
        info!(
            "Checked {}: status {}, check {}",
            entry.host, record.status_code, record.id
        );
        Ok(record)
    }

    /// Entry detail: the entry plus its checks, newest first
    pub fn url_detail(&self, id: u64) -> Result<Option<(UrlEntry, Vec<CheckRecord>)>, StoreError> {
        let Some(entry) = self.store.get(id)? else {
            return Ok(None);
        };
        let checks = self.store.list_checks(id)?;
        Ok(Some((entry, checks)))
    }

    /// All entries with their latest check, newest first
    pub fn list_urls(&self) -> Result<Vec<UrlSummary>, StoreError> {
        self.store.list_all()
    }
}

use crate::config::SearchConfig;
use crate::error::UnicharResult;
use crate::model::{CharacterRecord, RecordStore};
use crate::ranker::rank;
use crate::refresh::{is_stale, Refresh};
use crate::sources::table::TableSource;
use crate::sources::Source;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Outcome of checking on a background refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshStatus {
    Idle,
    Running,
    Reloaded,
    Failed,
}

/// Entry point for queries: owns the loaded store and the refresh task.
pub struct QueryService {
    store: Arc<RecordStore>,
    table: PathBuf,
    refresher: Option<Arc<dyn Refresh>>,
    pending: Option<Receiver<UnicharResult<()>>>,
    last_attempt: Option<Instant>,
}

impl QueryService {
    pub fn new(store: RecordStore, table: impl Into<PathBuf>) -> Self {
        Self {
            store: Arc::new(store),
            table: table.into(),
            refresher: None,
            pending: None,
            last_attempt: None,
        }
    }

    /// Load the table at `table`; any malformed line fails the whole load.
    pub fn open(table: impl Into<PathBuf>) -> UnicharResult<Self> {
        let table = table.into();
        let records = TableSource::new(&table).scan()?;
        Ok(Self::new(RecordStore::new(records), table))
    }

    pub fn with_refresher(mut self, refresher: Arc<dyn Refresh>) -> Self {
        self.refresher = Some(refresher);
        self
    }

    pub fn table_path(&self) -> &Path {
        &self.table
    }

    /// Snapshot of the current store, safe to search from other threads.
    pub fn store(&self) -> Arc<RecordStore> {
        Arc::clone(&self.store)
    }

    /// Parse the table again and swap it in; on failure the old store stays.
    pub fn reload(&mut self) -> UnicharResult<usize> {
        let records = TableSource::new(&self.table).scan()?;
        let count = records.len();
        self.store = Arc::new(RecordStore::new(records));
        info!("QueryService: reloaded {} records", count);
        Ok(count)
    }

    /// Answer one query: refresh bookkeeping first, then rank the current store.
    pub fn query(&mut self, raw_query: &str, config: &SearchConfig) -> Vec<CharacterRecord> {
        self.poll_refresh();
        self.maybe_start_refresh(config.update_interval);

        let query = raw_query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let store = self.store();
        let results: Vec<CharacterRecord> = rank(query, store.records(), config.min_score, config.limit())
            .into_iter()
            .cloned()
            .collect();
        debug!("QueryService: query='{}', results={}", query, results.len());
        results
    }

    pub fn is_refreshing(&self) -> bool {
        self.pending.is_some()
    }

    /// Non-blocking check on the background refresh.
    pub fn poll_refresh(&mut self) -> RefreshStatus {
        let Some(rx) = &self.pending else {
            return RefreshStatus::Idle;
        };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return RefreshStatus::Running,
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                warn!("Table refresh ended without reporting");
                return RefreshStatus::Failed;
            }
        };
        self.pending = None;
        self.finish_refresh(outcome)
    }

    /// Wait at most `bound` for a running refresh to finish.
    pub fn wait_for_refresh(&mut self, bound: Duration) -> RefreshStatus {
        let Some(rx) = &self.pending else {
            return RefreshStatus::Idle;
        };
        let outcome = match rx.recv_timeout(bound) {
            Ok(outcome) => outcome,
            Err(mpsc::RecvTimeoutError::Timeout) => return RefreshStatus::Running,
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                self.pending = None;
                warn!("Table refresh ended without reporting");
                return RefreshStatus::Failed;
            }
        };
        self.pending = None;
        self.finish_refresh(outcome)
    }

    fn finish_refresh(&mut self, outcome: UnicharResult<()>) -> RefreshStatus {
        if let Err(e) = outcome {
            warn!("Table refresh failed: {}", e);
            return RefreshStatus::Failed;
        }
        match self.reload() {
            Ok(_) => RefreshStatus::Reloaded,
            Err(e) => {
                warn!("Refreshed table could not be loaded, keeping the old one: {}", e);
                RefreshStatus::Failed
            }
        }
    }

    fn maybe_start_refresh(&mut self, update_interval: i64) {
        let Some(refresher) = &self.refresher else {
            return;
        };
        if self.pending.is_some() || !is_stale(&self.table, update_interval) {
            return;
        }
        // One attempt per interval, even when the last one failed
        let interval = Duration::from_secs(update_interval.unsigned_abs().saturating_mul(3600));
        if self.last_attempt.is_some_and(|t| t.elapsed() < interval) {
            return;
        }

        info!("Character table {:?} is older than {} hours, refreshing", self.table, update_interval);
        let (tx, rx) = mpsc::channel();
        let refresher = Arc::clone(refresher);
        let table = self.table.clone();
        thread::spawn(move || {
            // Only fails once the service is gone, nobody is left to reload
            if tx.send(refresher.refresh(&table)).is_err() {
                debug!("Table refresh finished after the query service was dropped");
            }
        });
        self.pending = Some(rx);
        self.last_attempt = Some(Instant::now());
    }
}

use std::sync::Arc;

use cached::{Cached, SizedCache};
use tracing::debug;
use tripdash_parser::{content_hash, ingest_bytes, IngestedTable, IngestionError};

use crate::config::DashboardConfig;
use crate::error::Result;
use crate::filter::StatusFilter;
use crate::views::{run_dashboard, DashboardReport};

/// Parsed uploads keyed by content hash. Least recently used entries are
/// evicted once `capacity` distinct uploads are held.
pub struct SessionCache {
    entries: SizedCache<String, Arc<IngestedTable>>,
}

impl SessionCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: SizedCache::with_size(capacity.max(1)),
        }
    }

    pub fn get_or_ingest(
        &mut self,
        bytes: &[u8],
    ) -> std::result::Result<Arc<IngestedTable>, IngestionError> {
        let key = content_hash(bytes);
        if let Some(hit) = self.entries.cache_get(&key) {
            debug!(hash = %key, "ingestion cache hit");
            return Ok(Arc::clone(hit));
        }

        debug!(hash = %key, "ingestion cache miss");
        let ingested = Arc::new(ingest_bytes(bytes)?);
        self.entries.cache_set(key, Arc::clone(&ingested));
        Ok(ingested)
    }

    pub fn len(&self) -> usize {
        self.entries.cache_size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.entries.cache_clear();
    }
}

/// One user's interaction scope. Owns its cache, so everything it parsed is
/// released when the session is dropped.
pub struct DashboardSession {
    config: DashboardConfig,
    cache: SessionCache,
}

impl DashboardSession {
    pub fn new(config: DashboardConfig) -> Self {
        let cache = SessionCache::with_capacity(config.cache_capacity);
        Self { config, cache }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn cache(&self) -> &SessionCache {
        &self.cache
    }

    pub fn load(&mut self, bytes: &[u8]) -> Result<Arc<IngestedTable>> {
        Ok(self.cache.get_or_ingest(bytes)?)
    }

    /// Ingests (or reuses) the upload, applies `filter` and runs every view.
    pub fn report(&mut self, bytes: &[u8], filter: &StatusFilter) -> Result<DashboardReport> {
        let ingested = self.load(bytes)?;
        let table = filter.apply(&ingested.table)?;
        run_dashboard(&table, &self.config)
    }
}

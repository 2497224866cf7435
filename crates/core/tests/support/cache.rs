use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use recess_core::{AnalysisCache, AnalysisComputation, AnalysisKey};
use recess_domain::{AnalysisResult, Result as DomainResult};

/// In-memory mock for `AnalysisCache`.
///
/// Holds the map lock across the computation, which serializes misses
/// globally; coarse, but it delivers the single-flight guarantee the
/// tests assert. Entries never expire on their own; tests invalidate
/// explicitly when they want a recompute.
#[derive(Default)]
pub struct InMemoryAnalysisCache {
    entries: tokio::sync::Mutex<HashMap<AnalysisKey, Arc<AnalysisResult>>>,
}

impl InMemoryAnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

#[async_trait]
impl AnalysisCache for InMemoryAnalysisCache {
    async fn get_or_compute(
        &self,
        key: AnalysisKey,
        compute: AnalysisComputation,
    ) -> DomainResult<Arc<AnalysisResult>> {
        let mut entries = self.entries.lock().await;
        if let Some(hit) = entries.get(&key) {
            return Ok(Arc::clone(hit));
        }
        let result = compute.await?;
        entries.insert(key, Arc::clone(&result));
        Ok(result)
    }

    async fn invalidate_user(&self, user_id: &str) -> DomainResult<()> {
        self.entries.lock().await.retain(|key, _| key.user_id != user_id);
        Ok(())
    }
}

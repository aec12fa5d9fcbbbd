// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Context collaborators
//!
//! Read-only lookups that enrich the text of a coaching cycle: the historical
//! aggregate store, the insight store and similarity search over past runs.
//!
//! All collaborators are queried concurrently. Each call is bounded by its
//! own timeout, and any failure, timeout or missing collaborator contributes
//! an empty value. A gather never returns an error.

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;

use crate::config::ContextConfig;
use crate::logging::AppLogger;
use crate::models::HistoricalAggregate;

/// Errors a collaborator may report
#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    #[error("Collaborator unavailable: {0}")]
    Unavailable(String),

    #[error("Collaborator timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid collaborator response: {0}")]
    InvalidResponse(String),
}

/// Aggregate statistics over a user's past runs
#[async_trait]
pub trait HistoricalStore: Send + Sync {
    async fn run_summary(&self, user_id: &str) -> Result<Option<HistoricalAggregate>, CollaboratorError>;
}

/// Free-text coaching insights stored for a user
#[async_trait]
pub trait InsightStore: Send + Sync {
    async fn search_insights(
        &self,
        user_id: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<String>, CollaboratorError>;
}

/// Similarity search over descriptions of past run situations
#[async_trait]
pub trait SimilaritySearch: Send + Sync {
    async fn similar_situations(
        &self,
        user_id: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<String>, CollaboratorError>;
}

/// What the collaborators contributed to one cycle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleContext {
    pub history: Option<HistoricalAggregate>,
    pub insights: Vec<String>,
    pub similar_situations: Vec<String>,
}

impl CycleContext {
    pub fn is_empty(&self) -> bool {
        self.history.is_none() && self.insights.is_empty() && self.similar_situations.is_empty()
    }
}

/// Fans out to the configured collaborators under a per-call timeout
#[derive(Clone)]
pub struct ContextGatherer {
    history: Option<Arc<dyn HistoricalStore>>,
    insights: Option<Arc<dyn InsightStore>>,
    similarity: Option<Arc<dyn SimilaritySearch>>,
    collaborator_timeout: Duration,
    insight_limit: usize,
    similar_run_limit: usize,
}

impl ContextGatherer {
    /// Gatherer with no collaborators; every gather yields an empty context
    pub fn new(config: &ContextConfig) -> Self {
        Self {
            history: None,
            insights: None,
            similarity: None,
            collaborator_timeout: config.collaborator_timeout(),
            insight_limit: config.insight_limit,
            similar_run_limit: config.similar_run_limit,
        }
    }

    pub fn with_history(mut self, store: Arc<dyn HistoricalStore>) -> Self {
        self.history = Some(store);
        self
    }

    pub fn with_insights(mut self, store: Arc<dyn InsightStore>) -> Self {
        self.insights = Some(store);
        self
    }

    pub fn with_similarity(mut self, search: Arc<dyn SimilaritySearch>) -> Self {
        self.similarity = Some(search);
        self
    }

    pub fn collaborator_timeout(&self) -> Duration {
        self.collaborator_timeout
    }

    /// Query every configured collaborator concurrently
    pub async fn gather(&self, user_id: &str, query: &str) -> CycleContext {
        let history = async {
            match &self.history {
                Some(store) => self
                    .bounded("historical_store", store.run_summary(user_id))
                    .await
                    .flatten(),
                None => None,
            }
        };
        let insights = async {
            match &self.insights {
                Some(store) => self
                    .bounded(
                        "insight_store",
                        store.search_insights(user_id, query, self.insight_limit),
                    )
                    .await
                    .unwrap_or_default(),
                None => Vec::new(),
            }
        };
        let similar = async {
            match &self.similarity {
                Some(search) => self
                    .bounded(
                        "similarity_search",
                        search.similar_situations(user_id, query, self.similar_run_limit),
                    )
                    .await
                    .unwrap_or_default(),
                None => Vec::new(),
            }
        };

        let (history, mut insights, mut similar_situations) = tokio::join!(history, insights, similar);
        insights.truncate(self.insight_limit);
        similar_situations.truncate(self.similar_run_limit);

        CycleContext {
            history,
            insights,
            similar_situations,
        }
    }

    /// Run one collaborator call under the timeout; failures are logged and become `None`
    async fn bounded<F, T>(&self, name: &str, call: F) -> Option<T>
    where
        F: Future<Output = Result<T, CollaboratorError>>,
    {
        let started = Instant::now();
        let outcome = match timeout(self.collaborator_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(CollaboratorError::Timeout(self.collaborator_timeout)),
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(value) => {
                AppLogger::log_collaborator_event(name, true, elapsed_ms, None);
                Some(value)
            }
            Err(e) => {
                AppLogger::log_collaborator_event(name, false, elapsed_ms, Some(&e.to_string()));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedHistory;

    #[async_trait]
    impl HistoricalStore for FixedHistory {
        async fn run_summary(&self, _user_id: &str) -> Result<Option<HistoricalAggregate>, CollaboratorError> {
            Ok(Some(HistoricalAggregate {
                total_runs: 4,
                average_distance_km: 5.0,
                average_pace_min_per_km: 6.0,
                best_pace_min_per_km: 5.5,
            }))
        }
    }

    struct SlowInsights;

    #[async_trait]
    impl InsightStore for SlowInsights {
        async fn search_insights(
            &self,
            _user_id: &str,
            _query: &str,
            _limit: usize,
        ) -> Result<Vec<String>, CollaboratorError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(vec!["too late".to_string()])
        }
    }

    struct BrokenSearch;

    #[async_trait]
    impl SimilaritySearch for BrokenSearch {
        async fn similar_situations(
            &self,
            _user_id: &str,
            _query: &str,
            _limit: usize,
        ) -> Result<Vec<String>, CollaboratorError> {
            Err(CollaboratorError::Unavailable("index offline".to_string()))
        }
    }

    struct ChattySearch;

    #[async_trait]
    impl SimilaritySearch for ChattySearch {
        async fn similar_situations(
            &self,
            _user_id: &str,
            _query: &str,
            _limit: usize,
        ) -> Result<Vec<String>, CollaboratorError> {
            Ok((1..=10).map(|i| format!("run {i}")).collect())
        }
    }

    fn config(timeout_ms: u64) -> ContextConfig {
        ContextConfig {
            collaborator_timeout_ms: timeout_ms,
            ..ContextConfig::default()
        }
    }

    #[tokio::test]
    async fn test_no_collaborators_is_empty() {
        let context = ContextGatherer::new(&config(100)).gather("u1", "query").await;
        assert!(context.is_empty());
    }

    #[tokio::test]
    async fn test_slow_and_failing_collaborators_degrade() {
        let gatherer = ContextGatherer::new(&config(50))
            .with_history(Arc::new(FixedHistory))
            .with_insights(Arc::new(SlowInsights))
            .with_similarity(Arc::new(BrokenSearch));

        let started = Instant::now();
        let context = gatherer.gather("u1", "pace declining").await;

        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(context.history.map(|h| h.total_runs), Some(4));
        assert!(context.insights.is_empty());
        assert!(context.similar_situations.is_empty());
    }

    #[tokio::test]
    async fn test_results_are_truncated_to_limit() {
        let gatherer = ContextGatherer::new(&config(100)).with_similarity(Arc::new(ChattySearch));
        let context = gatherer.gather("u1", "query").await;
        assert_eq!(context.similar_situations.len(), 3);
        assert_eq!(context.similar_situations[0], "run 1");
    }

    #[test]
    fn test_error_messages() {
        let err = CollaboratorError::Timeout(Duration::from_millis(250));
        assert_eq!(err.to_string(), "Collaborator timed out after 250ms");
        let err = CollaboratorError::InvalidResponse("missing field".to_string());
        assert!(err.to_string().contains("missing field"));
    }
}

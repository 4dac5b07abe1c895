//! Faceted counts over a filtered record population.

use crate::config::SearchConfig;
use crate::error::Result;
use crate::models::record::LogLevel;
use crate::query::QueryAst;
use crate::store::{FacetBucket, FacetDimension, LogStore, TimelineBucket};
use crate::translate::translate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use strum::IntoEnumIterator;

/// Grouped counts along the three fixed facet dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetResult {
    /// Top services by count
    pub services: Vec<FacetBucket>,

    /// Full distribution over the level set; levels with no matches are
    /// reported with a zero count
    pub levels: Vec<FacetBucket>,

    /// Hourly counts, newest bucket first
    pub timeline: Vec<TimelineBucket>,
}

/// Computes facets by restricting the population with the same translation
/// step the executor uses, then grouping through the store port.
pub struct FacetEngine {
    store: Arc<dyn LogStore>,
    service_limit: usize,
    timeline_buckets: usize,
}

impl FacetEngine {
    pub fn new(store: Arc<dyn LogStore>, config: &SearchConfig) -> Self {
        Self {
            store,
            service_limit: config.facet_service_limit,
            timeline_buckets: config.timeline_buckets,
        }
    }

    /// Compute all three facet dimensions for an already-parsed query.
    pub async fn compute(&self, ast: &QueryAst) -> Result<FacetResult> {
        let filter = translate(ast)?;

        let mut services = self
            .store
            .facet_counts(&filter, FacetDimension::Service)
            .await?;
        services.truncate(self.service_limit);

        let mut levels = self
            .store
            .facet_counts(&filter, FacetDimension::Level)
            .await?;
        let observed: HashSet<String> = levels.iter().map(|b| b.value.clone()).collect();
        for level in LogLevel::iter() {
            let name = level.to_string();
            if !observed.contains(&name) {
                levels.push(FacetBucket {
                    value: name,
                    count: 0,
                });
            }
        }

        let timeline = self
            .store
            .hourly_counts(&filter, self.timeline_buckets)
            .await?;

        Ok(FacetResult {
            services,
            levels,
            timeline,
        })
    }
}

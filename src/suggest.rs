//! Query completion proposals.
//!
//! Best-effort by contract: a failed value lookup degrades to no
//! suggestions, never to an error.

use crate::store::LogStore;
use crate::translate::FieldRef;
use std::sync::Arc;

/// Field-prefix completions offered before a comparator is typed.
const FIELD_COMPLETIONS: [&str; 5] = ["level:", "service:", "user_id:", "timestamp:", "message:"];

/// Proposes completions from known field names and a bounded sample of
/// observed field values.
pub struct SuggestionEngine {
    store: Arc<dyn LogStore>,
    limit: usize,
}

impl SuggestionEngine {
    pub fn new(store: Arc<dyn LogStore>, limit: usize) -> Self {
        Self { store, limit }
    }

    /// Propose completions for a partial query.
    pub async fn suggest(&self, partial: &str) -> Vec<String> {
        let partial = partial.trim();

        if !partial.contains(':') {
            let needle = partial.to_lowercase();
            return FIELD_COMPLETIONS
                .iter()
                .filter(|field| field.starts_with(&needle))
                .map(|field| field.to_string())
                .take(self.limit)
                .collect();
        }

        let field = partial.split(':').next().unwrap_or("");
        let field_ref = match field {
            "level" => FieldRef::Level,
            "service" => FieldRef::Service,
            // Values of the remaining fields are unbounded; no sample kept.
            _ => return Vec::new(),
        };

        match self.store.distinct_values(&field_ref, self.limit).await {
            Ok(values) => values
                .into_iter()
                .map(|value| format!("{field}:{value}"))
                .take(self.limit)
                .collect(),
            Err(err) => {
                tracing::warn!(error = %err, field, "suggestion value lookup failed");
                Vec::new()
            }
        }
    }
}

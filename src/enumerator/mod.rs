//! Document enumeration over a hierarchical object namespace
//!
//! Discovers every object whose key ends with a target suffix, either by
//! following the store's continuation tokens over a flat listing or by
//! recursing concurrently into each delimited sub-prefix. Both strategies
//! return the same sorted, de-duplicated set.

pub mod descriptor;

use futures::future::{BoxFuture, FutureExt, try_join_all};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::fetcher::{RetryConfig, retry_with_backoff};
use crate::store::{ListPage, ListRequest, ObjectStore, StoreResult};

pub use descriptor::{DocumentDescriptor, has_suffix};

/// Separator between prefix levels in the hierarchical walk
const PREFIX_DELIMITER: &str = "/";

/// How the namespace is walked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStrategy {
    /// Paginate one undelimited listing until the continuation token runs out
    #[default]
    Flat,
    /// One delimited listing per prefix level, sub-prefixes walked concurrently
    Hierarchical,
}

impl std::str::FromStr for ListingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "flat" => Ok(Self::Flat),
            "hierarchical" | "recursive" => Ok(Self::Hierarchical),
            other => Err(format!("unknown listing strategy '{other}'")),
        }
    }
}

pub struct Enumerator<S> {
    store: Arc<S>,
    strategy: ListingStrategy,
    retry: RetryConfig,
}

impl<S: ObjectStore> Enumerator<S> {
    #[must_use]
    pub fn new(store: Arc<S>, strategy: ListingStrategy, retry: RetryConfig) -> Self {
        Self {
            store,
            strategy,
            retry,
        }
    }

    /// Every document under `root` whose key ends with `suffix` (case-insensitive)
    ///
    /// # Errors
    ///
    /// Propagates the first list failure that survives retry.
    pub async fn list_matching(
        &self,
        root: &str,
        suffix: &str,
    ) -> StoreResult<Vec<DocumentDescriptor>> {
        let started = Instant::now();

        let mut documents = match self.strategy {
            ListingStrategy::Flat => self.list_flat(root, suffix).await?,
            ListingStrategy::Hierarchical => {
                self.list_hierarchical(root.to_string(), suffix).await?
            }
        };

        documents.sort();
        documents.dedup();

        info!(
            "Enumerated {} '{}' documents under '{}' ({:?}, {:?})",
            documents.len(),
            suffix,
            root,
            self.strategy,
            started.elapsed()
        );

        Ok(documents)
    }

    async fn list_page(&self, request: ListRequest) -> StoreResult<ListPage> {
        retry_with_backoff(self.retry, &request.prefix, || {
            self.store.list(request.clone())
        })
        .await
    }

    async fn list_flat(&self, root: &str, suffix: &str) -> StoreResult<Vec<DocumentDescriptor>> {
        let mut documents = Vec::new();
        let mut token = None;
        let mut pages = 0usize;

        loop {
            let page = self
                .list_page(ListRequest::flat(root).with_token(token))
                .await?;
            pages += 1;

            documents.extend(
                page.entries
                    .into_iter()
                    .filter(|entry| has_suffix(&entry.key, suffix))
                    .map(|entry| DocumentDescriptor::new(entry.key)),
            );

            match page.next_token {
                Some(next) => token = Some(next),
                None => break,
            }
        }

        debug!("Flat listing of '{root}' took {pages} pages");
        Ok(documents)
    }

    /// One level of the delimited walk; recursion fans out per sub-prefix
    fn list_hierarchical<'a>(
        &'a self,
        prefix: String,
        suffix: &'a str,
    ) -> BoxFuture<'a, StoreResult<Vec<DocumentDescriptor>>> {
        async move {
            let mut documents = Vec::new();
            let mut sub_prefixes = Vec::new();
            let mut token = None;

            loop {
                let request =
                    ListRequest::delimited(prefix.clone(), PREFIX_DELIMITER).with_token(token);
                let page = self.list_page(request).await?;

                documents.extend(
                    page.entries
                        .into_iter()
                        .filter(|entry| has_suffix(&entry.key, suffix))
                        .map(|entry| DocumentDescriptor::new(entry.key)),
                );
                sub_prefixes.extend(page.sub_prefixes);

                match page.next_token {
                    Some(next) => token = Some(next),
                    None => break,
                }
            }

            // A store echoing the current prefix back would recurse forever
            sub_prefixes.retain(|sub| {
                let descends = sub.len() > prefix.len() && sub.starts_with(&prefix);
                if !descends {
                    warn!("Ignoring sub-prefix '{sub}' that does not descend from '{prefix}'");
                }
                descends
            });

            debug!(
                "Prefix '{}': {} documents, {} sub-prefixes",
                prefix,
                documents.len(),
                sub_prefixes.len()
            );

            let nested = try_join_all(
                sub_prefixes
                    .into_iter()
                    .map(|sub| self.list_hierarchical(sub, suffix)),
            )
            .await?;

            documents.extend(nested.into_iter().flatten());
            Ok(documents)
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryObjectStore;

    #[test]
    fn strategy_parses_from_cli_names() {
        assert_eq!("flat".parse::<ListingStrategy>(), Ok(ListingStrategy::Flat));
        assert_eq!(
            "Hierarchical".parse::<ListingStrategy>(),
            Ok(ListingStrategy::Hierarchical)
        );
        assert!("tree".parse::<ListingStrategy>().is_err());
    }

    #[tokio::test]
    async fn root_prefix_limits_the_walk() {
        let store = Arc::new(MemoryObjectStore::new());
        store.put("show-a/e1.srt", "x");
        store.put("show-b/e1.srt", "x");

        for strategy in [ListingStrategy::Flat, ListingStrategy::Hierarchical] {
            let enumerator = Enumerator::new(Arc::clone(&store), strategy, RetryConfig::default());
            let found = enumerator.list_matching("show-a/", ".srt").await.unwrap();
            assert_eq!(found, vec![DocumentDescriptor::new("show-a/e1.srt")]);
        }
    }
}

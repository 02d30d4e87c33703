//! Object-store capability consumed by the search core
//!
//! The core never talks to a cloud SDK directly. It sees a store through the
//! [`ObjectStore`] trait: a paginated, optionally delimited `list` and a
//! `get_object` by key. Two implementations ship with the crate: an
//! in-memory store used by tests and demos, and a local-filesystem store
//! where directories act as prefixes.

pub mod errors;
pub mod local;
pub mod memory;
pub mod types;

use bytes::Bytes;
use std::future::Future;

pub use errors::{StoreError, StoreResult};
pub use local::LocalObjectStore;
pub use memory::MemoryObjectStore;
pub use types::{ListPage, ListRequest, ObjectEntry};

/// Remote object namespace holding the searchable documents
///
/// Implementations must be cheap to share behind an `Arc` and safe to call
/// concurrently from many tasks.
pub trait ObjectStore: Send + Sync + 'static {
    /// List one page of objects under `request.prefix`
    fn list(&self, request: ListRequest) -> impl Future<Output = StoreResult<ListPage>> + Send;

    /// Fetch the full body of one object
    fn get_object(&self, key: &str) -> impl Future<Output = StoreResult<Bytes>> + Send;
}

/// One row of a listing before it is cut into pages
#[derive(Debug, Clone)]
pub(crate) enum Listed {
    Entry(ObjectEntry),
    Prefix(String),
}

/// Cut a fully materialised listing into the page addressed by `token`
///
/// Tokens are opaque to callers; here they encode the offset of the next row.
pub(crate) fn paginate(
    items: Vec<Listed>,
    token: Option<&str>,
    page_size: usize,
) -> StoreResult<ListPage> {
    let start = match token {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| StoreError::Permanent(format!("invalid continuation token '{raw}'")))?,
        None => 0,
    };

    let page_size = page_size.max(1);
    let end = start.saturating_add(page_size).min(items.len());
    let next_token = (end < items.len()).then(|| end.to_string());

    let mut page = ListPage {
        next_token,
        ..ListPage::default()
    };

    for item in items.into_iter().skip(start).take(end.saturating_sub(start)) {
        match item {
            Listed::Entry(entry) => page.entries.push(entry),
            Listed::Prefix(prefix) => page.sub_prefixes.push(prefix),
        }
    }

    Ok(page)
}

/// Split `key` against a prefix/delimiter pair
///
/// Returns `Some(sub_prefix)` when the key lives below a further delimiter,
/// `None` when it belongs to the current level.
pub(crate) fn roll_up(key: &str, prefix: &str, delimiter: Option<&str>) -> Option<String> {
    let delimiter = delimiter.filter(|d| !d.is_empty())?;
    let rest = key.get(prefix.len()..)?;
    rest.find(delimiter)
        .map(|idx| format!("{prefix}{}", &rest[..idx + delimiter.len()]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(n: usize) -> Vec<Listed> {
        (0..n)
            .map(|i| {
                Listed::Entry(ObjectEntry {
                    key: format!("k{i}"),
                    size: 1,
                })
            })
            .collect()
    }

    #[test]
    fn paginate_walks_all_rows_once() {
        let first = paginate(entries(5), None, 2).unwrap();
        assert_eq!(first.entries.len(), 2);
        assert_eq!(first.next_token.as_deref(), Some("2"));

        let second = paginate(entries(5), first.next_token.as_deref(), 2).unwrap();
        assert_eq!(second.entries[0].key, "k2");

        let last = paginate(entries(5), Some("4"), 2).unwrap();
        assert_eq!(last.entries.len(), 1);
        assert!(last.next_token.is_none());
    }

    #[test]
    fn paginate_rejects_garbage_token() {
        let err = paginate(entries(1), Some("abc"), 2).unwrap_err();
        assert!(matches!(err, StoreError::Permanent(_)));
    }

    #[test]
    fn roll_up_groups_by_next_delimiter() {
        assert_eq!(
            roll_up("s1/e1/a.srt", "s1/", Some("/")),
            Some("s1/e1/".to_string())
        );
        assert_eq!(roll_up("s1/a.srt", "s1/", Some("/")), None);
        assert_eq!(roll_up("s1/e1/a.srt", "s1/", None), None);
    }
}

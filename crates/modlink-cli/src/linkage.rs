//! Linkage builder
//!
//! Persists a [`FragmentChain`] as a singly-linked list. Rows are inserted
//! tail first so the successor's generated id is already known when each
//! fragment is written; no row is ever updated.

use crate::error::Result;
use crate::store::ModuleStore;
use modlink_common::FragmentChain;

/// Insert every fragment of `chain` for `module_id`.
///
/// Returns the generated ids in chain order, so the first id is the head.
/// An empty chain performs no inserts.
#[tracing::instrument(skip(store, chain), fields(fragments = chain.len()))]
pub async fn link_fragments<S>(store: &mut S, module_id: i32, chain: &FragmentChain) -> Result<Vec<i32>>
where
    S: ModuleStore + ?Sized,
{
    let mut ids = Vec::with_capacity(chain.len());
    let mut successor_id: Option<i32> = None;

    for fragment in chain.iter().rev() {
        let id = store
            .insert_fragment(module_id, &fragment.content, successor_id)
            .await?;
        tracing::debug!(id, ?successor_id, name = %fragment.name, "Fragment persisted");
        ids.push(id);
        successor_id = Some(id);
    }

    ids.reverse();
    Ok(ids)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::UploadError;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use modlink_common::{Fragment, Module};

    /// Records insert calls and fails after `fail_after` fragment inserts
    #[derive(Default)]
    struct CountingStore {
        calls: Vec<(i32, String, Option<i32>)>,
        fail_after: Option<usize>,
    }

    #[async_trait]
    impl ModuleStore for CountingStore {
        async fn insert_module(&mut self, _module: &Module) -> Result<i32> {
            Ok(1)
        }

        async fn insert_fragment(
            &mut self,
            module_id: i32,
            content: &str,
            successor_id: Option<i32>,
        ) -> Result<i32> {
            if self.fail_after == Some(self.calls.len()) {
                return Err(UploadError::Database(sqlx::Error::RowNotFound));
            }
            self.calls.push((module_id, content.to_string(), successor_id));
            Ok(100 + self.calls.len() as i32)
        }
    }

    fn abc() -> FragmentChain {
        FragmentChain::from_unordered(vec![
            Fragment::new("3", "c.html"),
            Fragment::new("1", "a.html"),
            Fragment::new("2", "b.html"),
        ])
    }

    #[tokio::test]
    async fn test_empty_chain_performs_no_inserts() {
        let mut store = CountingStore::default();
        let ids = link_fragments(&mut store, 7, &FragmentChain::default())
            .await
            .unwrap();

        assert!(ids.is_empty());
        assert!(store.calls.is_empty());
    }

    #[tokio::test]
    async fn test_inserts_in_reverse_order() {
        let mut store = CountingStore::default();
        let ids = link_fragments(&mut store, 7, &abc()).await.unwrap();

        assert_eq!(
            store.calls,
            vec![
                (7, "3".to_string(), None),
                (7, "2".to_string(), Some(101)),
                (7, "1".to_string(), Some(102)),
            ]
        );
        assert_eq!(ids, vec![103, 102, 101]);
    }

    #[tokio::test]
    async fn test_chain_from_head_visits_every_fragment_once() {
        let mut store = MemoryStore::new();
        let chain = FragmentChain::from_unordered(
            (0..25)
                .rev()
                .map(|i| Fragment::new(i.to_string(), format!("{:02}.html", i)))
                .collect(),
        );

        let ids = link_fragments(&mut store, 1, &chain).await.unwrap();
        let walked = store.chain(ids[0]);

        assert_eq!(walked.len(), 25);
        let contents: Vec<String> = walked.iter().map(|f| f.content.clone()).collect();
        let expected: Vec<String> = (0..25).map(|i| i.to_string()).collect();
        assert_eq!(contents, expected);

        let tails = store.fragments().iter().filter(|f| f.successor_id.is_none()).count();
        assert_eq!(tails, 1);
        assert_eq!(walked.last().unwrap().successor_id, None);
    }

    #[tokio::test]
    async fn test_failure_stops_immediately() {
        let mut store = CountingStore {
            fail_after: Some(1),
            ..Default::default()
        };
        let err = link_fragments(&mut store, 7, &abc()).await.unwrap_err();

        assert!(matches!(err, UploadError::Database(_)));
        assert_eq!(store.calls.len(), 1);
    }
}

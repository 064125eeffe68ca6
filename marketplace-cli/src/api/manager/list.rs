//! List state manager
//!
//! One manager backs one list screen. It turns descriptors into requests,
//! runs them against the backend, substitutes bundled data for catalog
//! screens when the backend fails, and publishes the outcome as an immutable
//! [`ListSnapshot`]. Only the most recently issued query may change the
//! snapshot: issuing a new query drops the in-flight fetch of the previous
//! one, and a result that still arrives late is discarded.

use arc_swap::ArcSwap;
use log::{debug, error, info, warn};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;

use super::state::{DataOrigin, ListSnapshot, ListStatus};
use crate::api::client::RemoteDataSource;
use crate::api::error::ApiError;
use crate::api::fallback::{FallbackResolver, LocalQuery};
use crate::api::models::{Credential, ListEndpoint};
use crate::api::query::{QueryDescriptor, ResultPage, SortFields};

pub struct ListStateManager {
    source: Arc<dyn RemoteDataSource>,
    fallback: FallbackResolver,
    endpoint: ListEndpoint,
    credential: Credential,
    sort_fields: SortFields,
    generation: watch::Sender<u64>,
    state: ArcSwap<ListSnapshot>,
    // Serializes issuing a query with publishing a result
    commit: Mutex<()>,
}

impl ListStateManager {
    pub fn new(
        source: Arc<dyn RemoteDataSource>,
        endpoint: ListEndpoint,
        credential: Credential,
    ) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            source,
            fallback: FallbackResolver::new(),
            endpoint,
            credential,
            sort_fields: SortFields::default(),
            generation,
            state: ArcSwap::from_pointee(ListSnapshot::default()),
            commit: Mutex::new(()),
        }
    }

    /// Declare the sort fields this screen supports
    pub fn with_sort_fields(mut self, sort_fields: SortFields) -> Self {
        self.sort_fields = sort_fields;
        self
    }

    pub fn endpoint(&self) -> &ListEndpoint {
        &self.endpoint
    }

    /// Current state of the list
    pub fn snapshot(&self) -> Arc<ListSnapshot> {
        self.state.load_full()
    }

    /// Fetch one page for `descriptor`
    ///
    /// Catalog screens never fail here: a backend failure yields the bundled
    /// dataset (filtered, sorted and paged locally) and the failure is kept
    /// on the snapshot. Admin screens return the failure and keep showing
    /// the previous page. If a newer query is issued before this one
    /// settles, this returns [`ApiError::Superseded`] and leaves the
    /// snapshot alone.
    pub async fn query(&self, descriptor: QueryDescriptor) -> Result<ResultPage, ApiError> {
        let generation = self.issue(&descriptor);
        let request = descriptor.build_checked(&self.sort_fields);
        let mut newer = self.generation.subscribe();

        debug!(
            "{} query #{}: {}",
            self.endpoint.path,
            generation,
            request.to_query_string()
        );

        let fetch = self.source.fetch_page(
            &self.endpoint.path,
            &request,
            &self.credential,
            self.endpoint.timeout,
        );

        let result = tokio::select! {
            result = fetch => result,
            _ = newer.wait_for(|current| *current != generation) => {
                debug!("{} query #{} abandoned for a newer one", self.endpoint.path, generation);
                return Err(ApiError::Superseded);
            }
        };

        self.settle(generation, &descriptor, result)
    }

    /// Re-issue the most recent descriptor (or the default one)
    pub async fn refetch(&self) -> Result<ResultPage, ApiError> {
        let descriptor = self
            .state
            .load()
            .last_descriptor
            .clone()
            .unwrap_or_default();
        self.query(descriptor).await
    }

    fn issue(&self, descriptor: &QueryDescriptor) -> u64 {
        let _guard = self.commit.lock().unwrap_or_else(PoisonError::into_inner);

        self.generation.send_modify(|current| *current += 1);
        let generation = *self.generation.borrow();

        let previous = self.state.load_full();
        self.state.store(Arc::new(ListSnapshot {
            status: ListStatus::Loading,
            data: previous.data.clone(),
            error: None,
            origin: previous.origin,
            last_descriptor: Some(descriptor.clone()),
            generation,
        }));
        generation
    }

    fn settle(
        &self,
        generation: u64,
        descriptor: &QueryDescriptor,
        result: Result<ResultPage, ApiError>,
    ) -> Result<ResultPage, ApiError> {
        let _guard = self.commit.lock().unwrap_or_else(PoisonError::into_inner);

        if *self.generation.borrow() != generation {
            debug!(
                "{} query #{} finished after a newer one was issued, discarding",
                self.endpoint.path, generation
            );
            return Err(ApiError::Superseded);
        }

        let previous = self.state.load_full();
        let publish = |data: Option<ResultPage>, error: Option<ApiError>, origin| {
            self.state.store(Arc::new(ListSnapshot {
                status: ListStatus::Ready,
                data,
                error,
                origin,
                last_descriptor: previous.last_descriptor.clone(),
                generation,
            }));
        };

        match result {
            Ok(page) => {
                let page = page.normalize(descriptor.page(), descriptor.page_size());
                info!(
                    "{}: page {}/{} ({} of {} records)",
                    self.endpoint.path,
                    page.page,
                    page.total_pages,
                    page.items.len(),
                    page.total_records
                );
                publish(Some(page.clone()), None, Some(DataOrigin::Remote));
                Ok(page)
            }
            Err(err) => match self.endpoint.fallback {
                Some(category) => {
                    warn!(
                        "{} unavailable, serving bundled {} data: {}",
                        self.endpoint.path, category, err
                    );
                    let page = LocalQuery::new(descriptor).apply(self.fallback.records(category));
                    publish(Some(page.clone()), Some(err), Some(DataOrigin::Fallback));
                    Ok(page)
                }
                None => {
                    error!("{} query failed: {}", self.endpoint.path, err);
                    publish(previous.data.clone(), Some(err.clone()), previous.origin);
                    Err(err)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::{ParseError, TransportError};
    use crate::api::fallback::FallbackCategory;
    use crate::api::query::QueryBuilder;
    use crate::api::test_support::FakeSource;
    use serde_json::{Value, json};
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn orders(source: Arc<FakeSource>) -> ListStateManager {
        ListStateManager::new(
            source,
            ListEndpoint::for_entity("order", Duration::from_secs(5)),
            Credential::bearer("admin-token"),
        )
        .with_sort_fields(SortFields::orders())
    }

    fn products(source: Arc<FakeSource>) -> ListStateManager {
        ListStateManager::new(
            source,
            ListEndpoint::for_entity("product", Duration::from_secs(5)),
            Credential::bearer("shop-token"),
        )
    }

    fn page(n: u32) -> QueryDescriptor {
        QueryBuilder::new().page(n).page_size(5).build()
    }

    #[tokio::test]
    async fn test_state_moves_from_idle_to_ready() {
        let source = Arc::new(FakeSource::orders(12));
        let manager = orders(source.clone());
        assert_eq!(manager.snapshot().status, ListStatus::Idle);

        let result = manager.query(page(1)).await.unwrap();
        assert_eq!(result.items.len(), 5);
        assert_eq!(result.total_records, 12);
        assert_eq!(result.total_pages, 3);

        let snapshot = manager.snapshot();
        assert!(!snapshot.is_loading());
        assert_eq!(snapshot.origin, Some(DataOrigin::Remote));
        assert!(snapshot.error.is_none());
        assert_eq!(snapshot.data.as_ref(), Some(&result));
        assert_eq!(snapshot.last_descriptor, Some(page(1)));
        assert_eq!(
            source.last_credential.lock().unwrap().as_deref(),
            Some("admin-token")
        );
    }

    #[tokio::test]
    async fn test_pagination_invariant_holds() {
        let source = Arc::new(FakeSource::orders(23));
        let manager = orders(source);

        for n in 1..=6 {
            let result = manager.query(page(n)).await.unwrap();
            assert!(result.items.len() <= 5);
            assert!(result.items.len() as u64 <= result.total_records);
        }
    }

    #[tokio::test]
    async fn test_last_issued_query_wins() {
        let source = Arc::new(FakeSource::orders(12));
        source.delay_page(1, Duration::from_millis(200));
        source.delay_page(2, Duration::from_millis(20));
        let manager = orders(source);

        let (first, second) = tokio::join!(manager.query(page(1)), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            assert!(manager.snapshot().is_loading());
            manager.query(page(2)).await
        });

        assert!(matches!(first, Err(ApiError::Superseded)));
        let second = second.unwrap();
        assert_eq!(second.page, 2);

        let snapshot = manager.snapshot();
        assert_eq!(snapshot.status, ListStatus::Ready);
        assert_eq!(snapshot.data.as_ref().map(|p| p.page), Some(2));
        assert_eq!(snapshot.last_descriptor, Some(page(2)));
        assert_eq!(snapshot.generation, 2);
    }

    #[tokio::test]
    async fn test_late_result_never_overwrites_newer_one() {
        let source = Arc::new(FakeSource::orders(12));
        source.delay_page(1, Duration::from_millis(50));
        let manager = orders(source);

        let first = manager.query(page(1));
        let second = async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            manager.query(page(2)).await
        };
        let (first, second) = tokio::join!(first, second);

        assert!(first.unwrap_err().is_superseded());
        assert_eq!(second.unwrap().page, 2);
        assert_eq!(manager.snapshot().data.as_ref().map(|p| p.page), Some(2));

        // let the abandoned page 1 delay elapse; nothing may change
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(manager.snapshot().data.as_ref().map(|p| p.page), Some(2));
    }

    #[tokio::test]
    async fn test_catalog_failure_serves_fallback() {
        let source = Arc::new(FakeSource::failing());
        let manager = products(source);

        let result = manager.query(QueryBuilder::new().build()).await.unwrap();
        assert!(!result.is_empty());
        assert!(result.items.len() <= 10);

        let snapshot = manager.snapshot();
        assert_eq!(snapshot.status, ListStatus::Ready);
        assert!(snapshot.is_fallback());
        assert!(snapshot.data.as_ref().is_some_and(|p| !p.is_empty()));
        assert!(matches!(snapshot.error, Some(ApiError::Transport(_))));

        let bundled = FallbackResolver::new().records(FallbackCategory::Products);
        assert_eq!(result.total_records, bundled.len() as u64);
        assert!(
            result
                .items
                .iter()
                .all(|item| bundled.iter().any(|record| record == item))
        );
    }

    #[tokio::test]
    async fn test_fallback_honours_filters() {
        let manager = products(Arc::new(FakeSource::failing()));
        let descriptor = QueryBuilder::new()
            .filter("category", "sports")
            .sort_by("price")
            .sort_order(crate::api::query::SortOrder::Asc)
            .build();

        let result = manager.query(descriptor).await.unwrap();
        let names: Vec<_> = result
            .items
            .iter()
            .filter_map(|r| r.get("name").and_then(Value::as_str))
            .collect();
        assert_eq!(names, vec!["Yoga Mat Premium", "Running Shoes Lite"]);
    }

    #[tokio::test]
    async fn test_admin_failure_keeps_previous_data() {
        let source = Arc::new(FakeSource::orders(8));
        let manager = orders(source.clone());
        let before = manager.query(page(1)).await.unwrap();

        source.set_failing(true);
        let err = manager.query(page(2)).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));

        let snapshot = manager.snapshot();
        assert_eq!(snapshot.status, ListStatus::Ready);
        assert_eq!(snapshot.data.as_ref(), Some(&before));
        assert_eq!(snapshot.error.as_ref(), Some(&err));
        assert_eq!(snapshot.origin, Some(DataOrigin::Remote));
    }

    #[tokio::test]
    async fn test_admin_failure_without_prior_data() {
        let manager = orders(Arc::new(FakeSource::failing()));

        assert!(manager.query(page(1)).await.is_err());
        let snapshot = manager.snapshot();
        assert!(snapshot.data.is_none());
        assert!(snapshot.error.is_some());
        assert!(!snapshot.is_fallback());
    }

    #[tokio::test]
    async fn test_refetch_reissues_last_descriptor() {
        let source = Arc::new(FakeSource::orders(12));
        let manager = orders(source.clone());
        let descriptor = QueryBuilder::new()
            .page(2)
            .page_size(4)
            .filter("status", "paid")
            .build();

        let first = manager.query(descriptor.clone()).await.unwrap();
        let again = manager.refetch().await.unwrap();

        assert_eq!(first, again);
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
        assert_eq!(manager.snapshot().last_descriptor, Some(descriptor));
        assert!(again.items.iter().all(|r| r.get("status") == Some(&json!("paid"))));
    }

    #[tokio::test]
    async fn test_new_query_clears_previous_error() {
        let source = Arc::new(FakeSource::failing());
        let manager = orders(source.clone());
        let _ = manager.query(page(1)).await;
        assert!(manager.snapshot().error.is_some());

        source.set_failing(false);
        manager.query(page(1)).await.unwrap();
        assert!(manager.snapshot().error.is_none());
    }

    fn failures() -> Vec<ApiError> {
        vec![
            TransportError::timeout("/x", Duration::from_secs(5)).into(),
            TransportError::http_status("/x", 401, "token expired").into(),
            TransportError::http_status("/x", 503, "maintenance").into(),
            TransportError::network("/x", "connection reset").into(),
            ParseError::new("/x", "body is not JSON").into(),
        ]
    }

    #[tokio::test]
    async fn test_every_failure_kind_falls_back_on_catalog() {
        for failure in failures() {
            let source = Arc::new(FakeSource::default());
            source.fail_with(failure.clone());
            let manager = products(source);

            let result = manager.query(QueryBuilder::new().build()).await.unwrap();
            assert!(!result.is_empty(), "no fallback for {}", failure);

            let snapshot = manager.snapshot();
            assert!(snapshot.is_fallback());
            assert_eq!(snapshot.error.as_ref(), Some(&failure));
        }
    }

    #[tokio::test]
    async fn test_every_failure_kind_surfaces_on_admin_list() {
        for failure in failures() {
            let source = Arc::new(FakeSource::orders(8));
            let manager = orders(source.clone());
            let before = manager.query(page(1)).await.unwrap();

            source.fail_with(failure.clone());
            let err = manager.query(page(2)).await.unwrap_err();
            assert_eq!(err, failure);

            let snapshot = manager.snapshot();
            assert_eq!(snapshot.status, ListStatus::Ready);
            assert_eq!(snapshot.data.as_ref(), Some(&before));
            assert_eq!(snapshot.error.as_ref(), Some(&failure));
            assert!(!snapshot.is_fallback());
        }
    }
}

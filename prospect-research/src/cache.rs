use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::debug;

use crate::client::ResearchService;
use crate::error::ResearchError;
use crate::models::{ResearchRequest, ResearchResult, ServiceStatus};

/// TTL cache over any [`ResearchService`].
///
/// Successful discovery responses are keyed by website and product hint and
/// replayed until they age out. Failures are never cached, and the status
/// probe always passes through to the wrapped service.
pub struct CachedResearchService {
    inner: Arc<dyn ResearchService>,
    ttl: Duration,
    entries: DashMap<String, CacheEntry>,
}

struct CacheEntry {
    result: ResearchResult,
    stored_at: DateTime<Utc>,
}

impl CachedResearchService {
    pub fn new(inner: Arc<dyn ResearchService>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: DashMap::new(),
        }
    }

    fn cache_key(request: &ResearchRequest) -> String {
        match &request.products {
            Some(products) => format!("{}|{}", request.company_website, products.join(",")),
            None => request.company_website.clone(),
        }
    }
}

#[async_trait]
impl ResearchService for CachedResearchService {
    async fn discover_buyers(
        &self,
        request: &ResearchRequest,
    ) -> Result<ResearchResult, ResearchError> {
        let key = Self::cache_key(request);
        // the map guard must not be held across the await below
        let cached = self.entries.get(&key).and_then(|entry| {
            (Utc::now() - entry.stored_at < self.ttl).then(|| entry.result.clone())
        });
        if let Some(result) = cached {
            debug!(company = %request.company_name, "research cache hit");
            return Ok(result);
        }

        let result = self.inner.discover_buyers(request).await?;
        self.entries.insert(
            key,
            CacheEntry {
                result: result.clone(),
                stored_at: Utc::now(),
            },
        );
        Ok(result)
    }

    async fn status(&self) -> Result<ServiceStatus, ResearchError> {
        self.inner.status().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ServiceMode, SourceCompanyProfile};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingService {
        calls: AtomicUsize,
        fail_first: AtomicUsize,
    }

    impl CountingService {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_first: AtomicUsize::new(0),
            }
        }

        fn failing_once() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_first: AtomicUsize::new(1),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ResearchService for CountingService {
        async fn discover_buyers(
            &self,
            request: &ResearchRequest,
        ) -> Result<ResearchResult, ResearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_first.swap(0, Ordering::SeqCst) > 0 {
                return Err(ResearchError::Transport(
                    "503 Service Unavailable".to_string(),
                ));
            }
            Ok(ResearchResult {
                source_company: SourceCompanyProfile {
                    name: Some(request.company_name.clone()),
                    ..Default::default()
                },
                ideal_customer_profile: None,
                discovered_buyers: vec![],
            })
        }

        async fn status(&self) -> Result<ServiceStatus, ResearchError> {
            Ok(ServiceStatus {
                mode: ServiceMode::Mock,
                message: None,
            })
        }
    }

    fn request(website: &str, products: Option<Vec<String>>) -> ResearchRequest {
        ResearchRequest::from_website(website, products).unwrap()
    }

    #[tokio::test]
    async fn repeated_requests_are_served_from_cache() {
        let inner = Arc::new(CountingService::new());
        let cache = CachedResearchService::new(inner.clone(), Duration::hours(24));

        let req = request("https://acme.com", None);
        let first = cache.discover_buyers(&req).await.unwrap();
        let second = cache.discover_buyers(&req).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(inner.calls(), 1);
    }

    #[tokio::test]
    async fn different_product_hints_get_separate_entries() {
        let inner = Arc::new(CountingService::new());
        let cache = CachedResearchService::new(inner.clone(), Duration::hours(24));

        let plain = request("https://acme.com", None);
        let hinted = request("https://acme.com", Some(vec!["oncology APIs".to_string()]));
        cache.discover_buyers(&plain).await.unwrap();
        cache.discover_buyers(&hinted).await.unwrap();

        assert_eq!(inner.calls(), 2);
    }

    #[tokio::test]
    async fn expired_entries_are_refetched() {
        let inner = Arc::new(CountingService::new());
        let cache = CachedResearchService::new(inner.clone(), Duration::zero());

        let req = request("https://acme.com", None);
        cache.discover_buyers(&req).await.unwrap();
        cache.discover_buyers(&req).await.unwrap();

        assert_eq!(inner.calls(), 2);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let inner = Arc::new(CountingService::failing_once());
        let cache = CachedResearchService::new(inner.clone(), Duration::hours(24));

        let req = request("https://acme.com", None);
        let err = cache.discover_buyers(&req).await.unwrap_err();
        assert!(matches!(err, ResearchError::Transport(_)));

        cache.discover_buyers(&req).await.unwrap();
        cache.discover_buyers(&req).await.unwrap();

        // one failure, one real fetch, then the cache answers
        assert_eq!(inner.calls(), 2);
    }

    #[tokio::test]
    async fn status_probe_passes_through() {
        let inner = Arc::new(CountingService::new());
        let cache = CachedResearchService::new(inner, Duration::hours(24));
        let status = cache.status().await.unwrap();
        assert_eq!(status.mode, ServiceMode::Mock);
    }
}

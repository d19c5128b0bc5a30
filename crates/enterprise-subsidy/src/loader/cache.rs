use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::debug;

use super::source::DataSourceError;

/// Cache keys for every query issued while loading a course page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    EnterpriseCustomer {
        slug: String,
    },
    RedeemablePolicies {
        enterprise_uuid: String,
        user_id: u64,
    },
    Subscriptions {
        enterprise_uuid: String,
    },
    EnterpriseOffers {
        enterprise_uuid: String,
    },
    CouponCodes {
        enterprise_uuid: String,
    },
    LicenseRequests {
        enterprise_uuid: String,
        user_email: String,
    },
    CouponCodeRequests {
        enterprise_uuid: String,
        user_email: String,
    },
    BrowseAndRequestConfiguration {
        enterprise_uuid: String,
    },
    CourseMetadata {
        course_key: String,
        course_run_key: Option<String>,
    },
    CanRedeem {
        enterprise_uuid: String,
        course_run_keys: Vec<String>,
    },
    EnterpriseCourseEnrollments {
        enterprise_uuid: String,
    },
    Entitlements {
        user_id: u64,
    },
    ContainsContentItems {
        enterprise_uuid: String,
        course_key: String,
    },
    CourseReviews {
        course_key: String,
    },
    CourseRecommendations {
        enterprise_uuid: String,
        course_key: String,
        search_catalogs: Vec<String>,
    },
}

type CachedValue = Arc<dyn Any + Send + Sync>;
type SharedFetch = Shared<BoxFuture<'static, Result<CachedValue, DataSourceError>>>;

struct CacheEntry {
    fetch: SharedFetch,
    fetched_at: Instant,
}

/// Memoizing query cache with at most one in-flight fetch per key.
///
/// Concurrent callers for the same key await the same shared future and
/// observe the same value or error. Failed fetches are replaced on the next
/// `ensure`; successful ones are reused until they go stale.
pub struct QueryCache {
    entries: Mutex<HashMap<QueryKey, CacheEntry>>,
    stale_after: Option<Duration>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(None)
    }
}

impl QueryCache {
    /// `stale_after = None` keeps successful results for the cache's lifetime.
    pub fn new(stale_after: Option<Duration>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            stale_after,
        }
    }

    /// Return the cached value for `key`, running `producer` only when needed.
    pub async fn ensure<T, F>(&self, key: QueryKey, producer: F) -> Result<T, DataSourceError>
    where
        T: Clone + Send + Sync + 'static,
        F: Future<Output = Result<T, DataSourceError>> + Send + 'static,
    {
        let fetch = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            match entries.get(&key) {
                Some(entry) if self.is_reusable(entry) => entry.fetch.clone(),
                _ => {
                    debug!(?key, "query fetch started");
                    let fetch = producer
                        .map(|result| result.map(|value| Arc::new(value) as CachedValue))
                        .boxed()
                        .shared();
                    entries.insert(
                        key.clone(),
                        CacheEntry {
                            fetch: fetch.clone(),
                            fetched_at: Instant::now(),
                        },
                    );
                    fetch
                }
            }
        };

        let value = fetch.await?;
        downcast(&key, &value)
    }

    /// Synchronous read of a resolved value. Never triggers a fetch.
    pub fn peek<T>(&self, key: &QueryKey) -> Option<T>
    where
        T: Clone + 'static,
    {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let value = entries.get(key)?.fetch.peek()?.as_ref().ok()?;
        value.downcast_ref::<T>().cloned()
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn is_reusable(&self, entry: &CacheEntry) -> bool {
        match entry.fetch.peek() {
            None => true,
            Some(Err(_)) => false,
            Some(Ok(_)) => self
                .stale_after
                .map_or(true, |stale_after| entry.fetched_at.elapsed() < stale_after),
        }
    }
}

fn downcast<T>(key: &QueryKey, value: &CachedValue) -> Result<T, DataSourceError>
where
    T: Clone + 'static,
{
    value
        .downcast_ref::<T>()
        .cloned()
        .ok_or_else(|| DataSourceError::CacheTypeMismatch {
            key: format!("{key:?}"),
        })
}

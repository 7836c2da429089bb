use crate::cache_key::CacheKey;
use lru::LruCache;
use parking_lot::Mutex; // PERFORMANCE: no poisoning, lock never held across .await
use serde::Serialize;
use shared::{ApiError, Member, PaginatedResult, Result};
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Default number of member pages kept per session.
pub const DEFAULT_MEMBER_CACHE_CAPACITY: usize = 50;

/// One cached page of members, shared by every caller that asked for it
pub type MemberPage = Arc<PaginatedResult<Vec<Member>>>;

/// Slot for one cache key. Empty while the first fetch is in flight.
type PageSlot = Arc<OnceCell<MemberPage>>;

#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Calls that joined a fetch already in flight for the same key
    pub joined: u64,
    pub hit_rate: f64,
    pub size: usize,
}

// ============================================================================
// MEMBER PAGE CACHE
// ============================================================================

/// LRU cache of member list pages keyed by [`CacheKey`].
///
/// Concurrent lookups for the same key share a single fetch. The fetch runs on
/// its own task, so a caller that stops waiting does not stop the page from
/// being stored.
pub struct MemberCache {
    pages: Mutex<LruCache<CacheKey, PageSlot>>,
    stats: Mutex<CacheStats>,
}

impl MemberCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        info!("🗂️ Initializing member cache (capacity: {} pages)", capacity);
        Self {
            pages: Mutex::new(LruCache::new(capacity)),
            stats: Mutex::new(CacheStats::default()),
        }
    }

    /// Returns the page stored under `key`, running `fetch` only when no page is
    /// stored and none is being fetched.
    pub async fn get_or_fetch<F, Fut>(&self, key: CacheKey, fetch: F) -> Result<MemberPage>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<PaginatedResult<Vec<Member>>>> + Send + 'static,
    {
        let (slot, lookup, size) = {
            let mut pages = self.pages.lock();
            match pages.get(&key).cloned() {
                Some(slot) if slot.initialized() => (slot, Lookup::Hit, pages.len()),
                Some(slot) => (slot, Lookup::Joined, pages.len()),
                None => {
                    let slot: PageSlot = Arc::new(OnceCell::new());
                    pages.put(key.clone(), slot.clone());
                    (slot, Lookup::Miss, pages.len())
                }
            }
        };
        self.update_stats(lookup, size);

        match lookup {
            Lookup::Hit => {
                if let Some(page) = slot.get() {
                    debug!("🎯 Member cache hit for key: {}", key);
                    return Ok(page.clone());
                }
            }
            Lookup::Joined => debug!("⏳ Joining in-flight fetch for key: {}", key),
            Lookup::Miss => debug!("Member cache miss for key: {}", key),
        }

        let task_slot = slot.clone();
        let handle = tokio::spawn(async move {
            let page = task_slot
                .get_or_try_init(|| async move { fetch().await.map(Arc::new) })
                .await
                .cloned();
            page
        });

        match handle.await {
            Ok(Ok(page)) => Ok(page),
            Ok(Err(e)) => {
                self.discard_empty(&key, &slot);
                Err(e)
            }
            Err(e) => {
                self.discard_empty(&key, &slot);
                Err(ApiError::internal(format!("Member page fetch task failed: {}", e)))
            }
        }
    }

    /// Stored page for `key`, without touching recency.
    pub fn peek(&self, key: &CacheKey) -> Option<MemberPage> {
        self.pages
            .lock()
            .peek(key)
            .and_then(|slot| slot.get().cloned())
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.peek(key).is_some()
    }

    /// First member named `username` across every stored page, most recently
    /// used page first. Exact, case-sensitive match.
    pub fn find_member(&self, username: &str) -> Option<Member> {
        let pages = self.pages.lock();
        pages
            .iter()
            .filter_map(|(_, slot)| slot.get())
            .flat_map(|page| page.result.iter())
            .find(|member| member.username == username)
            .cloned()
    }

    /// Drops every stored page. Fetches still in flight finish for their
    /// callers but are no longer stored.
    pub fn invalidate_all(&self) {
        let mut pages = self.pages.lock();
        let removed = pages.len();
        pages.clear();
        drop(pages);

        self.stats.lock().size = 0;
        if removed > 0 {
            debug!("🧹 Member cache invalidated ({} pages dropped)", removed);
        }
    }

    /// Number of slots, including fetches still in flight.
    pub fn len(&self) -> usize {
        self.pages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.pages.lock().cap().get()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.lock().clone()
    }

    /// Removes the slot a failed fetch left behind, unless another caller still
    /// holds it and may yet fill it. Holders: the LRU entry and `slot` itself.
    /// A slot left empty here is filled by the next caller that joins it.
    fn discard_empty(&self, key: &CacheKey, slot: &PageSlot) {
        let mut pages = self.pages.lock();
        let stale = pages
            .peek(key)
            .map(|current| {
                Arc::ptr_eq(current, slot)
                    && !current.initialized()
                    && Arc::strong_count(current) <= 2
            })
            .unwrap_or(false);
        if stale {
            pages.pop(key);
            warn!("Dropped empty member cache slot after failed fetch: {}", key);
        }
    }

    fn update_stats(&self, lookup: Lookup, size: usize) {
        let mut stats = self.stats.lock();
        match lookup {
            Lookup::Hit => stats.hits += 1,
            Lookup::Miss => stats.misses += 1,
            Lookup::Joined => stats.joined += 1,
        }
        stats.size = size;
        let total = stats.hits + stats.misses + stats.joined;
        stats.hit_rate = if total > 0 {
            (stats.hits + stats.joined) as f64 / total as f64
        } else {
            0.0
        };
    }
}

impl Default for MemberCache {
    fn default() -> Self {
        Self::new(DEFAULT_MEMBER_CACHE_CAPACITY)
    }
}

#[derive(Clone, Copy)]
enum Lookup {
    Hit,
    Miss,
    Joined,
}

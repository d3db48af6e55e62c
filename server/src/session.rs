//! Cookie-keyed, in-memory session registry.
//!
//! Each browser gets a random `todo_session` cookie naming its entry in the
//! registry. Every entry sits behind its own mutex; a request holds that
//! lock from checkout until the reply is built, so requests on one session
//! run one after another while different sessions proceed in parallel.
//!
//! A new session is only stored once it holds something (a list or a
//! pending flash). Sessions idle for longer than the configured timeout are
//! dropped: lazily when their cookie comes back, and in a sweep whenever a
//! new session is stored.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::http::{header, HeaderMap};
use todo_core::SessionState;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "todo_session";

/// Idle time after which a session is discarded.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60 * 60);

pub type SessionId = Uuid;

#[derive(Debug)]
struct Entry {
    state: SessionState,
    last_seen: Instant,
}

impl Entry {
    fn new() -> Self {
        Self {
            state: SessionState::new(),
            last_seen: Instant::now(),
        }
    }
}

type Slot = Arc<Mutex<Entry>>;

/// A session locked for one request.
#[derive(Debug)]
pub struct Checkout {
    pub id: SessionId,
    /// True when no live session matched and a new one was started.
    pub fresh: bool,
    slot: Slot,
    entry: OwnedMutexGuard<Entry>,
}

impl Checkout {
    pub fn state(&mut self) -> &mut SessionState {
        &mut self.entry.state
    }
}

#[derive(Clone, Debug)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Slot>>>,
    idle_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            idle_timeout,
        }
    }

    /// Lock the live session named by `id`, or start an empty one. Waits
    /// while another request holds the same session.
    pub async fn load(&self, id: Option<SessionId>) -> Checkout {
        if let Some(id) = id {
            let slot = self.sessions.read().await.get(&id).cloned();
            if let Some(slot) = slot {
                let entry = Arc::clone(&slot).lock_owned().await;
                if entry.last_seen.elapsed() <= self.idle_timeout {
                    return Checkout {
                        id,
                        fresh: false,
                        slot,
                        entry,
                    };
                }
                drop(entry);
                self.sessions.write().await.remove(&id);
                tracing::info!(session = %id, "session expired");
            }
        }

        let slot: Slot = Arc::new(Mutex::new(Entry::new()));
        let entry = Arc::clone(&slot).lock_owned().await;
        Checkout {
            id: Uuid::new_v4(),
            fresh: true,
            slot,
            entry,
        }
    }

    /// Release the session lock. Returns whether the session is stored; a
    /// fresh session that is still empty is discarded.
    pub async fn save(&self, mut checkout: Checkout) -> bool {
        checkout.entry.last_seen = Instant::now();
        if !checkout.fresh {
            return true;
        }
        if checkout.entry.state == SessionState::default() {
            return false;
        }

        let Checkout { id, slot, entry, .. } = checkout;
        drop(entry);
        let mut sessions = self.sessions.write().await;
        let purged = purge_idle(&mut sessions, self.idle_timeout);
        if purged > 0 {
            tracing::info!(purged, "dropped idle sessions");
        }
        sessions.insert(id, slot);
        tracing::info!(session = %id, "starting new session");
        true
    }

    /// Drop every idle session not currently in use.
    pub async fn purge_expired(&self) -> usize {
        purge_idle(&mut *self.sessions.write().await, self.idle_timeout)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn purge_idle(sessions: &mut HashMap<SessionId, Slot>, idle_timeout: Duration) -> usize {
    let before = sessions.len();
    sessions.retain(|_, slot| match slot.try_lock() {
        Ok(entry) => entry.last_seen.elapsed() <= idle_timeout,
        Err(_) => true,
    });
    before - sessions.len()
}

/// Extract the session id from the request's `Cookie` headers.
pub fn session_id(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// `Set-Cookie` value binding the browser to `id`.
pub fn session_cookie(id: SessionId) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    async fn stored_with_list(store: &SessionStore, name: &str) -> SessionId {
        let mut checkout = store.load(None).await;
        checkout.state().create_list(name).unwrap();
        let id = checkout.id;
        assert!(store.save(checkout).await);
        id
    }

    #[test]
    fn session_id_found_among_other_cookies() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {SESSION_COOKIE}={id}; lang=en")).unwrap(),
        );
        assert_eq!(session_id(&headers), Some(id));
    }

    #[test]
    fn session_id_ignores_garbage() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("todo_session=not-a-uuid"));
        assert_eq!(session_id(&headers), None);
        assert_eq!(session_id(&HeaderMap::new()), None);
    }

    #[test]
    fn cookie_round_trips_through_header() {
        let id = Uuid::new_v4();
        let set_cookie = session_cookie(id);
        let pair = set_cookie.split(';').next().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(pair).unwrap());
        assert_eq!(session_id(&headers), Some(id));
    }

    #[tokio::test]
    async fn unknown_id_starts_fresh_session() {
        let store = SessionStore::new();
        let mut checkout = store.load(Some(Uuid::new_v4())).await;
        assert!(checkout.fresh);
        assert!(checkout.state().lists.is_empty());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn empty_fresh_session_is_not_stored() {
        let store = SessionStore::new();
        for _ in 0..50 {
            let checkout = store.load(None).await;
            assert!(!store.save(checkout).await);
        }
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn saved_session_is_loaded_back() {
        let store = SessionStore::new();
        let id = stored_with_list(&store, "Saved").await;

        let mut again = store.load(Some(id)).await;
        assert!(!again.fresh);
        assert_eq!(again.state().lists[0].name, "Saved");
        assert!(store.save(again).await);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn idle_sessions_expire() {
        let store = SessionStore::with_idle_timeout(Duration::from_millis(10));
        let id = stored_with_list(&store, "Old").await;
        tokio::time::sleep(Duration::from_millis(30)).await;

        let checkout = store.load(Some(id)).await;
        assert!(checkout.fresh);
        assert_ne!(checkout.id, id);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn sweep_drops_idle_sessions() {
        let store = SessionStore::with_idle_timeout(Duration::from_millis(10));
        stored_with_list(&store, "A").await;
        stored_with_list(&store, "B").await;
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(store.purge_expired().await, 2);
        assert!(store.is_empty().await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_checkouts_of_one_session_serialize() {
        let store = SessionStore::new();
        let id = stored_with_list(&store, "Shared").await;

        let tasks: Vec<_> = (0..20)
            .map(|n| {
                let store = store.clone();
                tokio::spawn(async move {
                    let mut checkout = store.load(Some(id)).await;
                    tokio::task::yield_now().await;
                    checkout.state().add_todo(1, &format!("todo {n}")).unwrap();
                    store.save(checkout).await;
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let mut checkout = store.load(Some(id)).await;
        assert_eq!(checkout.state().lists[0].todos.len(), 20);
    }
}

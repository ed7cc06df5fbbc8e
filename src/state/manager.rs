//! Registration coordinator.
//!
//! Every registry mutation goes through [`SessionManager`], which holds a
//! single async lock for the duration of each register/unregister so the
//! scan-evict-insert sequence is never interleaved with another one.

use solace_proto::Nickname;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{SessionCache, SessionHandle};
use crate::error::SessionError;

#[derive(Default)]
pub struct SessionManager {
    cache: SessionCache,
    registration: Mutex<()>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the registry.
    pub fn cache(&self) -> &SessionCache {
        &self.cache
    }

    /// Register `handle` under `nick`.
    ///
    /// Any other session holding the same display name is evicted first,
    /// whatever its device, so the newest connection wins. Entries this
    /// handle left behind under an earlier nick are dropped too.
    pub async fn register_session(&self, handle: &Arc<SessionHandle>, nick: Nickname) {
        let _guard = self.registration.lock().await;

        for (cached_nick, cached) in self.cache.entries() {
            let same_handler = cached.id() == handle.id();
            if same_handler && cached_nick != nick {
                debug!(nick = %cached_nick, session_id = %handle.id(), "Dropping previous nick");
                if let Err(error) = self.cache.remove_session(&cached_nick) {
                    debug!(%error, "Previous nick already gone");
                }
            } else if !same_handler && cached_nick.same_name(&nick) {
                info!(
                    nick = %cached_nick,
                    evicted = %cached.id(),
                    session_id = %handle.id(),
                    "Evicting stale session"
                );
                if let Err(error) = self.cache.remove_session(&cached_nick) {
                    debug!(%error, "Stale session already gone");
                }
            }
        }

        info!(nick = %nick, session_id = %handle.id(), "Registering nick");
        self.cache.cache_session(nick, Arc::clone(handle));
    }

    /// Remove `handle` from the registry under its recorded nick.
    ///
    /// A no-op when the handle never registered, was already removed, or has
    /// been replaced under that nick by a newer session. Returns whether an
    /// entry was removed.
    pub async fn unregister_session(&self, handle: &SessionHandle) -> bool {
        let _guard = self.registration.lock().await;

        let Some(nick) = handle.nick() else {
            return false;
        };
        match self.cache.find_session(&nick) {
            Some(cached) if cached.id() == handle.id() => {
                let removed = self.cache.remove_session(&nick).is_ok();
                if removed {
                    info!(nick = %nick, session_id = %handle.id(), "Unregistered nick");
                }
                removed
            }
            _ => {
                debug!(nick = %nick, session_id = %handle.id(), "Session already unregistered");
                false
            }
        }
    }

    /// Exact lookup of a deliverable session.
    ///
    /// A cached session without a live writer counts as absent.
    pub fn get_session(&self, nick: &Nickname) -> Result<Arc<SessionHandle>, SessionError> {
        self.cache
            .find_session(nick)
            .filter(|handle| handle.has_writer())
            .ok_or_else(|| SessionError::SessionNotFound(nick.to_string()))
    }

    /// Snapshot of every registered session.
    pub fn get_sessions(&self) -> Vec<Arc<SessionHandle>> {
        self.cache.find_user_sessions()
    }

    pub fn user_count(&self) -> usize {
        self.cache.user_count()
    }
}

//! Session registry: nickname to live session handle.

use dashmap::DashMap;
use solace_proto::Nickname;
use std::sync::Arc;

use super::SessionHandle;
use crate::error::SessionError;

/// Keys compare on name and device, so this is the exact-lookup index.
/// Name-only lookups scan [`SessionCache::entries`].
#[derive(Default)]
pub struct SessionCache {
    sessions: DashMap<Nickname, Arc<SessionHandle>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite.
    pub fn cache_session(&self, nick: Nickname, handle: Arc<SessionHandle>) {
        self.sessions.insert(nick, handle);
    }

    pub fn find_session(&self, nick: &Nickname) -> Option<Arc<SessionHandle>> {
        self.sessions.get(nick).map(|entry| Arc::clone(entry.value()))
    }

    pub fn find_user_sessions(&self) -> Vec<Arc<SessionHandle>> {
        self.sessions
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// Snapshot of every entry, in the map's iteration order.
    pub fn entries(&self) -> Vec<(Nickname, Arc<SessionHandle>)> {
        self.sessions
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect()
    }

    pub fn remove_session(&self, nick: &Nickname) -> Result<Arc<SessionHandle>, SessionError> {
        self.sessions
            .remove(nick)
            .map(|(_, handle)| handle)
            .ok_or_else(|| SessionError::SessionNotFound(nick.to_string()))
    }

    /// Replace the handle of an existing entry. Not an upsert.
    pub fn update_session(
        &self,
        nick: &Nickname,
        handle: Arc<SessionHandle>,
    ) -> Result<(), SessionError> {
        match self.sessions.get_mut(nick) {
            Some(mut entry) => {
                *entry.value_mut() = handle;
                Ok(())
            }
            None => Err(SessionError::SessionNotFound(nick.to_string())),
        }
    }

    pub fn user_count(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn nick(name: &str, device: Option<Uuid>) -> Nickname {
        Nickname::new(name, device).unwrap()
    }

    #[test]
    fn cache_session_overwrites() {
        let cache = SessionCache::new();
        let alice = nick("alice", None);
        let first = SessionHandle::new();
        let second = SessionHandle::new();

        cache.cache_session(alice.clone(), first);
        cache.cache_session(alice.clone(), Arc::clone(&second));

        assert_eq!(cache.user_count(), 1);
        assert_eq!(cache.find_session(&alice).unwrap().id(), second.id());
    }

    #[test]
    fn find_is_exact_on_device() {
        let cache = SessionCache::new();
        let device = Uuid::new_v4();
        cache.cache_session(nick("alice", Some(device)), SessionHandle::new());

        assert!(cache.find_session(&nick("alice", Some(device))).is_some());
        assert!(cache.find_session(&nick("alice", None)).is_none());
        assert!(cache.find_session(&nick("alice", Some(Uuid::new_v4()))).is_none());
    }

    #[test]
    fn remove_missing_is_not_found() {
        let cache = SessionCache::new();
        let err = cache.remove_session(&nick("ghost", None)).unwrap_err();
        assert_eq!(err, SessionError::SessionNotFound("ghost".into()));
    }

    #[test]
    fn update_is_not_an_upsert() {
        let cache = SessionCache::new();
        let bob = nick("bob", None);
        assert!(cache.update_session(&bob, SessionHandle::new()).is_err());
        assert_eq!(cache.user_count(), 0);

        cache.cache_session(bob.clone(), SessionHandle::new());
        let replacement = SessionHandle::new();
        cache
            .update_session(&bob, Arc::clone(&replacement))
            .unwrap();
        assert_eq!(cache.find_session(&bob).unwrap().id(), replacement.id());
    }

    #[test]
    fn snapshots_list_every_entry() {
        let cache = SessionCache::new();
        cache.cache_session(nick("a", None), SessionHandle::new());
        cache.cache_session(nick("b", None), SessionHandle::new());
        assert_eq!(cache.find_user_sessions().len(), 2);
        assert_eq!(cache.entries().len(), 2);
    }
}

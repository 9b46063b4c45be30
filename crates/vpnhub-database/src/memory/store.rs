//! In-memory store guarded by a single `tokio` read-write lock.
//!
//! All four collections share one lock, so a ledger transition that writes
//! a connection and a server counter is atomic with respect to every other
//! reader and writer.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use vpnhub_core::error::AppError;
use vpnhub_core::result::AppResult;
use vpnhub_core::types::{ServerId, UserId};
use vpnhub_entity::connection::{Connection, ConnectionView};
use vpnhub_entity::server::{Server, ServerPatch, ServerStatus};
use vpnhub_entity::session::Session;
use vpnhub_entity::user::{NewUser, User, UserRole};

use crate::traits::{ConnectionStore, CounterDrift, ServerStore, SessionStore, UserStore};

#[derive(Debug, Default)]
struct MemoryState {
    users: Vec<User>,
    sessions: HashMap<String, Session>,
    servers: Vec<Server>,
    connections: Vec<Connection>,
}

impl MemoryState {
    fn server(&self, id: &ServerId) -> Option<&Server> {
        self.servers.iter().find(|s| &s.id == id)
    }

    fn adjust(&mut self, id: &ServerId, delta: i32) {
        if let Some(server) = self.servers.iter_mut().find(|s| &s.id == id) {
            server.current_connections = (server.current_connections + delta).max(0);
        }
    }

    fn view(&self, connection: &Connection) -> ConnectionView {
        let server = self
            .server(&connection.server_id)
            .map(|s| (s.name.as_str(), s.country.as_str()));
        ConnectionView::new(connection.clone(), server)
    }

    /// Whether `server_id` has no free seat for `user_id`, counting the
    /// seat the user's own active connection there would release.
    fn is_full_for(&self, user_id: &UserId, server_id: &ServerId) -> bool {
        let Some(server) = self.server(server_id) else {
            return false;
        };
        let releasing = self
            .connections
            .iter()
            .any(|c| &c.user_id == user_id && c.is_active() && &c.server_id == server_id);
        if releasing {
            server.current_connections - 1 >= server.max_connections
        } else {
            server.is_at_capacity()
        }
    }

    fn close_active(&mut self, user_id: &UserId, now: DateTime<Utc>) -> Option<Connection> {
        let connection = self
            .connections
            .iter_mut()
            .find(|c| &c.user_id == user_id && c.is_active())?;
        if !connection.close(now) {
            return None;
        }
        let closed = connection.clone();
        self.adjust(&closed.server_id, -1);
        Some(closed)
    }
}

/// In-memory implementation of all store traits.
///
/// Cloning yields another handle to the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: &UserId) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| &u.id == id).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        Ok(self.state.read().await.users.clone())
    }

    async fn record_login(&self, profile: NewUser, now: DateTime<Utc>) -> AppResult<User> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.users.iter_mut().find(|u| u.email == profile.email) {
            existing.last_login = Some(now);
            return Ok(existing.clone());
        }
        if state.users.iter().any(|u| u.id == profile.id) {
            return Err(AppError::conflict(format!(
                "User id '{}' is already registered with another email",
                profile.id
            )));
        }
        let user = profile.into_user(now);
        state.users.push(user.clone());
        Ok(user)
    }

    async fn update_role(&self, id: &UserId, role: UserRole) -> AppResult<bool> {
        let mut state = self.state.write().await;
        match state.users.iter_mut().find(|u| &u.id == id) {
            Some(user) => {
                user.role = role;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.state.read().await.users.len() as i64)
    }
}

#[async_trait]
impl ServerStore for MemoryStore {
    async fn find_by_id(&self, id: &ServerId) -> AppResult<Option<Server>> {
        Ok(self.state.read().await.server(id).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Server>> {
        Ok(self.state.read().await.servers.clone())
    }

    async fn countries(&self) -> AppResult<Vec<String>> {
        let state = self.state.read().await;
        let countries: BTreeSet<&str> = state.servers.iter().map(|s| s.country.as_str()).collect();
        Ok(countries.into_iter().map(str::to_string).collect())
    }

    async fn create(&self, server: &Server) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.server(&server.id).is_some() {
            return Err(AppError::conflict(format!(
                "Server '{}' already exists",
                server.id
            )));
        }
        state.servers.push(server.clone());
        Ok(())
    }

    async fn update(&self, id: &ServerId, patch: &ServerPatch) -> AppResult<Option<Server>> {
        let mut state = self.state.write().await;
        Ok(state.servers.iter_mut().find(|s| &s.id == id).map(|server| {
            patch.apply_to(server);
            server.clone()
        }))
    }

    async fn delete(&self, id: &ServerId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let before = state.servers.len();
        state.servers.retain(|s| &s.id != id);
        Ok(state.servers.len() < before)
    }

    async fn adjust_connection_count(&self, id: &ServerId, delta: i32) -> AppResult<()> {
        self.state.write().await.adjust(id, delta);
        Ok(())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.state.read().await.servers.len() as i64)
    }

    async fn count_by_status(&self, status: ServerStatus) -> AppResult<i64> {
        let state = self.state.read().await;
        Ok(state.servers.iter().filter(|s| s.status == status).count() as i64)
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn replace_for_user(&self, session: &Session) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.sessions.retain(|_, s| s.user_id != session.user_id);
        state
            .sessions
            .insert(session.session_token.clone(), session.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<Session>> {
        Ok(self.state.read().await.sessions.get(token).cloned())
    }

    async fn delete_by_user(&self, user_id: &UserId) -> AppResult<u64> {
        let mut state = self.state.write().await;
        let before = state.sessions.len();
        state.sessions.retain(|_, s| &s.user_id != user_id);
        Ok((before - state.sessions.len()) as u64)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut state = self.state.write().await;
        let before = state.sessions.len();
        state.sessions.retain(|_, s| !s.is_expired_at(now));
        Ok((before - state.sessions.len()) as u64)
    }
}

#[async_trait]
impl ConnectionStore for MemoryStore {
    async fn find_active(&self, user_id: &UserId) -> AppResult<Option<Connection>> {
        let state = self.state.read().await;
        Ok(state
            .connections
            .iter()
            .find(|c| &c.user_id == user_id && c.is_active())
            .cloned())
    }

    async fn find_active_view(&self, user_id: &UserId) -> AppResult<Option<ConnectionView>> {
        let state = self.state.read().await;
        Ok(state
            .connections
            .iter()
            .find(|c| &c.user_id == user_id && c.is_active())
            .map(|c| state.view(c)))
    }

    async fn history(&self, user_id: &UserId, limit: i64) -> AppResult<Vec<ConnectionView>> {
        let state = self.state.read().await;
        let mut mine: Vec<&Connection> = state
            .connections
            .iter()
            .filter(|c| &c.user_id == user_id)
            .collect();
        // Newest first; ties keep the later insert first.
        mine.reverse();
        mine.sort_by(|a, b| b.connected_at.cmp(&a.connected_at));
        Ok(mine
            .into_iter()
            .take(limit.max(0) as usize)
            .map(|c| state.view(c))
            .collect())
    }

    async fn open(
        &self,
        connection: &Connection,
        enforce_capacity: bool,
    ) -> AppResult<Option<Connection>> {
        let mut state = self.state.write().await;
        if enforce_capacity && state.is_full_for(&connection.user_id, &connection.server_id) {
            return Err(AppError::invalid_state("Server is at capacity"));
        }
        let superseded = state.close_active(&connection.user_id, connection.connected_at);
        state.connections.push(connection.clone());
        state.adjust(&connection.server_id, 1);
        Ok(superseded)
    }

    async fn close_active(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Connection>> {
        Ok(self.state.write().await.close_active(user_id, now))
    }

    async fn count_active(&self) -> AppResult<i64> {
        let state = self.state.read().await;
        Ok(state.connections.iter().filter(|c| c.is_active()).count() as i64)
    }

    async fn count_since(&self, since: DateTime<Utc>) -> AppResult<i64> {
        let state = self.state.read().await;
        Ok(state
            .connections
            .iter()
            .filter(|c| c.connected_at >= since)
            .count() as i64)
    }

    async fn reconcile_counters(&self) -> AppResult<Vec<CounterDrift>> {
        let mut state = self.state.write().await;
        let mut active: HashMap<ServerId, i32> = HashMap::new();
        for connection in state.connections.iter().filter(|c| c.is_active()) {
            *active.entry(connection.server_id.clone()).or_default() += 1;
        }

        let mut drifts = Vec::new();
        for server in state.servers.iter_mut() {
            let actual = active.get(&server.id).copied().unwrap_or(0);
            if server.current_connections != actual {
                drifts.push(CounterDrift {
                    server_id: server.id.clone(),
                    server_name: server.name.clone(),
                    recorded: server.current_connections,
                    actual,
                });
                server.current_connections = actual;
            }
        }
        drifts.sort_by(|a, b| a.server_name.cmp(&b.server_name));
        Ok(drifts)
    }
}

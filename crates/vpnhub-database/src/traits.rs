//! Store traits, one per persisted collection.
//!
//! Every backend implements all four. Ledger transitions that touch two
//! collections (a connection row and a server counter) live on
//! [`ConnectionStore`] so each backend can make them atomic.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use vpnhub_core::result::AppResult;
use vpnhub_core::types::{ServerId, UserId};
use vpnhub_entity::connection::{Connection, ConnectionView};
use vpnhub_entity::server::{Server, ServerPatch, ServerStatus};
use vpnhub_entity::session::Session;
use vpnhub_entity::user::{NewUser, User, UserRole};

/// Persistence of user records.
#[async_trait]
pub trait UserStore: Send + Sync + Debug + 'static {
    /// Find a user by identity.
    async fn find_by_id(&self, id: &UserId) -> AppResult<Option<User>>;

    /// List every user, oldest first.
    async fn find_all(&self) -> AppResult<Vec<User>>;

    /// Record a successful login.
    ///
    /// Matches on email: an unknown email creates the user with role
    /// `user`; a known one only has `last_login` refreshed.
    async fn record_login(&self, profile: NewUser, now: DateTime<Utc>) -> AppResult<User>;

    /// Set a user's role. Returns `false` if no such user exists.
    async fn update_role(&self, id: &UserId, role: UserRole) -> AppResult<bool>;

    /// Count all users.
    async fn count(&self) -> AppResult<i64>;
}

/// Persistence of the server catalog.
#[async_trait]
pub trait ServerStore: Send + Sync + Debug + 'static {
    /// Find a server by identity.
    async fn find_by_id(&self, id: &ServerId) -> AppResult<Option<Server>>;

    /// List every server.
    async fn find_all(&self) -> AppResult<Vec<Server>>;

    /// Distinct country values, sorted.
    async fn countries(&self) -> AppResult<Vec<String>>;

    /// Insert a new server.
    async fn create(&self, server: &Server) -> AppResult<()>;

    /// Merge `patch` into a server. Returns `None` if it does not exist.
    async fn update(&self, id: &ServerId, patch: &ServerPatch) -> AppResult<Option<Server>>;

    /// Remove a server. Returns `false` if it did not exist.
    async fn delete(&self, id: &ServerId) -> AppResult<bool>;

    /// Atomically add `delta` to a server's `current_connections`.
    ///
    /// A missing server is not an error.
    async fn adjust_connection_count(&self, id: &ServerId, delta: i32) -> AppResult<()>;

    /// Count all servers.
    async fn count(&self) -> AppResult<i64>;

    /// Count servers in the given status.
    async fn count_by_status(&self, status: ServerStatus) -> AppResult<i64>;
}

/// Persistence of authentication sessions.
#[async_trait]
pub trait SessionStore: Send + Sync + Debug + 'static {
    /// Delete every session of the session's user, then insert it.
    async fn replace_for_user(&self, session: &Session) -> AppResult<()>;

    /// Find a session by token, expired or not.
    async fn find_by_token(&self, token: &str) -> AppResult<Option<Session>>;

    /// Delete every session of a user. Returns the number removed.
    async fn delete_by_user(&self, user_id: &UserId) -> AppResult<u64>;

    /// Delete every session expired as of `now`. Returns the number removed.
    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

/// A server whose stored counter disagreed with its active connections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterDrift {
    /// The corrected server.
    pub server_id: ServerId,
    /// Its display name.
    pub server_name: String,
    /// Counter value before correction.
    pub recorded: i32,
    /// Number of active connections, now stored as the counter.
    pub actual: i32,
}

/// Persistence of the connection ledger.
#[async_trait]
pub trait ConnectionStore: Send + Sync + Debug + 'static {
    /// The user's active connection, if any.
    async fn find_active(&self, user_id: &UserId) -> AppResult<Option<Connection>>;

    /// The user's active connection annotated with its server.
    async fn find_active_view(&self, user_id: &UserId) -> AppResult<Option<ConnectionView>>;

    /// The user's connections, newest first, at most `limit`.
    async fn history(&self, user_id: &UserId, limit: i64) -> AppResult<Vec<ConnectionView>>;

    /// Open `connection` as one atomic unit.
    ///
    /// Closes the user's current active connection first (decrementing its
    /// server's counter), inserts the new record and increments the target
    /// server's counter. Returns the superseded connection, if there was one.
    ///
    /// With `enforce_capacity`, fails with InvalidState and changes nothing
    /// when the target server is full once the superseded seat is released.
    async fn open(
        &self,
        connection: &Connection,
        enforce_capacity: bool,
    ) -> AppResult<Option<Connection>>;

    /// Close the user's active connection at `now` as one atomic unit,
    /// decrementing its server's counter. Returns `None` if the user had
    /// no active connection.
    async fn close_active(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Connection>>;

    /// Count active connections across all users.
    async fn count_active(&self) -> AppResult<i64>;

    /// Count connections opened at or after `since`.
    async fn count_since(&self, since: DateTime<Utc>) -> AppResult<i64>;

    /// Recompute every server's counter from active connections and store
    /// the corrected values. Returns the servers that had drifted.
    async fn reconcile_counters(&self) -> AppResult<Vec<CounterDrift>>;
}

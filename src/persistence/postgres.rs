//! PostgreSQL implementation of the membership store.
//!
//! Every roster mutation runs in one transaction that starts by taking a
//! row lock on the event (`SELECT … FOR UPDATE`). Concurrent operations on
//! the same event queue on that lock, so the roster a closure sees is
//! always the committed state. The journal and the derived participant
//! count are written before `COMMIT`; any error drops the transaction.
//! Reads take no lock but run in a single `REPEATABLE READ` snapshot.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::MembershipStore;
use super::models::{
    EVENT_COLUMNS, EventRow, ParticipantRow, USER_COLUMNS, UserRow, WaitlistRow, event_from_row,
    participant_from_row, to_i32, user_from_row, waitlist_from_row,
};
use crate::config::GatewayConfig;
use crate::domain::{Event, EventId, EventRoster, RosterChange, User, UserId};
use crate::error::GatewayError;

/// PostgreSQL-backed store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool sized from `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] if the database is
    /// unreachable.
    pub async fn connect(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await
            .map_err(db_err)?;
        Ok(Self::new(pool))
    }

    /// Applies pending schema migrations from `migrations/`.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), GatewayError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))
    }
}

impl MembershipStore for PostgresStore {
    async fn insert_event(&self, event: Event) -> Result<Event, GatewayError> {
        sqlx::query(
            "INSERT INTO events (id, title, event_type, start_at, end_at, max_players, \
             current_players, min_skill, max_skill, court_ids, owner_id, notes, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(*event.id.as_uuid())
        .bind(&event.title)
        .bind(event.event_type.as_str())
        .bind(event.start)
        .bind(event.end)
        .bind(to_i32("max_players", event.max_players)?)
        .bind(to_i32("current_players", event.current_players)?)
        .bind(event.min_skill.as_deref())
        .bind(event.max_skill.as_deref())
        .bind(&event.court_ids)
        .bind(*event.owner.as_uuid())
        .bind(event.notes.as_deref())
        .bind(event.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(event)
    }

    async fn get_event(&self, id: EventId) -> Result<Event, GatewayError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .ok_or(GatewayError::EventNotFound(id))?;
        event_from_row(row)
    }

    async fn list_events(&self) -> Result<Vec<Event>, GatewayError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY start_at ASC, id ASC");
        let rows = sqlx::query_as::<_, EventRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.into_iter().map(event_from_row).collect()
    }

    async fn load_roster(&self, id: EventId) -> Result<EventRoster, GatewayError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        // The three reads below must see the same snapshot.
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        let roster = fetch_roster(&mut tx, id, false).await?;
        tx.commit().await.map_err(db_err)?;
        Ok(roster)
    }

    async fn with_roster<T, F>(&self, id: EventId, op: F) -> Result<T, GatewayError>
    where
        T: Send,
        F: FnOnce(&mut EventRoster) -> Result<T, GatewayError> + Send,
    {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        let mut roster = fetch_roster(&mut tx, id, true).await?;

        // An error from here on drops `tx`, which rolls it back.
        let value = op(&mut roster)?;

        for change in roster.take_journal() {
            apply_change(&mut tx, id, &change).await?;
        }
        sqlx::query("UPDATE events SET current_players = $2 WHERE id = $1")
            .bind(*id.as_uuid())
            .bind(to_i32("current_players", roster.participant_count())?)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;
        Ok(value)
    }

    async fn insert_user(&self, user: User) -> Result<User, GatewayError> {
        let result = sqlx::query(
            "INSERT INTO users (id, name, email, skill_level, role, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(*user.id.as_uuid())
        .bind(&user.name)
        .bind(user.email.as_deref())
        .bind(&user.skill_level)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(
                GatewayError::InvalidRequest("user or email is already registered".to_string()),
            ),
            Err(e) => Err(db_err(e)),
        }
    }

    async fn get_user(&self, id: UserId) -> Result<User, GatewayError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .ok_or(GatewayError::UserNotFound(id))?;
        user_from_row(row)
    }
}

/// Loads an event and both membership sets on `conn`, optionally taking
/// the event's row lock first.
async fn fetch_roster(
    conn: &mut PgConnection,
    id: EventId,
    lock: bool,
) -> Result<EventRoster, GatewayError> {
    let event_id: Uuid = *id.as_uuid();
    let sql = if lock {
        format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1 FOR UPDATE")
    } else {
        format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1")
    };
    let row = sqlx::query_as::<_, EventRow>(&sql)
        .bind(event_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_err)?
        .ok_or(GatewayError::EventNotFound(id))?;
    let event = event_from_row(row)?;

    let participants = sqlx::query_as::<_, ParticipantRow>(
        "SELECT event_id, user_id, joined_at FROM event_participants \
         WHERE event_id = $1 ORDER BY joined_at ASC",
    )
    .bind(event_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(db_err)?;

    let waitlist = sqlx::query_as::<_, WaitlistRow>(
        "SELECT event_id, user_id, joined_at, seq FROM event_waitlist \
         WHERE event_id = $1 ORDER BY joined_at ASC, seq ASC",
    )
    .bind(event_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(db_err)?;

    Ok(EventRoster::from_parts(
        event,
        participants.into_iter().map(participant_from_row).collect(),
        waitlist.into_iter().map(waitlist_from_row).collect(),
    ))
}

/// Writes one journaled roster change.
async fn apply_change(
    conn: &mut PgConnection,
    id: EventId,
    change: &RosterChange,
) -> Result<(), GatewayError> {
    let event_id: Uuid = *id.as_uuid();
    let query = match change {
        RosterChange::ParticipantAdded(p) => sqlx::query(
            "INSERT INTO event_participants (event_id, user_id, joined_at) VALUES ($1, $2, $3)",
        )
        .bind(event_id)
        .bind(*p.user_id.as_uuid())
        .bind(p.joined_at),
        RosterChange::ParticipantRemoved(user_id) => {
            sqlx::query("DELETE FROM event_participants WHERE event_id = $1 AND user_id = $2")
                .bind(event_id)
                .bind(*user_id.as_uuid())
        }
        RosterChange::WaitlistAdded(w) => sqlx::query(
            "INSERT INTO event_waitlist (event_id, user_id, joined_at, seq) VALUES ($1, $2, $3, $4)",
        )
        .bind(event_id)
        .bind(*w.user_id.as_uuid())
        .bind(w.joined_at)
        .bind(w.seq),
        RosterChange::WaitlistRemoved(user_id) => {
            sqlx::query("DELETE FROM event_waitlist WHERE event_id = $1 AND user_id = $2")
                .bind(event_id)
                .bind(*user_id.as_uuid())
        }
    };
    query.execute(&mut *conn).await.map_err(db_err)?;
    Ok(())
}

fn db_err(e: sqlx::Error) -> GatewayError {
    GatewayError::PersistenceError(e.to_string())
}

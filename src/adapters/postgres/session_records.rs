//! PostgreSQL implementation of RemoteSessionRecords.
//!
//! Rows live in the `sessions` table (see `migrations/`). A trigger on that
//! table publishes every insert, update and delete on the `session_changes`
//! channel; `watch` listens there and filters by user.

use std::collections::BTreeMap;

use async_trait::async_trait;
use futures::future;
use futures::stream::{BoxStream, StreamExt};
use serde::Deserialize;
use sqlx::postgres::{PgListener, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{SessionId, Timestamp, UserId};
use crate::ports::{
    ChangeKind, ChangeNotice, NewSessionRecord, RemoteSessionRecords, SessionRecord,
    SessionRecordPatch, StorageError,
};

/// Notification channel fed by the `sessions` trigger.
pub const CHANGE_CHANNEL: &str = "session_changes";

const SELECT_COLUMNS: &str =
    "id, user_id, title, summary, current_phase, answers, created_at, updated_at";

/// PostgreSQL session table.
#[derive(Clone)]
pub struct PostgresSessionRecords {
    pool: PgPool,
}

impl PostgresSessionRecords {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the bundled migrations.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::remote(format!("Failed to run migrations: {}", e)))
    }
}

fn db_error(action: &'static str) -> impl FnOnce(sqlx::Error) -> StorageError {
    move |e| StorageError::remote(format!("Failed to {}: {}", action, e))
}

#[async_trait]
impl RemoteSessionRecords for PostgresSessionRecords {
    async fn list(&self, user_id: &UserId) -> Result<Vec<SessionRecord>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM sessions WHERE user_id = $1 ORDER BY updated_at DESC",
            SELECT_COLUMNS
        ))
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list sessions"))?;

        // A row that does not decode is reported by the adapter as an
        // invalid record; keep the rest.
        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            match row_to_record(&row) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("Skipping undecodable session row: {}", e),
            }
        }
        Ok(records)
    }

    async fn get(&self, user_id: &UserId, id: &SessionId) -> Result<Option<SessionRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM sessions WHERE id = $1 AND user_id = $2",
            SELECT_COLUMNS
        ))
        .bind(id.as_uuid())
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("fetch session"))?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn insert(&self, record: NewSessionRecord) -> Result<SessionRecord, StorageError> {
        let now = Timestamp::now();
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO sessions (
                id, user_id, title, summary, current_phase, answers, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(SessionId::new().as_uuid())
        .bind(record.user_id.as_str())
        .bind(&record.title)
        .bind(&record.summary)
        .bind(&record.current_phase)
        .bind(Json(&record.answers))
        .bind(now.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("insert session"))?;

        row_to_record(&row)
    }

    async fn update(
        &self,
        user_id: &UserId,
        id: &SessionId,
        patch: SessionRecordPatch,
    ) -> Result<Option<SessionRecord>, StorageError> {
        let (summary_set, summary) = match patch.summary {
            Some(summary) => (true, summary),
            None => (false, None),
        };

        // updated_at moves strictly forward at millisecond precision, even
        // when two writes land within the same millisecond.
        let row = sqlx::query(&format!(
            r#"
            UPDATE sessions SET
                title = COALESCE($3, title),
                summary = CASE WHEN $4 THEN $5 ELSE summary END,
                current_phase = COALESCE($6, current_phase),
                answers = COALESCE($7, answers),
                updated_at = date_trunc('milliseconds',
                    GREATEST(clock_timestamp(), updated_at + interval '1 millisecond'))
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(id.as_uuid())
        .bind(user_id.as_str())
        .bind(patch.title)
        .bind(summary_set)
        .bind(summary)
        .bind(patch.current_phase)
        .bind(patch.answers.map(Json))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("update session"))?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn delete(&self, user_id: &UserId, id: &SessionId) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM sessions WHERE id = $1 AND user_id = $2")
            .bind(id.as_uuid())
            .bind(user_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_error("delete session"))?;
        Ok(())
    }

    async fn watch(&self, user_id: &UserId) -> Result<BoxStream<'static, ChangeNotice>, StorageError> {
        let mut listener = PgListener::connect_with(&self.pool)
            .await
            .map_err(db_error("open change listener"))?;
        listener
            .listen(CHANGE_CHANNEL)
            .await
            .map_err(db_error("listen for session changes"))?;

        let user_id = user_id.clone();
        let stream = listener
            .into_stream()
            .take_while(|item| {
                if let Err(e) = item {
                    tracing::warn!("Session change listener stopped: {}", e);
                }
                future::ready(item.is_ok())
            })
            .filter_map(move |item| {
                let notice = item
                    .ok()
                    .and_then(|notification| parse_notice(notification.payload()))
                    .filter(|notice| notice.user_id == user_id);
                future::ready(notice)
            })
            .boxed();
        Ok(stream)
    }
}

#[derive(Deserialize)]
struct ChangePayload {
    id: uuid::Uuid,
    user_id: String,
    op: String,
}

/// Parses a trigger payload such as
/// `{"id": "...", "user_id": "...", "op": "UPDATE"}`.
fn parse_notice(payload: &str) -> Option<ChangeNotice> {
    let payload: ChangePayload = match serde_json::from_str(payload) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!("Ignoring malformed session change payload: {}", e);
            return None;
        }
    };
    let kind = match payload.op.as_str() {
        "INSERT" => ChangeKind::Inserted,
        "UPDATE" => ChangeKind::Updated,
        "DELETE" => ChangeKind::Deleted,
        _ => return None,
    };
    Some(ChangeNotice {
        user_id: UserId::new(payload.user_id).ok()?,
        record_id: SessionId::from_uuid(payload.id),
        kind,
    })
}

fn row_to_record(row: &PgRow) -> Result<SessionRecord, StorageError> {
    let id: uuid::Uuid = row.try_get("id").map_err(db_error("read id"))?;
    let invalid = |e: sqlx::Error| StorageError::invalid_record(id, e.to_string());

    let user_id: String = row.try_get("user_id").map_err(invalid)?;
    let title: String = row.try_get("title").map_err(invalid)?;
    let summary: Option<String> = row.try_get("summary").map_err(invalid)?;
    let current_phase: String = row.try_get("current_phase").map_err(invalid)?;
    let answers: Json<BTreeMap<String, String>> = row.try_get("answers").map_err(invalid)?;
    let created_at: chrono::DateTime<chrono::Utc> = row.try_get("created_at").map_err(invalid)?;
    let updated_at: chrono::DateTime<chrono::Utc> = row.try_get("updated_at").map_err(invalid)?;

    Ok(SessionRecord {
        id: SessionId::from_uuid(id),
        user_id: UserId::new(user_id).map_err(|e| StorageError::invalid_record(id, e.to_string()))?,
        title,
        summary,
        current_phase,
        answers: answers.0,
        created_at: Timestamp::from_datetime(created_at),
        updated_at: Timestamp::from_datetime(updated_at),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trigger_payload() {
        let notice = parse_notice(
            r#"{"id":"12345678-1234-4123-8123-123456789012","user_id":"user-1","op":"UPDATE"}"#,
        )
        .unwrap();
        assert_eq!(notice.user_id.as_str(), "user-1");
        assert_eq!(notice.kind, ChangeKind::Updated);
        assert_eq!(
            notice.record_id.to_string(),
            "12345678-1234-4123-8123-123456789012"
        );
    }

    #[test]
    fn ignores_unknown_operations_and_garbage() {
        assert!(parse_notice(
            r#"{"id":"12345678-1234-4123-8123-123456789012","user_id":"u","op":"TRUNCATE"}"#
        )
        .is_none());
        assert!(parse_notice("not json").is_none());
    }
}

//! In-memory implementation of the remote session table.
//!
//! Clones share one table and one change channel, so two adapters built on
//! clones behave like two devices talking to the same backend. Outages and
//! latency can be injected for fallback tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::RwLock;

use crate::domain::foundation::{SessionId, Timestamp, UserId};
use crate::ports::{
    ChangeKind, ChangeNotice, NewSessionRecord, RemoteSessionRecords, SessionRecord,
    SessionRecordPatch, StorageError,
};

const CHANGE_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Default)]
struct Table {
    records: Vec<SessionRecord>,
    /// Last timestamp handed out; keeps server time strictly increasing.
    clock: Option<Timestamp>,
}

impl Table {
    fn tick(&mut self) -> Timestamp {
        let now = match &self.clock {
            Some(last) => Timestamp::now_after(last),
            None => Timestamp::now(),
        };
        self.clock = Some(now);
        now
    }
}

#[derive(Debug, Clone, Default)]
struct Faults {
    outage: Option<String>,
    latency: Option<Duration>,
}

/// Shared in-memory session table with a broadcast change feed.
#[derive(Debug, Clone)]
pub struct InMemorySessionRecords {
    table: Arc<RwLock<Table>>,
    changes: broadcast::Sender<ChangeNotice>,
    faults: Arc<RwLock<Faults>>,
}

impl InMemorySessionRecords {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            table: Arc::new(RwLock::new(Table::default())),
            changes,
            faults: Arc::new(RwLock::new(Faults::default())),
        }
    }

    /// Makes every call fail with `RemoteUnavailable` until cleared.
    pub async fn set_outage(&self, message: Option<&str>) {
        self.faults.write().await.outage = message.map(str::to_string);
    }

    /// Delays every call by `latency`.
    pub async fn set_latency(&self, latency: Option<Duration>) {
        self.faults.write().await.latency = latency;
    }

    /// Stores a record as-is, bypassing validation and timestamps.
    pub async fn insert_raw(&self, record: SessionRecord) {
        let notice = ChangeNotice {
            user_id: record.user_id.clone(),
            record_id: record.id,
            kind: ChangeKind::Inserted,
        };
        self.table.write().await.records.push(record);
        self.notify(notice);
    }

    /// Number of stored records across all users.
    pub async fn record_count(&self) -> usize {
        self.table.read().await.records.len()
    }

    async fn check_faults(&self) -> Result<(), StorageError> {
        let faults = self.faults.read().await.clone();
        if let Some(latency) = faults.latency {
            tokio::time::sleep(latency).await;
        }
        match faults.outage {
            Some(message) => Err(StorageError::RemoteUnavailable(message)),
            None => Ok(()),
        }
    }

    fn notify(&self, notice: ChangeNotice) {
        // No receivers is fine.
        let _ = self.changes.send(notice);
    }
}

impl Default for InMemorySessionRecords {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteSessionRecords for InMemorySessionRecords {
    async fn list(&self, user_id: &UserId) -> Result<Vec<SessionRecord>, StorageError> {
        self.check_faults().await?;
        let table = self.table.read().await;
        let mut records: Vec<SessionRecord> = table
            .records
            .iter()
            .filter(|r| &r.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(records)
    }

    async fn get(&self, user_id: &UserId, id: &SessionId) -> Result<Option<SessionRecord>, StorageError> {
        self.check_faults().await?;
        let table = self.table.read().await;
        Ok(table
            .records
            .iter()
            .find(|r| &r.id == id && &r.user_id == user_id)
            .cloned())
    }

    async fn insert(&self, record: NewSessionRecord) -> Result<SessionRecord, StorageError> {
        self.check_faults().await?;
        let stored = {
            let mut table = self.table.write().await;
            let now = table.tick();
            let stored = SessionRecord {
                id: SessionId::new(),
                user_id: record.user_id,
                title: record.title,
                summary: record.summary,
                current_phase: record.current_phase,
                answers: record.answers,
                created_at: now,
                updated_at: now,
            };
            table.records.push(stored.clone());
            stored
        };
        self.notify(ChangeNotice {
            user_id: stored.user_id.clone(),
            record_id: stored.id,
            kind: ChangeKind::Inserted,
        });
        Ok(stored)
    }

    async fn update(
        &self,
        user_id: &UserId,
        id: &SessionId,
        patch: SessionRecordPatch,
    ) -> Result<Option<SessionRecord>, StorageError> {
        self.check_faults().await?;
        let updated = {
            let mut table = self.table.write().await;
            let Some(index) = table
                .records
                .iter()
                .position(|r| &r.id == id && &r.user_id == user_id)
            else {
                return Ok(None);
            };
            let now = table.tick();
            let record = &mut table.records[index];
            if let Some(title) = patch.title {
                record.title = title;
            }
            if let Some(summary) = patch.summary {
                record.summary = summary;
            }
            if let Some(phase) = patch.current_phase {
                record.current_phase = phase;
            }
            if let Some(answers) = patch.answers {
                record.answers = answers;
            }
            record.updated_at = now;
            record.clone()
        };
        self.notify(ChangeNotice {
            user_id: updated.user_id.clone(),
            record_id: updated.id,
            kind: ChangeKind::Updated,
        });
        Ok(Some(updated))
    }

    async fn delete(&self, user_id: &UserId, id: &SessionId) -> Result<(), StorageError> {
        self.check_faults().await?;
        let removed = {
            let mut table = self.table.write().await;
            let before = table.records.len();
            table
                .records
                .retain(|r| !(&r.id == id && &r.user_id == user_id));
            table.records.len() != before
        };
        if removed {
            self.notify(ChangeNotice {
                user_id: user_id.clone(),
                record_id: *id,
                kind: ChangeKind::Deleted,
            });
        }
        Ok(())
    }

    async fn watch(&self, user_id: &UserId) -> Result<BoxStream<'static, ChangeNotice>, StorageError> {
        self.check_faults().await?;
        let receiver = self.changes.subscribe();
        let stream = stream::unfold((receiver, user_id.clone()), |(mut receiver, user_id)| async move {
            loop {
                match receiver.recv().await {
                    Ok(notice) if notice.user_id == user_id => return Some((notice, (receiver, user_id))),
                    Ok(_) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "Change feed lagged");
                        continue;
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        });
        Ok(stream.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn new_record(user_id: &str, title: &str) -> NewSessionRecord {
        NewSessionRecord {
            user_id: user(user_id),
            title: title.to_string(),
            summary: None,
            current_phase: "clarify".to_string(),
            answers: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_id_and_timestamps() {
        let records = InMemorySessionRecords::new();
        let stored = records.insert(new_record("u1", "Plan")).await.unwrap();
        assert_eq!(stored.created_at, stored.updated_at);
        assert_eq!(records.get(&user("u1"), &stored.id).await.unwrap(), Some(stored));
    }

    #[tokio::test]
    async fn update_moves_updated_at_forward() {
        let records = InMemorySessionRecords::new();
        let stored = records.insert(new_record("u1", "Plan")).await.unwrap();
        let patch = SessionRecordPatch {
            current_phase: Some("organize".to_string()),
            ..Default::default()
        };

        let updated = records.update(&user("u1"), &stored.id, patch).await.unwrap().unwrap();
        assert!(updated.updated_at.is_after(&stored.updated_at));
        assert_eq!(updated.current_phase, "organize");
        assert_eq!(updated.title, "Plan");
    }

    #[tokio::test]
    async fn other_users_records_are_invisible() {
        let records = InMemorySessionRecords::new();
        let stored = records.insert(new_record("u1", "Plan")).await.unwrap();

        assert!(records.list(&user("u2")).await.unwrap().is_empty());
        assert_eq!(records.get(&user("u2"), &stored.id).await.unwrap(), None);
        assert_eq!(
            records
                .update(&user("u2"), &stored.id, SessionRecordPatch::default())
                .await
                .unwrap(),
            None
        );
        records.delete(&user("u2"), &stored.id).await.unwrap();
        assert_eq!(records.record_count().await, 1);
    }

    #[tokio::test]
    async fn watch_filters_by_user() {
        let records = InMemorySessionRecords::new();
        let mut feed = records.watch(&user("u1")).await.unwrap();

        records.insert(new_record("u2", "Theirs")).await.unwrap();
        let mine = records.insert(new_record("u1", "Mine")).await.unwrap();

        let notice = feed.next().await.unwrap();
        assert_eq!(notice.record_id, mine.id);
        assert_eq!(notice.kind, ChangeKind::Inserted);
    }

    #[tokio::test]
    async fn outage_fails_every_call() {
        let records = InMemorySessionRecords::new();
        records.set_outage(Some("network down")).await;
        assert_eq!(
            records.list(&user("u1")).await.unwrap_err(),
            StorageError::RemoteUnavailable("network down".to_string())
        );
        records.set_outage(None).await;
        assert!(records.list(&user("u1")).await.is_ok());
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use time::OffsetDateTime;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, SessionStore};

/// Process-wide session records keyed by the cookie's session id.
///
/// The session layer pushes `expiry_date` forward on every response, so a
/// record only goes stale after a full idle period. Concurrent requests on
/// the same session are last-write-wins.
#[derive(Debug, Clone, Default)]
pub struct DashMapStore {
    records: Arc<DashMap<Id, Record>>,
}

impl DashMapStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cleanup_expired(&self) {
        let now = OffsetDateTime::now_utc();
        let before = self.records.len();
        self.records.retain(|_, record| record.expiry_date > now);
        let removed = before.saturating_sub(self.records.len());
        if removed > 0 {
            tracing::debug!("Removed {removed} expired session(s)");
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[async_trait]
impl SessionStore for DashMapStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        loop {
            match self.records.entry(record.id) {
                Entry::Occupied(_) => record.id = Id::default(),
                Entry::Vacant(slot) => {
                    slot.insert(record.clone());
                    break;
                }
            }
        }
        tracing::debug!(
            "Session created: id={}, store_size={}",
            record.id,
            self.records.len()
        );
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.records.insert(record.id, record.clone());
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let Some(entry) = self.records.get(session_id) else {
            return Ok(None);
        };
        if entry.expiry_date <= OffsetDateTime::now_utc() {
            drop(entry);
            self.records.remove(session_id);
            tracing::debug!("Session expired: id={session_id}");
            return Ok(None);
        }
        Ok(Some(entry.clone()))
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.records.remove(session_id);
        Ok(())
    }
}

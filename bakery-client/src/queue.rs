//! File-backed FIFO of writes waiting for the server

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use shared::models::{OrderCreate, OrderStatusUpdate, UserCreate, UserDelete, UserStatusUpdate};
use shared::util::now_millis;

use crate::ClientResult;

/// A write that can be replayed as-is
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum PendingWrite {
    RegisterUser(UserCreate),
    SetUserStatus(UserStatusUpdate),
    DeleteUser(UserDelete),
    PlaceOrder(OrderCreate),
    UpdateOrderStatus(OrderStatusUpdate),
}

impl PendingWrite {
    pub fn describe(&self) -> String {
        match self {
            PendingWrite::RegisterUser(req) => format!("register user {}", req.phone),
            PendingWrite::SetUserStatus(req) => format!("set status of user {}", req.id),
            PendingWrite::DeleteUser(req) => format!("delete user {}", req.id),
            PendingWrite::PlaceOrder(req) => match &req.id {
                Some(id) => format!("place order {id}"),
                None => "place order".to_string(),
            },
            PendingWrite::UpdateOrderStatus(req) => {
                format!("move order {} to {}", req.id, req.status)
            }
        }
    }
}

/// Queue entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedWrite {
    pub id: String,
    /// Epoch ms
    pub queued_at: i64,
    /// Replays that failed transiently
    #[serde(default)]
    pub attempts: u32,
    pub write: PendingWrite,
}

/// Queue persisted as one JSON array; an absent file is an empty queue
#[derive(Debug)]
pub struct WriteQueue {
    path: PathBuf,
    lock: Mutex<()>,
}

impl WriteQueue {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries, oldest first
    pub fn load(&self) -> ClientResult<Vec<QueuedWrite>> {
        let _guard = self.lock.lock();
        self.read_entries()
    }

    /// Append one write
    pub fn push(&self, write: PendingWrite) -> ClientResult<QueuedWrite> {
        let _guard = self.lock.lock();
        let entry = QueuedWrite {
            id: uuid::Uuid::new_v4().to_string(),
            queued_at: now_millis(),
            attempts: 0,
            write,
        };
        let mut entries = self.read_entries()?;
        entries.push(entry.clone());
        self.write_entries(&entries)?;
        Ok(entry)
    }

    /// Replace the whole queue
    pub fn save(&self, entries: &[QueuedWrite]) -> ClientResult<()> {
        let _guard = self.lock.lock();
        self.write_entries(entries)
    }

    /// Read-modify-write under the queue lock; `keep` may edit entries.
    /// Returns how many entries remain.
    pub fn retain(&self, mut keep: impl FnMut(&mut QueuedWrite) -> bool) -> ClientResult<usize> {
        let _guard = self.lock.lock();
        let mut entries = self.read_entries()?;
        entries.retain_mut(|entry| keep(entry));
        self.write_entries(&entries)?;
        Ok(entries.len())
    }

    pub fn len(&self) -> ClientResult<usize> {
        Ok(self.load()?.len())
    }

    pub fn is_empty(&self) -> ClientResult<bool> {
        Ok(self.len()? == 0)
    }

    pub fn clear(&self) -> ClientResult<()> {
        self.save(&[])
    }

    fn read_entries(&self) -> ClientResult<Vec<QueuedWrite>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let json = fs::read_to_string(&self.path)?;
        if json.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&json)?)
    }

    /// Written to a sibling file, then renamed over the queue
    fn write_entries(&self, entries: &[QueuedWrite]) -> ClientResult<()> {
        if entries.is_empty() {
            if self.path.exists() {
                fs::remove_file(&self.path)?;
            }
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

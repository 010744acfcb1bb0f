use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::ids::new_id;
use crate::lead::Lead;

const LEADS_FILE: &str = "leads.json";
const CHAT_FILE: &str = "chat-messages.json";
const LEAD_TRIGGER_FILE: &str = "new-lead-trigger.json";
const CHAT_TRIGGER_FILE: &str = "new-chat-trigger.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One stored turn of the website chat widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub session_id: String,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub responded: bool,
}

impl ChatMessage {
    pub fn new(session_id: &str, role: ChatRole, content: &str, responded: bool) -> Self {
        Self {
            id: new_id("msg"),
            session_id: session_id.to_string(),
            role,
            content: content.to_string(),
            timestamp: Utc::now(),
            responded,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to encode records: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Append-only list of records kept as one pretty-printed JSON array on disk.
///
/// Every append reads the whole file, pushes, and writes it back. Appends from
/// this process are serialized; other processes writing the same file can
/// still clobber each other.
pub struct JsonFile<T> {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
    _records: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonFile<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            write_lock: self.write_lock.clone(),
            _records: PhantomData,
        }
    }
}

impl<T> JsonFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Arc::new(Mutex::new(())),
            _records: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records. A missing or unparsable file reads as empty.
    pub async fn read_all(&self) -> Vec<T> {
        self.read_values()
            .await
            .into_iter()
            .filter_map(|v| match serde_json::from_value(v) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), "Skipping unreadable record: {e}");
                    None
                }
            })
            .collect()
    }

    /// Append one record. Returns the new record count.
    pub async fn append(&self, record: &T) -> Result<usize, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read_values().await;
        records.push(serde_json::to_value(record)?);
        write_json(&self.path, &records).await?;
        Ok(records.len())
    }

    /// Raw records, so an append never drops entries this build can't parse.
    async fn read_values(&self) -> Vec<serde_json::Value> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Failed to read store: {e}");
                return Vec::new();
            }
        };
        match serde_json::from_str(&contents) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Store is not a JSON array: {e}");
                Vec::new()
            }
        }
    }
}

/// Leads, chat history and trigger files under one data directory.
#[derive(Clone)]
pub struct Store {
    data_dir: PathBuf,
    pub leads: JsonFile<Lead>,
    pub chat: JsonFile<ChatMessage>,
}

impl Store {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            leads: JsonFile::new(data_dir.join(LEADS_FILE)),
            chat: JsonFile::new(data_dir.join(CHAT_FILE)),
            data_dir,
        }
    }

    /// Append a lead and drop the trigger file for the follow-up process.
    pub async fn record_lead(&self, lead: &Lead) -> Result<(), StoreError> {
        let count = self.leads.append(lead).await?;
        tracing::info!(lead_id = %lead.id, total = count, "Lead stored");
        self.write_trigger(LEAD_TRIGGER_FILE, lead).await
    }

    /// Append chat messages. The trigger file receives the first user message.
    pub async fn record_chat(&self, messages: &[ChatMessage]) -> Result<(), StoreError> {
        for message in messages {
            self.chat.append(message).await?;
        }
        if let Some(user) = messages.iter().find(|m| m.role == ChatRole::User) {
            self.write_trigger(CHAT_TRIGGER_FILE, user).await?;
        }
        Ok(())
    }

    async fn write_trigger<T: Serialize>(&self, name: &str, record: &T) -> Result<(), StoreError> {
        write_json(&self.data_dir.join(name), record).await
    }
}

async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| StoreError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
    }
    let body = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, body)
        .await
        .map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
}

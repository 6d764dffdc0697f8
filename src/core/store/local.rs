//! File-backed store: `chats.json` index plus one `chat_<id>.json` per chat.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{ChatRecord, MessageRecord, StoreError};
use crate::core::paths;

#[derive(Debug, Default, Serialize, Deserialize)]
struct IndexFile {
    chats: Vec<ChatRecord>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ChatFile {
    messages: Vec<MessageRecord>,
}

#[derive(Clone, Debug)]
pub struct LocalStore {
    dir: PathBuf,
}

fn validate_chat_id(id: &str) -> Result<(), StoreError> {
    let ok = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidChatId(id.to_string()))
    }
}

/// Read a JSON file; a missing file reads as the default value.
fn read_json<T: Default + for<'de> Deserialize<'de>>(path: &Path) -> Result<T, StoreError> {
    match fs::read_to_string(path) {
        Ok(data) => Ok(serde_json::from_str(&data)?),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(e.into()),
    }
}

/// Write via a temporary file and rename so readers never see half a file.
fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    fs::rename(tmp, path)?;
    Ok(())
}

impl LocalStore {
    /// Store rooted at the platform data directory (or `TEST_DATA_DIR`).
    pub fn open_default() -> Result<Self, StoreError> {
        paths::data_dir()
            .map(Self::new)
            .ok_or(StoreError::NoDataDir)
    }

    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn index_path(&self) -> PathBuf {
        self.dir.join("chats.json")
    }

    fn chat_path(&self, chat_id: &str) -> Result<PathBuf, StoreError> {
        validate_chat_id(chat_id)?;
        Ok(self.dir.join(format!("chat_{chat_id}.json")))
    }

    fn ensure_dir(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    pub(super) fn list_chats(&self, user_id: &str) -> Result<Vec<ChatRecord>, StoreError> {
        let index: IndexFile = read_json(&self.index_path())?;
        Ok(index
            .chats
            .into_iter()
            .filter(|c| c.user_id == user_id)
            .collect())
    }

    pub(super) fn list_messages(
        &self,
        chat_ids: &[String],
    ) -> Result<Vec<MessageRecord>, StoreError> {
        let mut all = Vec::new();
        for id in chat_ids {
            let file: ChatFile = read_json(&self.chat_path(id)?)?;
            all.extend(file.messages);
        }
        all.sort_by_key(|m| m.created_at);
        Ok(all)
    }

    pub(super) fn insert_chat(&self, chat: &ChatRecord) -> Result<(), StoreError> {
        validate_chat_id(&chat.chat_id)?;
        self.ensure_dir()?;
        let mut index: IndexFile = read_json(&self.index_path())?;
        if index.chats.iter().any(|c| c.chat_id == chat.chat_id) {
            return Err(StoreError::DuplicateChat(chat.chat_id.clone()));
        }
        index.chats.push(chat.clone());
        write_json_atomic(&self.index_path(), &index)
    }

    pub(super) fn insert_message(&self, message: &MessageRecord) -> Result<(), StoreError> {
        let path = self.chat_path(&message.chat_id)?;
        self.ensure_dir()?;
        let mut file: ChatFile = read_json(&path)?;
        file.messages.push(message.clone());
        write_json_atomic(&path, &file)
    }
}

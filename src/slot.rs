// Durable key-value slots backing the task list

use eyre::{Context, Result, eyre};
use fs2::FileExt;
use rusqlite::{Connection, OptionalExtension};
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A durable key-value storage surface
///
/// Each key holds one string value. `write` replaces the whole value: after it
/// returns, readers observe either the previous value or the new one.
pub trait Slot {
    /// Read the value stored under `key`, `None` when absent
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    fn write(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`; deleting an absent key is not an error
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<S: Slot + ?Sized> Slot for Box<S> {
    fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).write(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// In-process slot; contents vanish with the value
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    values: HashMap<String, String>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Slot for MemorySlot {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// Directory-backed slot: key `k` lives in `{dir}/k.json`
///
/// Writes go to a temp file which is synced and renamed over the target while
/// an exclusive lock on `{dir}/.lock` is held.
#[derive(Debug, Clone)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    /// Open (or create) a slot directory
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).context("Failed to create slot directory")?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }

    fn replace(tmp_path: &Path, path: &Path, value: &str) -> Result<()> {
        let mut tmp = File::create(tmp_path).context("Failed to create temp slot file")?;
        tmp.write_all(value.as_bytes())?;
        tmp.sync_all()?;
        drop(tmp);

        fs::rename(tmp_path, path).context("Failed to replace slot file")?;
        Ok(())
    }

    fn lock(&self) -> Result<File> {
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.dir.join(".lock"))
            .context("Failed to open slot lock file")?;
        lock_file.lock_exclusive().context("Failed to acquire file lock")?;
        Ok(lock_file)
    }
}

impl Slot for FileSlot {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Some(content))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp_path = self.dir.join(format!("{}.json.tmp", key));

        // Lock is released when the guard is dropped
        let _guard = self.lock()?;

        if let Err(e) = Self::replace(&tmp_path, &path, value) {
            // Leave no partial temp file behind
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }
        debug!(key, bytes = value.len(), path = ?path, "FileSlot::write: replaced");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let _guard = self.lock()?;
        if path.exists() {
            fs::remove_file(&path).context("Failed to remove slot file")?;
        }
        Ok(())
    }
}

/// SQLite-backed slot using a single `kv` table
pub struct SqliteSlot {
    db: Connection,
}

impl SqliteSlot {
    /// Open (or create) the database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create database directory")?;
        }
        let db = Connection::open(path).context("Failed to open SQLite database")?;
        Self::with_connection(db)
    }

    /// Wrap an existing connection, creating the schema if needed
    pub fn with_connection(db: Connection) -> Result<Self> {
        db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;
        Ok(Self { db })
    }
}

impl Slot for SqliteSlot {
    fn read(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        let value = self
            .db
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        let tx = self.db.transaction()?;
        tx.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            rusqlite::params![key, value],
        )?;
        tx.commit()?;
        debug!(key, bytes = value.len(), "SqliteSlot::write: replaced");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.db.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }
}

/// Validate a storage key
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(eyre!("Storage key cannot be empty"));
    }
    if key.len() > 64 {
        return Err(eyre!("Storage key too long: {} (max 64 chars)", key));
    }
    if !key.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')) {
        return Err(eyre!("Invalid storage key: {} (must be alphanumeric with _/-/.)", key));
    }
    if key.starts_with('.') {
        return Err(eyre!("Invalid storage key: {} (cannot start with '.')", key));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_slot_roundtrip() {
        let mut slot = MemorySlot::new();
        assert_eq!(slot.read("k").unwrap(), None);

        slot.write("k", "one").unwrap();
        slot.write("k", "two").unwrap();
        assert_eq!(slot.read("k").unwrap().as_deref(), Some("two"));

        slot.remove("k").unwrap();
        assert_eq!(slot.read("k").unwrap(), None);
        slot.remove("k").unwrap();
    }

    #[test]
    fn test_file_slot_creates_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("nested").join("store");

        let slot = FileSlot::open(&dir).unwrap();
        assert!(dir.exists());
        assert_eq!(slot.dir(), dir.as_path());
    }

    #[test]
    fn test_file_slot_write_replaces_value() {
        let temp = TempDir::new().unwrap();
        let mut slot = FileSlot::open(temp.path()).unwrap();

        slot.write("tasklist.items", "[1,2,3]").unwrap();
        slot.write("tasklist.items", "[]").unwrap();

        let path = temp.path().join("tasklist.items.json");
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
        assert_eq!(slot.read("tasklist.items").unwrap().as_deref(), Some("[]"));
        assert!(!temp.path().join("tasklist.items.json.tmp").exists());
    }

    #[test]
    fn test_file_slot_missing_key() {
        let temp = TempDir::new().unwrap();
        let slot = FileSlot::open(temp.path()).unwrap();
        assert_eq!(slot.read("absent").unwrap(), None);
    }

    #[test]
    fn test_file_slot_remove() {
        let temp = TempDir::new().unwrap();
        let mut slot = FileSlot::open(temp.path()).unwrap();

        slot.write("k", "v").unwrap();
        slot.remove("k").unwrap();
        assert_eq!(slot.read("k").unwrap(), None);
        slot.remove("k").unwrap();
    }

    #[test]
    fn test_file_slot_rejects_bad_keys() {
        let temp = TempDir::new().unwrap();
        let mut slot = FileSlot::open(temp.path()).unwrap();

        assert!(slot.write("", "v").is_err());
        assert!(slot.write("../escape", "v").is_err());
        assert!(slot.write(".lock", "v").is_err());
        assert!(slot.write(&"a".repeat(65), "v").is_err());
    }

    #[test]
    fn test_sqlite_slot_roundtrip() {
        let temp = TempDir::new().unwrap();
        let db_path = temp.path().join("tasks.db");

        {
            let mut slot = SqliteSlot::open(&db_path).unwrap();
            assert_eq!(slot.read("k").unwrap(), None);
            slot.write("k", "first").unwrap();
            slot.write("k", "second").unwrap();
        }

        // Reopen to make sure the value is durable
        let mut slot = SqliteSlot::open(&db_path).unwrap();
        assert_eq!(slot.read("k").unwrap().as_deref(), Some("second"));

        slot.remove("k").unwrap();
        assert_eq!(slot.read("k").unwrap(), None);
    }

    #[test]
    fn test_file_slot_failed_write_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let mut slot = FileSlot::open(temp.path()).unwrap();

        // A non-empty directory where the value file should go makes the rename fail
        let blocker = temp.path().join("k.json");
        fs::create_dir_all(blocker.join("inner")).unwrap();

        assert!(slot.write("k", "v").is_err());
        assert!(!temp.path().join("k.json.tmp").exists());
        assert!(blocker.is_dir());
    }

    #[test]
    fn test_sqlite_slot_rejects_bad_keys() {
        let temp = TempDir::new().unwrap();
        let mut slot = SqliteSlot::open(temp.path().join("tasks.db")).unwrap();

        assert!(slot.read("").is_err());
        assert!(slot.read("a/b").is_err());
        assert!(slot.write("a/b", "v").is_err());
        assert!(slot.remove("a/b").is_err());
        assert!(slot.read("tasklist.items").is_ok());
    }

    #[test]
    fn test_boxed_slot_delegates() {
        let mut slot: Box<dyn Slot> = Box::new(MemorySlot::new());
        slot.write("k", "v").unwrap();
        assert_eq!(slot.read("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("tasklist.items").is_ok());
        assert!(validate_key("my_list-2").is_ok());

        assert!(validate_key("").is_err());
        assert!(validate_key("a/b").is_err());
        assert!(validate_key(".hidden").is_err());
    }
}

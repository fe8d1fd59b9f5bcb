use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    errors::{Result, TrackerError},
    ledger::{LedgerTables, SCHEMA_VERSION},
    utils::persistence::write_atomic,
};

use super::TableStorage;

/// Single-file JSON persistence with atomic replace on every save.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TableStorage for JsonFileStorage {
    fn load(&self) -> Result<LedgerTables> {
        if !self.path.exists() {
            return Ok(LedgerTables::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let tables: LedgerTables = serde_json::from_str(&data)?;
        if tables.schema_version > SCHEMA_VERSION {
            return Err(TrackerError::Storage(format!(
                "ledger `{}` is from a newer schema version ({})",
                self.path.display(),
                tables.schema_version
            )));
        }
        Ok(tables)
    }

    fn save(&self, tables: &LedgerTables) -> Result<()> {
        let json = serde_json::to_string_pretty(tables)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_empty_tables() {
        let dir = tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("nested/ledger.json")).unwrap();

        let tables = storage.load().unwrap();
        assert!(tables.transactions.is_empty());
        assert_eq!(tables.next_transaction_id, 1);
    }

    #[test]
    fn saves_and_reloads_tables() {
        let dir = tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("ledger.json")).unwrap();
        let mut tables = LedgerTables::default();
        tables.next_transaction_id = 42;

        storage.save(&tables).unwrap();
        assert_eq!(storage.load().unwrap().next_transaction_id, 42);
    }

    #[test]
    fn rejects_newer_schema() {
        let dir = tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("ledger.json")).unwrap();
        fs::write(
            storage.path(),
            format!(r#"{{ "schema_version": {} }}"#, SCHEMA_VERSION + 1),
        )
        .unwrap();

        assert!(matches!(storage.load(), Err(TrackerError::Storage(_))));
    }
}

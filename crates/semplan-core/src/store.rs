//! Program state store with per-record persistence.
//!
//! Each of the five records is loaded independently; a missing or
//! unparseable record falls back to its default without affecting the
//! others. After a command commits, only the records it changed are saved.
//! Save failures are logged and the in-memory state stays authoritative.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Rejection;
use crate::placement::{Changes, Command};
use crate::state::{ProgramState, RecordKey, StoredRecords};
use crate::storage::MemoryStorage;
use crate::traits::Storage;

pub struct ProgramStore {
    state: ProgramState,
    storage: Arc<dyn Storage>,
}

impl ProgramStore {
    /// Load every record from `storage`, defaulting the ones that are
    /// absent or corrupt.
    ///
    /// A defaulted settings record is written back immediately so the
    /// date-derived program start stays fixed for the stored modules.
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let settings = load_record(storage.as_ref(), RecordKey::Settings);
        let settings_defaulted = settings.is_none();
        let records = StoredRecords {
            modules: load_record(storage.as_ref(), RecordKey::Modules),
            settings,
            active_semesters: load_record(storage.as_ref(), RecordKey::ActiveSemesters),
            visible_years: load_record(storage.as_ref(), RecordKey::VisibleYears),
            ui_toggles: load_record(storage.as_ref(), RecordKey::UiToggles),
        };
        let store = Self {
            state: ProgramState::from_records(records),
            storage,
        };
        if settings_defaulted {
            tracing::info!(
                "no stored settings, pinning program start {}",
                store.state.settings.program_start
            );
            store.save(RecordKey::Settings);
        }
        store
    }

    /// A store backed by [`MemoryStorage`].
    pub fn in_memory() -> Self {
        Self::load(Arc::new(MemoryStorage::new()))
    }

    pub fn state(&self) -> &ProgramState {
        &self.state
    }

    /// Apply a command and persist whatever it changed.
    pub fn execute(&mut self, command: Command) -> Result<Changes, Rejection> {
        let changes = self.state.apply(command)?;
        for key in &changes {
            self.save(*key);
        }
        Ok(changes)
    }

    /// Write every record, e.g. to materialise defaults on first run.
    pub fn save_all(&self) {
        for key in RecordKey::ALL {
            self.save(key);
        }
    }

    fn save(&self, key: RecordKey) {
        let state = &self.state;
        let encoded = match key {
            RecordKey::Modules => encode(&state.modules),
            RecordKey::Settings => encode(&state.settings),
            RecordKey::ActiveSemesters => encode(&state.active_semesters),
            RecordKey::VisibleYears => encode(&state.visible_years),
            RecordKey::UiToggles => encode(&state.ui_toggles),
        };

        let result = encoded.and_then(|json| self.storage.save(key.as_str(), &json));
        match result {
            Ok(()) => tracing::debug!("saved {key}"),
            Err(e) => tracing::error!("failed to save {key}: {e:#}"),
        }
    }
}

fn encode<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn load_record<T: DeserializeOwned>(storage: &dyn Storage, key: RecordKey) -> Option<T> {
    let raw = match storage.load(key.as_str()) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!("could not read {key}, using defaults: {e:#}");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("discarding corrupt {key} record: {e}");
            None
        }
    }
}

//! Serialization support for learned value tables.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::q_learning::q_table::ValueTable;

/// On-disk encoding, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFormat {
    /// Pretty-printed JSON (`.json`)
    Json,
    /// MessagePack (anything else)
    MessagePack,
}

impl SaveFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SaveFormat::Json,
            _ => SaveFormat::MessagePack,
        }
    }
}

/// Metadata describing how a table was trained
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    /// Number of self-play episodes
    pub episodes_trained: Option<usize>,
    /// Learning rate used for updates
    pub alpha: Option<f64>,
    /// Discount factor used for updates
    pub gamma: Option<f64>,
    /// Exploration rate at the start of training
    pub initial_epsilon: Option<f64>,
    /// Exploration rate after the last decay
    pub final_epsilon: Option<f64>,
    /// Random seed used (if any)
    pub seed: Option<u64>,
}

/// A value table together with its save-format version and metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedValueTable {
    pub version: u32,
    pub table: ValueTable,
    pub metadata: TrainingMetadata,
}

impl SavedValueTable {
    pub const VERSION: u32 = 1;

    pub fn new(table: ValueTable, metadata: TrainingMetadata) -> Self {
        Self {
            version: Self::VERSION,
            table,
            metadata,
        }
    }

    /// Unwrap the table, rejecting unknown format versions
    pub fn into_table(self) -> Result<ValueTable> {
        if self.version != Self::VERSION {
            return Err(anyhow!(
                "Unsupported value table format version: {}. Expected {}",
                self.version,
                Self::VERSION
            ));
        }
        Ok(self.table)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);

        match SaveFormat::from_path(path) {
            SaveFormat::Json => serde_json::to_writer_pretty(&mut writer, self)
                .context("Failed to serialize value table as JSON")?,
            SaveFormat::MessagePack => rmp_serde::encode::write(&mut writer, self)
                .context("Failed to serialize value table")?,
        }
        writer
            .flush()
            .with_context(|| format!("Failed to write file: {}", path.display()))?;

        log::info!(
            "saved {} states ({} values) to {}",
            self.table.state_count(),
            self.table.entry_count(),
            path.display()
        );
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?;
        let reader = BufReader::new(file);

        let saved: Self = match SaveFormat::from_path(path) {
            SaveFormat::Json => serde_json::from_reader(reader)
                .context("Failed to deserialize value table from JSON")?,
            SaveFormat::MessagePack => {
                rmp_serde::decode::from_read(reader).context("Failed to deserialize value table")?
            }
        };

        log::info!(
            "loaded {} states from {}",
            saved.table.state_count(),
            path.display()
        );
        Ok(saved)
    }
}

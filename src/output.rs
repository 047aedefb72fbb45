use crate::sweep::SweepPoint;
use anyhow::{Context, Result};
use log::{info, warn};
use segregation_common::SimulationResult;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Encoding used for the recorded history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Bincode,
    MessagePack,
}

impl OutputFormat {
    /// Parses a format name, falling back to JSON for unknown names.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "bincode" => OutputFormat::Bincode,
            "messagepack" | "msgpack" => OutputFormat::MessagePack,
            other => {
                warn!("Unknown output format: {}. Using JSON instead.", other);
                OutputFormat::Json
            }
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Bincode => "bin",
            OutputFormat::MessagePack => "msgpack",
        }
    }
}

/// Creates `dir` (and parents) if missing.
pub fn prepare_output_dir<P: AsRef<Path>>(dir: P) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).with_context(|| format!("Failed to create output directory '{}'", dir.display()))?;
    Ok(dir.to_path_buf())
}

/// Writes the whole result (history plus configuration echo) to `{dir}/{base}_history.{ext}`.
pub fn save_history(result: &SimulationResult, dir: &Path, base: &str, format: OutputFormat) -> Result<PathBuf> {
    let path = dir.join(format!("{}_history.{}", base, format.extension()));
    let file = File::create(&path).with_context(|| format!("Error creating history file '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);

    match format {
        OutputFormat::Json => serde_json::to_writer(&mut writer, result)
            .context("Error serializing history to JSON")?,
        OutputFormat::Bincode => bincode::serialize_into(&mut writer, result)
            .context("Error serializing history to bincode")?,
        OutputFormat::MessagePack => rmp_serde::encode::write(&mut writer, result)
            .context("Error serializing history to MessagePack")?,
    }
    writer.flush()?;

    info!("{} history entries saved to {}", result.history.len(), path.display());
    Ok(path)
}

/// Reads back a history file written by [`save_history`].
pub fn load_history(path: &Path, format: OutputFormat) -> Result<SimulationResult> {
    let file = File::open(path).with_context(|| format!("Failed to open history file '{}'", path.display()))?;
    let reader = BufReader::new(file);
    let result = match format {
        OutputFormat::Json => serde_json::from_reader(reader).context("Invalid JSON history")?,
        OutputFormat::Bincode => bincode::deserialize_from(reader).context("Invalid bincode history")?,
        OutputFormat::MessagePack => rmp_serde::decode::from_read(reader).context("Invalid MessagePack history")?,
    };
    Ok(result)
}

/// Writes the satisfaction curve as `iteration,satisfied,percent` rows.
pub fn save_satisfaction_csv(result: &SimulationResult, dir: &Path, base: &str) -> Result<PathBuf> {
    let path = dir.join(format!("{}_satisfaction.csv", base));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Error creating CSV file '{}'", path.display()))?;

    writer.write_record(["iteration", "satisfied", "percent"])?;
    for (i, (entry, pct)) in result.history.iter().zip(result.satisfaction_percentages()).enumerate() {
        writer.write_record(&[i.to_string(), entry.satisfied.to_string(), format!("{:.4}", pct)])?;
    }
    writer.flush()?;

    info!("Satisfaction curve saved to {}", path.display());
    Ok(path)
}

/// Writes one row per sweep point, with a header taken from the field names.
pub fn save_sweep_csv(points: &[SweepPoint], dir: &Path, base: &str) -> Result<PathBuf> {
    let path = dir.join(format!("{}_sweep.csv", base));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Error creating CSV file '{}'", path.display()))?;
    for point in points {
        writer.serialize(point)?;
    }
    writer.flush()?;

    info!("Sweep results saved to {}", path.display());
    Ok(path)
}

use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::TopoResult;

/// Writes `value` as pretty-printed JSON.
pub fn save_json<T: Serialize>(value: &T, path: impl AsRef<Path>) -> TopoResult<()> {
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(writer, value)?;
    Ok(())
}

/// Reads a value previously written by `save_json`.
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> TopoResult<T> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

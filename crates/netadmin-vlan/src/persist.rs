//! Whole-file JSON persistence for the VLAN collection.
//!
//! On-disk format: a single UTF-8 JSON array of [`Vlan`] objects followed by
//! a newline. Array order carries no meaning.
//!
//! Writes go to a temporary file in the same directory, are synced, and then
//! renamed over the target, so a crash leaves either the old or the new
//! collection on disk and never a torn one. The directory is synced after the
//! rename. An existing file's permissions carry over to its replacement.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::model::Vlan;

/// Read and decode the store file.
///
/// Records are returned as stored; validation is left to the caller.
pub fn read_records(path: &Path) -> StoreResult<Vec<Vlan>> {
    let data = fs::read(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let records: Vec<Vlan> = serde_json::from_slice(&data).map_err(|source| StoreError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), count = records.len(), "read vlan records");
    Ok(records)
}

/// Replace the store file with `records`.
pub fn write_records<'a, I>(path: &Path, records: I) -> StoreResult<()>
where
    I: IntoIterator<Item = &'a Vlan>,
{
    let records: Vec<&Vlan> = records.into_iter().collect();
    let mut data = serde_json::to_vec(&records).map_err(|source| StoreError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    data.push(b'\n');

    let write_err = |source: std::io::Error| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    match fs::metadata(path) {
        Ok(meta) => tmp
            .as_file()
            .set_permissions(meta.permissions())
            .map_err(write_err)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(write_err(e)),
    }
    {
        let mut writer = BufWriter::new(tmp.as_file());
        writer.write_all(&data).map_err(write_err)?;
        writer.flush().map_err(write_err)?;
    }
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    sync_dir(dir).map_err(write_err)?;

    debug!(path = %path.display(), count = records.len(), bytes = data.len(), "wrote vlan records");
    Ok(())
}

/// Make a rename in `dir` durable.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> std::io::Result<()> {
    fs::OpenOptions::new().read(true).open(dir)?.sync_all()
}

// Directory handles cannot be synced here; the rename is as durable as the
// platform makes it.
#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}

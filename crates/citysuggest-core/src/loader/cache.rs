// crates/citysuggest-core/src/loader/cache.rs
use super::{open_stream, CACHE_SUFFIX};
use crate::error::Result;
use crate::model::Catalog;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

pub(super) fn cache_path(source: &Path) -> PathBuf {
    let filename = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    source.with_file_name(format!("{filename}.{CACHE_SUFFIX}"))
}

/// The cached catalog, if the cache exists, is newer than the source and
/// decodes cleanly. Any failure just means "rebuild from source".
pub(super) fn read_if_fresh(source: &Path, cache: &Path) -> Option<Catalog> {
    if !is_fresh(source, cache) {
        return None;
    }
    match read(cache) {
        Ok(catalog) => {
            debug!(path = %cache.display(), cities = catalog.len(), "catalog cache hit");
            Some(catalog)
        }
        Err(e) => {
            debug!(path = %cache.display(), error = %e, "ignoring unreadable catalog cache");
            None
        }
    }
}

pub(super) fn read(path: &Path) -> Result<Catalog> {
    let reader = open_stream(path)?;
    let catalog: Catalog = bincode::deserialize_from(reader)?;
    catalog.validated()
}

pub(super) fn write(path: &Path, catalog: &Catalog) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, catalog)?;
    writer.flush()?;
    Ok(())
}

fn is_fresh(source: &Path, cache: &Path) -> bool {
    let Ok(cache_time) = fs::metadata(cache).and_then(|m| m.modified()) else {
        return false;
    };
    match fs::metadata(source).and_then(|m| m.modified()) {
        Ok(source_time) => source_time <= cache_time,
        Err(_) => false,
    }
}

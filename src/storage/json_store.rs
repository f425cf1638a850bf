//! Versioned JSON documents with atomic replace

use crate::utils::error::{Result, RouterError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::ffi::OsString;
use std::fs;
use std::io::{ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// On-disk layout: the body's fields flattened next to `version`
#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    #[serde(flatten)]
    body: &'a T,
}

/// Typed load/save of a versioned JSON document
///
/// `save` writes a sibling `*.tmp` file and renames it over the target, so a
/// crash leaves either the old or the new document, never a partial one.
/// `load` refuses documents written by a newer schema version.
#[derive(Debug, Clone, Copy)]
pub struct JsonStore<T> {
    version: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Store for documents at schema `version`
    pub const fn new(version: u32) -> Self {
        Self {
            version,
            _marker: PhantomData,
        }
    }

    /// Schema version written by this store
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Read the document at `path`, or `None` if the file does not exist
    ///
    /// A document without a `version` field is an error.
    pub fn load(&self, path: &Path) -> Result<Option<T>> {
        self.load_migrating(path, |_| {
            Err(RouterError::persistence(format!(
                "{:?} has no schema version",
                path
            )))
        })
    }

    /// Like [`JsonStore::load`], handing unversioned (schema 0) documents to
    /// `migrate` instead of failing
    pub fn load_migrating<F>(&self, path: &Path, migrate: F) -> Result<Option<T>>
    where
        F: FnOnce(serde_json::Value) -> Result<T>,
    {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut raw: serde_json::Value = serde_json::from_str(&content)?;
        let version = raw
            .as_object_mut()
            .ok_or_else(|| RouterError::persistence(format!("{:?} is not a JSON object", path)))?
            .remove("version");

        let Some(version) = version else {
            debug!("Migrating unversioned document {:?}", path);
            return migrate(raw).map(Some);
        };

        let found = version.as_u64().ok_or_else(|| {
            RouterError::persistence(format!("{:?} has an invalid schema version", path))
        })?;
        let found = u32::try_from(found).unwrap_or(u32::MAX);
        if found > self.version {
            return Err(RouterError::UnsupportedSchemaVersion {
                found,
                supported: self.version,
            });
        }

        let body = serde_json::from_value(raw)?;
        debug!("Loaded {:?} (schema v{})", path, found);
        Ok(Some(body))
    }

    /// Atomically replace the document at `path`
    pub fn save(&self, path: &Path, value: &T) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_vec_pretty(&EnvelopeRef {
            version: self.version,
            body: value,
        })?;

        let temp_path = sibling(path, ".tmp");
        let written = fs::File::create(&temp_path).and_then(|mut file| {
            file.write_all(&content)?;
            file.sync_all()
        });
        if let Err(e) = written.and_then(|_| fs::rename(&temp_path, path)) {
            let _ = fs::remove_file(&temp_path);
            return Err(RouterError::persistence(format!(
                "Failed to write {:?}: {}",
                path, e
            )));
        }

        debug!("Saved {:?}", path);
        Ok(())
    }

    /// Move an unreadable document aside to `*.corrupt` and return the new path
    pub fn quarantine(&self, path: &Path) -> Result<PathBuf> {
        let target = sibling(path, ".corrupt");
        fs::rename(path, &target)?;
        warn!("Moved unreadable store {:?} to {:?}", path, target);
        Ok(target)
    }
}

/// `path` with `suffix` appended to its file name
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

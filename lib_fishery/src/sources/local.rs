use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::errors::{FisheryError, FisheryResult};
use crate::routes::RouteName;

use super::{extract_collection, DataSource, RawCollection};

/// # Local Source
///
/// Alternative to the remote service that reads `{route}.json` from a local
/// cache directory. Same payload shape, same contract.
#[derive(Debug, Clone)]
pub struct LocalSource {
    data_dir: PathBuf,
}

impl LocalSource {
    /// Local source rooted at `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Directory searched for `{route}.json`.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Full path of the file backing `route`.
    pub fn path_for(&self, route: RouteName) -> PathBuf {
        self.data_dir.join(format!("{}.json", route))
    }
}

impl DataSource for LocalSource {
    fn name(&self) -> &str {
        "local"
    }

    fn origin(&self) -> String {
        self.data_dir.display().to_string()
    }

    fn get_data(&self, route: RouteName) -> FisheryResult<RawCollection> {
        let path = self.path_for(route);
        let raw = fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                FisheryError::NotFound(format!("{} does not exist", path.display()))
            }
            _ => FisheryError::NotFound(format!("{} could not be read: {}", path.display(), e)),
        })?;

        let body: Value = serde_json::from_str(&raw).map_err(|e| {
            FisheryError::Format(format!("{} is not valid JSON: {}", path.display(), e))
        })?;
        let records = extract_collection(route, body)?;
        log::info!(
            "Fetched {} {} records from local disk cache {}",
            records.len(),
            route,
            self.data_dir.display()
        );
        Ok(records)
    }
}

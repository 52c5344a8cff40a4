//! Dataset locations and the download cache

use crate::error::{DataError, Result};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Where an input dataset comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// Remote CSV, downloaded once into `cache`
    Url { url: String, cache: PathBuf },
    /// CSV already on disk
    Path(PathBuf),
}

impl DatasetSource {
    pub fn url(url: impl Into<String>, cache: impl Into<PathBuf>) -> Self {
        DatasetSource::Url {
            url: url.into(),
            cache: cache.into(),
        }
    }

    pub fn path(path: impl Into<PathBuf>) -> Self {
        DatasetSource::Path(path.into())
    }
}

/// Resolves a [`DatasetSource`] to a readable local file
#[derive(Debug, Clone)]
pub struct DatasetFetcher {
    timeout: Duration,
    refresh: bool,
}

impl Default for DatasetFetcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(60))
    }
}

impl DatasetFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            refresh: false,
        }
    }

    /// Re-download remote datasets even when a cached copy exists
    pub fn with_refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    /// Return a local path holding the dataset, downloading it if needed
    pub fn resolve(&self, source: &DatasetSource) -> Result<PathBuf> {
        match source {
            DatasetSource::Path(path) => {
                if !path.is_file() {
                    return Err(DataError::DataLoad(format!(
                        "dataset file not found: {}",
                        path.display()
                    )));
                }
                Ok(path.clone())
            }
            DatasetSource::Url { url, cache } => {
                if cache.is_file() && !self.refresh {
                    debug!(path = %cache.display(), "using cached dataset");
                    return Ok(cache.clone());
                }
                self.download(url, cache)?;
                Ok(cache.clone())
            }
        }
    }

    fn download(&self, url: &str, target: &Path) -> Result<()> {
        info!(%url, path = %target.display(), "downloading dataset");

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| DataError::DataLoad(e.to_string()))?;

        let mut response = client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| DataError::DataLoad(format!("request to {} failed: {}", url, e)))?;

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        // Partial downloads never land at the cache path
        let partial = target.with_extension("part");
        {
            let mut writer = BufWriter::new(File::create(&partial)?);
            response
                .copy_to(&mut writer)
                .map_err(|e| DataError::DataLoad(format!("reading {} failed: {}", url, e)))?;
        }
        fs::rename(&partial, target)?;

        debug!(path = %target.display(), "dataset cached");
        Ok(())
    }
}

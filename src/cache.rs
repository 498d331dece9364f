use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    core::{calendar::Month, measurement::Measurement},
    prelude::*,
};

/// Fetched measurements, one TOML file per month.
pub struct FileCache {
    root: PathBuf,
}

#[derive(Default, Serialize, Deserialize)]
struct MonthFile {
    #[serde(default)]
    measurements: Vec<Measurement>,
}

impl FileCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path(&self, month: Month, year: i32) -> PathBuf {
        self.root.join(format!("{year}-{:02}.toml", month.number()))
    }

    /// Cached measurements of the month, [`None`] if it has never been stored.
    #[instrument(skip(self), name = "Reading the cache…")]
    pub fn get(&self, month: Month, year: i32) -> Result<Option<Vec<Measurement>>> {
        let path = self.path(month, year);
        if !path.is_file() {
            return Ok(None);
        }
        let file: MonthFile = toml::from_str(&fs::read_to_string(&path)?)
            .with_context(|| format!("failed to parse `{}`", path.display()))?;
        Ok(Some(file.measurements))
    }

    /// Replace the whole month.
    #[instrument(
        skip(self, measurements),
        fields(n_measurements = measurements.len()),
        name = "Writing the cache…",
    )]
    pub fn put(&self, month: Month, year: i32, measurements: &[Measurement]) -> Result {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("failed to create `{}`", self.root.display()))?;
        let file = MonthFile { measurements: measurements.to_vec() };
        fs::write(self.path(month, year), toml::to_string(&file)?)?;
        Ok(())
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::measurement::fixtures;

    #[test]
    fn test_missing_month() -> Result {
        let directory = tempfile::tempdir()?;
        let cache = FileCache::new(directory.path());
        assert_eq!(cache.get(Month::Januar, 2023)?, None);
        Ok(())
    }

    #[test]
    fn test_put_get() -> Result {
        let directory = tempfile::tempdir()?;
        let cache = FileCache::new(directory.path().join("nested"));
        let measurements = fixtures::hourly((2023, 1, 1), 3, |index| index as f64 * 0.5);
        cache.put(Month::Januar, 2023, &measurements)?;
        assert!(cache.root().join("2023-01.toml").is_file());
        assert_eq!(cache.get(Month::Januar, 2023)?, Some(measurements));
        assert_eq!(cache.get(Month::Februar, 2023)?, None);
        Ok(())
    }

    #[test]
    fn test_put_replaces_month() -> Result {
        let directory = tempfile::tempdir()?;
        let cache = FileCache::new(directory.path());
        cache.put(Month::Mars, 2023, &fixtures::hourly((2023, 3, 1), 24, |_| 1.0))?;
        let measurements = fixtures::hourly((2023, 3, 1), 2, |_| 2.0);
        cache.put(Month::Mars, 2023, &measurements)?;
        assert_eq!(cache.get(Month::Mars, 2023)?, Some(measurements));

        cache.put(Month::Mars, 2023, &[])?;
        assert_eq!(cache.get(Month::Mars, 2023)?, Some(Vec::new()));
        Ok(())
    }
}

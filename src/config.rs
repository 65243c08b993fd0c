use std::path::PathBuf;

/// Where the pipeline reads and writes. Raw inputs live under `<base>/raw`,
/// clean tables under `<base>/clean`. The base directory is supplied by the
/// caller so the same binary runs against any mount point.
#[derive(Debug, Clone)]
pub struct Config {
    base: PathBuf,
}

impl Config {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Config { base: base.into() }
    }

    /// Path of a raw input file. `name` may contain subdirectories.
    pub fn raw(&self, name: &str) -> PathBuf {
        self.base.join("raw").join(name)
    }

    /// Path of a clean output file.
    pub fn clean(&self, name: &str) -> PathBuf {
        self.clean_dir().join(name)
    }

    pub fn clean_dir(&self) -> PathBuf {
        self.base.join("clean")
    }
}

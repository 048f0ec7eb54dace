// ⚙️ Import Configuration - where the timetable files and the database live

use crate::error::{ImportError, Result};
use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_DIR: &str = "datafiles";
pub const DEFAULT_DB_PATH: &str = "trains.sqlite";
pub const MAPPING_FILE_NAME: &str = "mapping.json";

pub const DATA_DIR_VAR: &str = "TIMETABLE_DATA_DIR";
pub const DB_PATH_VAR: &str = "TIMETABLE_DB_PATH";
pub const MAPPING_FILE_VAR: &str = "TIMETABLE_MAPPING_FILE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    /// Directory scanned for `*.xml` timetable files
    pub data_dir: PathBuf,
    /// SQLite database file
    pub db_path: PathBuf,
    /// Optional company mapping, usually `<data_dir>/mapping.json`
    pub mapping_file: PathBuf,
}

impl Default for ImportConfig {
    fn default() -> Self {
        ImportConfig::new(Path::new(".").join(DEFAULT_DATA_DIR), PathBuf::from(DEFAULT_DB_PATH))
    }
}

impl ImportConfig {
    /// Config with the mapping file placed inside `data_dir`
    pub fn new(data_dir: PathBuf, db_path: PathBuf) -> Self {
        let mapping_file = data_dir.join(MAPPING_FILE_NAME);
        ImportConfig {
            data_dir,
            db_path,
            mapping_file,
        }
    }

    /// Defaults, overridden by `TIMETABLE_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ImportConfig::default();
        let data_dir = lookup(DATA_DIR_VAR).map(PathBuf::from).unwrap_or(defaults.data_dir);
        let db_path = lookup(DB_PATH_VAR).map(PathBuf::from).unwrap_or(defaults.db_path);

        let mut config = ImportConfig::new(data_dir, db_path);
        if let Some(mapping) = lookup(MAPPING_FILE_VAR) {
            config.mapping_file = PathBuf::from(mapping);
        }
        config
    }

    /// Builder pattern: replace the data directory, keeping the mapping file beside it
    pub fn with_data_dir(self, data_dir: PathBuf) -> Self {
        let mut config = ImportConfig::new(data_dir, self.db_path);
        if self.mapping_file != self.data_dir.join(MAPPING_FILE_NAME) {
            config.mapping_file = self.mapping_file;
        }
        config
    }

    /// Builder pattern: replace the database path
    pub fn with_db_path(mut self, db_path: PathBuf) -> Self {
        self.db_path = db_path;
        self
    }

    /// Regular `*.xml` files in the data directory, sorted by path
    pub fn xml_files(&self) -> Result<Vec<PathBuf>> {
        let io_err = |source| ImportError::Io {
            path: self.data_dir.clone(),
            source,
        };

        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.data_dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "xml") {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;

    #[test]
    fn test_defaults() {
        let config = ImportConfig::default();
        assert_eq!(config.data_dir, Path::new("./datafiles"));
        assert_eq!(config.db_path, Path::new("trains.sqlite"));
        assert_eq!(config.mapping_file, Path::new("./datafiles/mapping.json"));
    }

    #[test]
    fn test_environment_overrides() {
        let vars: HashMap<&str, &str> =
            HashMap::from([(DATA_DIR_VAR, "/srv/mts"), (DB_PATH_VAR, "/var/db/t.sqlite")]);
        let config = ImportConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.data_dir, Path::new("/srv/mts"));
        assert_eq!(config.db_path, Path::new("/var/db/t.sqlite"));
        assert_eq!(config.mapping_file, Path::new("/srv/mts/mapping.json"));

        let vars: HashMap<&str, &str> = HashMap::from([(MAPPING_FILE_VAR, "/etc/map.json")]);
        let config = ImportConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.mapping_file, Path::new("/etc/map.json"));

        let config = config.with_data_dir(PathBuf::from("elsewhere"));
        assert_eq!(config.mapping_file, Path::new("/etc/map.json"));
    }

    #[test]
    fn test_xml_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.xml"), "<XmlMts/>").unwrap();
        fs::write(dir.path().join("a.xml"), "<XmlMts/>").unwrap();
        fs::write(dir.path().join("mapping.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("nested.xml")).unwrap();

        let config = ImportConfig::new(dir.path().to_path_buf(), PathBuf::from("t.sqlite"));
        let files = config.xml_files().unwrap();

        assert_eq!(files, vec![dir.path().join("a.xml"), dir.path().join("b.xml")]);
    }

    #[test]
    fn test_missing_data_dir_is_io_error() {
        let config = ImportConfig::new(PathBuf::from("/nonexistent/datafiles"), PathBuf::from("t.sqlite"));
        assert!(matches!(config.xml_files(), Err(ImportError::Io { .. })));
    }
}

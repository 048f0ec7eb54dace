// Timetable Import - Core Library
// Loads railway timetable XML dumps into SQLite, skipping rows already stored.

pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod importer;
pub mod index;
pub mod mapping;
pub mod parser;

// Re-export commonly used types
pub use config::ImportConfig;
pub use db::{open_database, setup_database, table_counts, TableCount, SCHEMA_VERSION};
pub use entities::{Company, CompanyName, CompanyResolver, Route, RouteSegment, Station, Train};
pub use error::{ImportError, Result};
pub use importer::{FileReport, ImportStats, Importer};
pub use index::{known_routes, known_segments, known_trains, StationIndex};
pub use mapping::{CompanyMapping, MappingTable};
pub use parser::train_number_from_str;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

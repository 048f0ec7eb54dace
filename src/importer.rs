// 📥 Hierarchical Importer - file → train → route → segment
//
// Every level checks the existence index of its scope before inserting, so a
// re-run over the same files writes nothing new. A key that is already
// present skips its whole subtree: children are never inspected.
//
// Transactions: the company row and the schema version commit on their own;
// everything else from one file commits together at the end of that file.

use crate::db::record_schema_version;
use crate::entities::{CompanyName, CompanyResolver};
use crate::error::{ImportError, Result};
use crate::index::{
    known_routes, known_segments, known_trains, RouteKey, SegmentKey, StationIndex, TrainKey,
};
use crate::mapping::MappingTable;
use crate::parser::{
    parse_timetable, read_route, read_segment, read_timetable, read_train, route_elements,
    route_id_of, segment_elements, sequence_of, train_elements, train_number_of,
};
use roxmltree::Node;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::AddAssign;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// ============================================================================
// IMPORT STATISTICS
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStats {
    pub files: usize,
    pub companies_added: usize,
    pub trains_added: usize,
    pub trains_skipped: usize,
    pub routes_added: usize,
    pub routes_skipped: usize,
    pub segments_added: usize,
    pub segments_skipped: usize,
    pub stations_added: usize,
}

impl ImportStats {
    pub fn rows_added(&self) -> usize {
        self.companies_added
            + self.trains_added
            + self.routes_added
            + self.segments_added
            + self.stations_added
    }
}

impl AddAssign for ImportStats {
    fn add_assign(&mut self, other: ImportStats) {
        self.files += other.files;
        self.companies_added += other.companies_added;
        self.trains_added += other.trains_added;
        self.trains_skipped += other.trains_skipped;
        self.routes_added += other.routes_added;
        self.routes_skipped += other.routes_skipped;
        self.segments_added += other.segments_added;
        self.segments_skipped += other.segments_skipped;
        self.stations_added += other.stations_added;
    }
}

/// Outcome of one source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub company: CompanyName,
    pub company_id: i64,
    pub stats: ImportStats,
}

// ============================================================================
// IMPORTER
// ============================================================================

/// Owns the run-wide state: company list and station index.
///
/// Train, route and segment indices are scoped to one file, train or route
/// and are passed down explicitly.
pub struct Importer<'c> {
    conn: &'c mut Connection,
    mappings: MappingTable,
    companies: CompanyResolver,
    stations: StationIndex,
}

impl<'c> Importer<'c> {
    /// Prepare a run: write the schema version and load the run-wide indices.
    ///
    /// The schema must already exist (see `db::setup_database`).
    pub fn new(conn: &'c mut Connection, mappings: MappingTable) -> Result<Self> {
        record_schema_version(conn)?;
        let companies = CompanyResolver::load(conn)?;
        let stations = StationIndex::load(conn)?;

        Ok(Importer {
            conn,
            mappings,
            companies,
            stations,
        })
    }

    /// Import every file in order; the first error stops the run
    pub fn import_files<P: AsRef<Path>>(&mut self, files: &[P]) -> Result<ImportStats> {
        let mut total = ImportStats::default();
        for file in files {
            total += self.import_file(file.as_ref())?.stats;
        }
        Ok(total)
    }

    pub fn import_file(&mut self, path: &Path) -> Result<FileReport> {
        let mut stats = ImportStats {
            files: 1,
            ..ImportStats::default()
        };

        let company = self.mappings.resolve(path);
        let (company_id, inserted) = self.companies.resolve(self.conn, &company)?;
        if inserted {
            stats.companies_added += 1;
        }

        let text = read_timetable(path)?;
        let doc = parse_timetable(path, &text)?;
        let trains = train_elements(path, &doc)?;

        info!(
            "Adding {}...",
            company
                .common_name
                .clone()
                .unwrap_or_else(|| path.display().to_string())
        );

        // Dropped without commit on error, rolling back this file's rows
        let tx = self.conn.transaction()?;
        let outcome = import_trains(&tx, &mut self.stations, &trains, company_id, &mut stats)
            .and_then(|()| tx.commit().map_err(ImportError::from));
        if let Err(err) = outcome {
            self.stations.discard();
            return Err(err);
        }
        self.stations.commit();

        info!(
            file = %path.display(),
            trains = stats.trains_added,
            routes = stats.routes_added,
            segments = stats.segments_added,
            stations = stats.stations_added,
            skipped_trains = stats.trains_skipped,
            "file imported"
        );

        Ok(FileReport {
            path: path.to_path_buf(),
            company,
            company_id,
            stats,
        })
    }

    pub fn stations(&self) -> &StationIndex {
        &self.stations
    }
}

// ============================================================================
// LEVELS
// ============================================================================

fn import_trains(
    conn: &Connection,
    stations: &mut StationIndex,
    trains: &[Node<'_, '_>],
    company_id: i64,
    stats: &mut ImportStats,
) -> Result<()> {
    let mut known = known_trains(conn)?;
    for &node in trains {
        import_train(conn, stations, &mut known, node, company_id, stats)?;
    }
    Ok(())
}

fn import_train(
    conn: &Connection,
    stations: &mut StationIndex,
    known_trains: &mut HashSet<TrainKey>,
    node: Node<'_, '_>,
    company_id: i64,
    stats: &mut ImportStats,
) -> Result<()> {
    let number = train_number_of(node)?;
    if known_trains.contains(&number) {
        debug!(train = number, "train already stored, skipping");
        stats.trains_skipped += 1;
        return Ok(());
    }

    let train = read_train(node, number, company_id)?;
    let mut known = known_routes(conn, Some(number))?;

    train.insert(conn)?;
    known_trains.insert(number);
    stats.trains_added += 1;

    for route in route_elements(node) {
        import_route(conn, stations, &mut known, route, number, stats)?;
    }

    Ok(())
}

fn import_route(
    conn: &Connection,
    stations: &mut StationIndex,
    known_routes: &mut HashSet<RouteKey>,
    node: Node<'_, '_>,
    train_number: i64,
    stats: &mut ImportStats,
) -> Result<()> {
    let route_id = route_id_of(node)?;
    if known_routes.contains(&(train_number, route_id)) {
        debug!(train = train_number, route = route_id, "route already stored, skipping");
        stats.routes_skipped += 1;
        return Ok(());
    }

    let route = read_route(node, train_number, route_id)?;
    let mut known = known_segments(conn, Some(train_number), Some(route_id))?;

    route.insert(conn)?;
    known_routes.insert(route.key());
    stats.routes_added += 1;

    for segment in segment_elements(node) {
        import_segment(conn, stations, &mut known, segment, train_number, route_id, stats)?;
    }

    Ok(())
}

fn import_segment(
    conn: &Connection,
    stations: &mut StationIndex,
    known_segments: &mut HashSet<SegmentKey>,
    node: Node<'_, '_>,
    train_number: i64,
    route_id: i64,
    stats: &mut ImportStats,
) -> Result<()> {
    let sequence = sequence_of(node)?;
    if known_segments.contains(&(train_number, route_id, sequence)) {
        debug!(train = train_number, route = route_id, sequence, "segment already stored, skipping");
        stats.segments_skipped += 1;
        return Ok(());
    }

    let segment = read_segment(node, train_number, route_id, sequence)?;
    segment.insert(conn)?;
    known_segments.insert(segment.key());
    stats.segments_added += 1;

    for (code, name) in segment.endpoints() {
        if stations.register(conn, code, name)? {
            stats.stations_added += 1;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_accumulate() {
        let mut total = ImportStats::default();
        total += ImportStats {
            files: 1,
            companies_added: 1,
            trains_added: 2,
            segments_added: 5,
            stations_added: 3,
            ..ImportStats::default()
        };
        total += ImportStats {
            files: 1,
            trains_skipped: 2,
            ..ImportStats::default()
        };

        assert_eq!(total.files, 2);
        assert_eq!(total.trains_added, 2);
        assert_eq!(total.trains_skipped, 2);
        assert_eq!(total.rows_added(), 11);
    }
}

// 🔍 Existence Index - natural keys already present in the store
//
// Each set is queried at the start of its parent scope and handed to the
// importer explicitly:
// - trains:   once per file
// - routes:   once per train
// - segments: once per route
// - stations: once per run, then grown in memory as each file commits

use crate::entities::Station;
use crate::error::Result;
use crate::parser::station_code;
use rusqlite::{params, Connection};
use std::collections::HashSet;
use tracing::debug;

pub type TrainKey = i64;
pub type RouteKey = (i64, i64);
pub type SegmentKey = (i64, i64, i64);

/// All stored train numbers
pub fn known_trains(conn: &Connection) -> Result<HashSet<TrainKey>> {
    let mut stmt = conn.prepare("SELECT Number FROM Trenuri")?;
    let keys = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<HashSet<_>, _>>()?;
    Ok(keys)
}

/// Stored (train, route id) pairs, optionally limited to one train
pub fn known_routes(conn: &Connection, train_number: Option<i64>) -> Result<HashSet<RouteKey>> {
    let keys = match train_number {
        None => {
            let mut stmt = conn.prepare("SELECT NumarTren, Id FROM Trase")?;
            let rows = stmt
                .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<std::result::Result<HashSet<_>, _>>()?;
            rows
        }
        Some(train) => {
            let mut stmt = conn.prepare("SELECT NumarTren, Id FROM Trase WHERE NumarTren = ?1")?;
            let rows = stmt
                .query_map(params![train], |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<std::result::Result<HashSet<_>, _>>()?;
            rows
        }
    };

    Ok(keys)
}

fn segment_key(row: &rusqlite::Row<'_>) -> rusqlite::Result<SegmentKey> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

/// Stored (train, route id, sequence) triples.
///
/// `route_id` only narrows the query when `train_number` is given too.
pub fn known_segments(
    conn: &Connection,
    train_number: Option<i64>,
    route_id: Option<i64>,
) -> Result<HashSet<SegmentKey>> {
    let keys = match (train_number, route_id) {
        (None, _) => {
            let mut stmt = conn.prepare("SELECT NumarTren, IdTrasa, Secventa FROM ElementeTrasa")?;
            let rows = stmt
                .query_map([], segment_key)?
                .collect::<std::result::Result<HashSet<_>, _>>()?;
            rows
        }
        (Some(train), None) => {
            let mut stmt = conn.prepare(
                "SELECT NumarTren, IdTrasa, Secventa FROM ElementeTrasa WHERE NumarTren = ?1",
            )?;
            let rows = stmt
                .query_map(params![train], segment_key)?
                .collect::<std::result::Result<HashSet<_>, _>>()?;
            rows
        }
        (Some(train), Some(route)) => {
            let mut stmt = conn.prepare(
                "SELECT NumarTren, IdTrasa, Secventa FROM ElementeTrasa
                 WHERE NumarTren = ?1 AND IdTrasa = ?2",
            )?;
            let rows = stmt
                .query_map(params![train, route], segment_key)?
                .collect::<std::result::Result<HashSet<_>, _>>()?;
            rows
        }
    };

    Ok(keys)
}

// ============================================================================
// STATION INDEX
// ============================================================================

/// Station codes known so far in this run.
///
/// Loaded from the store once. Codes the importer inserts are staged until
/// the file's transaction commits, then merged; a rolled-back file discards
/// them so the index never holds a code the store lacks.
pub struct StationIndex {
    codes: HashSet<i64>,
    staged: HashSet<i64>,
}

impl StationIndex {
    pub fn load(conn: &Connection) -> Result<Self> {
        let mut stmt = conn.prepare("SELECT CodStatie FROM Statii")?;
        let codes = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<HashSet<_>, _>>()?;
        Ok(StationIndex {
            codes,
            staged: HashSet::new(),
        })
    }

    pub fn contains(&self, code: i64) -> bool {
        self.codes.contains(&code) || self.staged.contains(&code)
    }

    pub fn len(&self) -> usize {
        self.codes.len() + self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty() && self.staged.is_empty()
    }

    /// Register the station behind a segment endpoint.
    ///
    /// Codes that are not purely numeric are ignored. Returns true when a
    /// new Statii row was written. The code stays staged until `commit`.
    pub fn register(&mut self, conn: &Connection, code_text: &str, name: &str) -> Result<bool> {
        let Some(code) = station_code(code_text) else {
            return Ok(false);
        };
        if self.contains(code) {
            return Ok(false);
        }

        Station::new(code, name).insert(conn)?;
        self.staged.insert(code);
        debug!(code, name, "new station");
        Ok(true)
    }

    /// Keep the staged codes once their rows are committed
    pub fn commit(&mut self) {
        self.codes.extend(self.staged.drain());
    }

    /// Forget the staged codes after a rollback
    pub fn discard(&mut self) {
        if !self.staged.is_empty() {
            debug!(count = self.staged.len(), "discarding uncommitted stations");
        }
        self.staged.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::setup_database;
    use crate::entities::station::find_stations;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO Trenuri (Number) VALUES (1), (2);
             INSERT INTO Trase (NumarTren, Id) VALUES (1, 1), (1, 2), (2, 1);
             INSERT INTO ElementeTrasa (NumarTren, IdTrasa, Secventa)
                VALUES (1, 1, 1), (1, 1, 2), (1, 2, 1), (2, 1, 1);
             INSERT INTO Statii (CodStatie, Denumire) VALUES (1000, 'A');",
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_known_trains() {
        let conn = setup();
        assert_eq!(known_trains(&conn).unwrap(), HashSet::from([1, 2]));
    }

    #[test]
    fn test_known_routes_scoping() {
        let conn = setup();
        assert_eq!(known_routes(&conn, None).unwrap().len(), 3);
        assert_eq!(
            known_routes(&conn, Some(1)).unwrap(),
            HashSet::from([(1, 1), (1, 2)])
        );
        assert!(known_routes(&conn, Some(99)).unwrap().is_empty());
    }

    #[test]
    fn test_known_segments_scoping() {
        let conn = setup();
        assert_eq!(known_segments(&conn, None, None).unwrap().len(), 4);
        assert_eq!(known_segments(&conn, Some(1), None).unwrap().len(), 3);
        assert_eq!(
            known_segments(&conn, Some(1), Some(1)).unwrap(),
            HashSet::from([(1, 1, 1), (1, 1, 2)])
        );
        // Route filter alone does not narrow the query
        assert_eq!(known_segments(&conn, None, Some(2)).unwrap().len(), 4);
    }

    #[test]
    fn test_station_index_registers_once() {
        let conn = setup();
        let mut stations = StationIndex::load(&conn).unwrap();
        assert_eq!(stations.len(), 1);

        assert!(!stations.register(&conn, "1000", "Other").unwrap());
        assert!(stations.register(&conn, "2000", "B").unwrap());
        assert!(!stations.register(&conn, "2000", "B again").unwrap());
        assert!(!stations.register(&conn, "N/A", "Nowhere").unwrap());
        assert!(!stations.register(&conn, "", "Empty").unwrap());

        assert!(stations.contains(2000));
        let stored = find_stations(&conn).unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].name, "A");
        assert_eq!(stored[1].name, "B");
    }

    #[test]
    fn test_station_index_discards_rolled_back_codes() {
        let mut conn = setup();
        let mut stations = StationIndex::load(&conn).unwrap();

        let tx = conn.transaction().unwrap();
        assert!(stations.register(&tx, "3000", "C").unwrap());
        assert!(stations.contains(3000));
        drop(tx);
        stations.discard();

        assert!(!stations.contains(3000));
        assert_eq!(stations.len(), 1);

        let tx = conn.transaction().unwrap();
        assert!(stations.register(&tx, "3000", "C").unwrap());
        tx.commit().unwrap();
        stations.commit();

        assert!(stations.contains(3000));
        assert_eq!(stations.len(), 2);
        assert_eq!(find_stations(&conn).unwrap().len(), 2);
    }
}

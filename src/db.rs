// 🗄️ Store Setup - SQLite schema, schema version, table counts
// Tables are created on first run and never altered afterwards.

use crate::error::Result;
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::{debug, info};

/// Version written to the Meta table
pub const SCHEMA_VERSION: i64 = 2;

/// Every table the importer owns, in creation order
pub const TABLES: [&str; 6] = [
    "Meta",
    "Companii",
    "Trenuri",
    "Trase",
    "ElementeTrasa",
    "Statii",
];

/// Open (or create) the database file and make sure the schema exists
pub fn open_database(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;

    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    setup_database(&conn)?;
    Ok(conn)
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Columns without a declared type keep whatever the XML gave us (text);
    // `int` columns let SQLite's affinity store numeric text as integers.
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS Meta (Versiune int);

        CREATE TABLE IF NOT EXISTS Companii (
            Id integer primary key,
            NumeLegal text,
            NumeComun text
        );

        CREATE TABLE IF NOT EXISTS Trenuri (
            Number integer primary key,
            IdCompanie int,
            CategorieTren,
            KmCum int,
            Lungime int,
            Numar,
            Operator,
            Proprietar,
            Putere,
            Rang,
            Servicii,
            Tonaj
        );

        CREATE TABLE IF NOT EXISTS Trase (
            NumarTren int,
            Id int,
            Tip,
            CodStatieInitiala int,
            CodStatieFinala int
        );

        CREATE TABLE IF NOT EXISTS ElementeTrasa (
            NumarTren int,
            IdTrasa int,
            Secventa int,
            Ajustari,
            CodStaDest,
            CodStaOrigine,
            DenStaDestinatie,
            DenStaOrigine,
            Km int,
            Lungime int,
            OraP int,
            OraS int,
            Rci,
            Rco,
            Restrictie,
            StationareSecunde int,
            TipOprire,
            Tonaj,
            VitezaLivret int
        );

        CREATE TABLE IF NOT EXISTS Statii (
            CodStatie integer primary key,
            Denumire text
        );",
    )?;

    Ok(())
}

/// Record the schema version, once per version.
///
/// Commits on its own, independent of any file transaction.
/// Returns true when a row was written.
pub fn record_schema_version(conn: &Connection) -> Result<bool> {
    let present: i64 = conn.query_row(
        "SELECT COUNT(*) FROM Meta WHERE Versiune = ?1",
        params![SCHEMA_VERSION],
        |row| row.get(0),
    )?;

    if present > 0 {
        debug!(version = SCHEMA_VERSION, "schema version already recorded");
        return Ok(false);
    }

    conn.execute("INSERT INTO Meta (Versiune) VALUES (?1)", params![SCHEMA_VERSION])?;
    info!(version = SCHEMA_VERSION, "recorded schema version");
    Ok(true)
}

/// Row count of a single table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCount {
    pub table: &'static str,
    pub rows: i64,
}

/// Row counts for every importer table
pub fn table_counts(conn: &Connection) -> Result<Vec<TableCount>> {
    TABLES
        .iter()
        .map(|&table| {
            let rows: i64 =
                conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
            Ok(TableCount { table, rows })
        })
        .collect()
}

// 🚉 Station Entity - one row of Statii
// Stations are never read from the XML directly; they are discovered
// from the origin/destination codes of route segments.

use crate::error::Result;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub code: i64,
    pub name: String,
}

impl Station {
    pub fn new(code: i64, name: &str) -> Self {
        Station {
            code,
            name: name.to_string(),
        }
    }

    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO Statii (CodStatie, Denumire) VALUES (?1, ?2)",
            params![self.code, self.name],
        )?;

        Ok(())
    }
}

/// All stations, ordered by code
pub fn find_stations(conn: &Connection) -> Result<Vec<Station>> {
    let mut stmt = conn.prepare("SELECT CodStatie, Denumire FROM Statii ORDER BY CodStatie")?;

    let stations = stmt
        .query_map([], |row| {
            Ok(Station {
                code: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(stations)
}

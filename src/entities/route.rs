// 🛤️ Route Entity - one row of Trase

use crate::error::Result;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

/// A `Trasa` element, keyed by (train number, route id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub train_number: i64,
    /// File-local route id
    pub id: i64,
    pub kind: String,
    pub origin_code: String,
    pub destination_code: String,
}

impl Route {
    pub fn key(&self) -> (i64, i64) {
        (self.train_number, self.id)
    }

    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO Trase (NumarTren, Id, Tip, CodStatieInitiala, CodStatieFinala)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                self.train_number,
                self.id,
                self.kind,
                self.origin_code,
                self.destination_code,
            ],
        )?;

        Ok(())
    }
}

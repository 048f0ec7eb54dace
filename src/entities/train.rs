// 🚆 Train Entity - one row of Trenuri

use crate::error::Result;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

/// A `Tren` element, keyed by its numeric train number.
///
/// Attribute values stay as text; `KmCum` and `Lungime` land in `int`
/// columns and are converted by SQLite's type affinity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Train {
    /// Leading digits of `raw_number`
    pub number: i64,
    pub company_id: i64,
    pub category: String,
    pub cumulative_km: String,
    pub length: String,
    /// `Numar` exactly as written in the source file
    pub raw_number: String,
    pub operator: String,
    pub owner: String,
    pub power: String,
    pub rank: String,
    pub services: String,
    pub tonnage: String,
}

impl Train {
    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO Trenuri (
                Number, IdCompanie, CategorieTren, KmCum, Lungime, Numar,
                Operator, Proprietar, Putere, Rang, Servicii, Tonaj
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                self.number,
                self.company_id,
                self.category,
                self.cumulative_km,
                self.length,
                self.raw_number,
                self.operator,
                self.owner,
                self.power,
                self.rank,
                self.services,
                self.tonnage,
            ],
        )?;

        Ok(())
    }
}

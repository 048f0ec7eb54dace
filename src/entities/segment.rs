// 📍 Route Segment Entity - one row of ElementeTrasa
// One ordered leg of a route between two stations.

use crate::error::Result;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSegment {
    // ========================================================================
    // NATURAL KEY (train number, route id, sequence)
    // ========================================================================
    pub train_number: i64,
    pub route_id: i64,
    pub sequence: i64,

    // ========================================================================
    // ATTRIBUTES (passed through as text)
    // ========================================================================
    pub adjustments: String,
    pub destination_code: String,
    pub origin_code: String,
    pub destination_name: String,
    pub origin_name: String,
    pub km: String,
    pub length: String,
    /// `OraP`
    pub departure: String,
    /// `OraS`
    pub arrival: String,
    pub rci: String,
    pub rco: String,
    pub restriction: String,
    pub dwell_seconds: String,
    pub stop_type: String,
    pub tonnage: String,
    pub timetable_speed: String,
}

impl RouteSegment {
    pub fn key(&self) -> (i64, i64, i64) {
        (self.train_number, self.route_id, self.sequence)
    }

    /// Origin then destination, as (code text, station name)
    pub fn endpoints(&self) -> [(&str, &str); 2] {
        [
            (self.origin_code.as_str(), self.origin_name.as_str()),
            (self.destination_code.as_str(), self.destination_name.as_str()),
        ]
    }

    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO ElementeTrasa (
                NumarTren, IdTrasa, Secventa, Ajustari, CodStaDest, CodStaOrigine,
                DenStaDestinatie, DenStaOrigine, Km, Lungime, OraP, OraS,
                Rci, Rco, Restrictie, StationareSecunde, TipOprire, Tonaj, VitezaLivret
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
            params![
                self.train_number,
                self.route_id,
                self.sequence,
                self.adjustments,
                self.destination_code,
                self.origin_code,
                self.destination_name,
                self.origin_name,
                self.km,
                self.length,
                self.departure,
                self.arrival,
                self.rci,
                self.rco,
                self.restriction,
                self.dwell_seconds,
                self.stop_type,
                self.tonnage,
                self.timetable_speed,
            ],
        )?;

        Ok(())
    }
}

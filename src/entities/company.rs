// 🏢 Company Entity - Stable identity for the operator behind a source file
//
// A company is identified by its (legal name, common name) pair. Both halves
// may be absent: (NULL, NULL) is the "unknown company" and is matched like
// any other pair, so every unmapped file shares one row.

use crate::error::Result;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use tracing::info;

// ============================================================================
// COMPANY NAME (natural key)
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompanyName {
    pub legal_name: Option<String>,
    pub common_name: Option<String>,
}

impl CompanyName {
    pub fn new(legal_name: Option<&str>, common_name: Option<&str>) -> Self {
        CompanyName {
            legal_name: legal_name.map(str::to_string),
            common_name: common_name.map(str::to_string),
        }
    }

    /// The unknown company
    pub fn unknown() -> Self {
        CompanyName::default()
    }

    pub fn is_unknown(&self) -> bool {
        self.legal_name.is_none() && self.common_name.is_none()
    }
}

// ============================================================================
// COMPANY ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Assigned by the store on insert
    pub id: i64,
    pub name: CompanyName,
}

impl Company {
    pub fn matches(&self, name: &CompanyName) -> bool {
        self.name == *name
    }
}

/// Insert a company row, committing on its own. Returns the new id.
pub fn insert_company(conn: &Connection, name: &CompanyName) -> Result<i64> {
    conn.execute(
        "INSERT INTO Companii (NumeLegal, NumeComun) VALUES (?1, ?2)",
        params![name.legal_name, name.common_name],
    )?;

    Ok(conn.last_insert_rowid())
}

/// All companies, ordered by id
pub fn find_companies(conn: &Connection) -> Result<Vec<Company>> {
    let mut stmt = conn.prepare("SELECT Id, NumeLegal, NumeComun FROM Companii ORDER BY Id")?;

    let companies = stmt
        .query_map([], |row| {
            Ok(Company {
                id: row.get(0)?,
                name: CompanyName {
                    legal_name: row.get(1)?,
                    common_name: row.get(2)?,
                },
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(companies)
}

// ============================================================================
// COMPANY RESOLVER
// ============================================================================

/// Companies known to the store, loaded once and refreshed after each insert
pub struct CompanyResolver {
    companies: Vec<Company>,
}

impl CompanyResolver {
    pub fn load(conn: &Connection) -> Result<Self> {
        Ok(CompanyResolver {
            companies: find_companies(conn)?,
        })
    }

    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    fn lookup(&self, name: &CompanyName) -> Option<i64> {
        self.companies.iter().find(|c| c.matches(name)).map(|c| c.id)
    }

    /// Id of the company with exactly this name pair, inserting it if new.
    ///
    /// The second value is true when a row was inserted.
    pub fn resolve(&mut self, conn: &Connection, name: &CompanyName) -> Result<(i64, bool)> {
        if let Some(id) = self.lookup(name) {
            return Ok((id, false));
        }

        insert_company(conn, name)?;
        self.companies = find_companies(conn)?;

        let id = self
            .lookup(name)
            .ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        info!(
            company_id = id,
            legal_name = name.legal_name.as_deref().unwrap_or("-"),
            common_name = name.common_name.as_deref().unwrap_or("-"),
            "registered new company"
        );
        Ok((id, true))
    }
}

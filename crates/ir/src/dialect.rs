// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Dialect Support
//!
//! The generator never interprets SQL, so dialects only matter at the edges:
//! which live catalog answers metadata queries, how column types are
//! normalised, and which connection-string scheme is expected.
//!
//! ## Dialect Families
//!
//! - **MySQL Family**: MySQL, TiDB, MariaDB (`mysql://`)
//! - **PostgreSQL Family**: PostgreSQL, CockroachDB (`postgres://`, `postgresql://`)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Supported SQL dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Dialect {
    /// MySQL (5.7, 8.0)
    MySQL,
    /// PostgreSQL (12, 14, 15+)
    PostgreSQL,
    /// TiDB (MySQL wire compatible)
    TiDB,
    /// MariaDB (MySQL wire compatible)
    MariaDB,
    /// CockroachDB (PostgreSQL wire compatible)
    CockroachDB,
}

impl Dialect {
    /// Returns the family this dialect belongs to
    pub fn family(&self) -> DialectFamily {
        match self {
            Dialect::MySQL | Dialect::TiDB | Dialect::MariaDB => DialectFamily::MySQL,
            Dialect::PostgreSQL | Dialect::CockroachDB => DialectFamily::PostgreSQL,
        }
    }

    /// Lowercase name used in configuration files
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::MySQL => "mysql",
            Dialect::PostgreSQL => "postgresql",
            Dialect::TiDB => "tidb",
            Dialect::MariaDB => "mariadb",
            Dialect::CockroachDB => "cockroachdb",
        }
    }

    /// Check whether a connection string uses a scheme this dialect accepts
    pub fn accepts_connection_string(&self, conn: &str) -> bool {
        match self.family() {
            DialectFamily::MySQL => conn.starts_with("mysql://"),
            DialectFamily::PostgreSQL => {
                conn.starts_with("postgres://") || conn.starts_with("postgresql://")
            }
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a dialect name is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dialect: {0}")]
pub struct DialectParseError(pub String);

impl FromStr for Dialect {
    type Err = DialectParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" => Ok(Dialect::MySQL),
            "postgresql" | "postgres" | "pg" => Ok(Dialect::PostgreSQL),
            "tidb" => Ok(Dialect::TiDB),
            "mariadb" => Ok(Dialect::MariaDB),
            "cockroachdb" | "cockroach" => Ok(Dialect::CockroachDB),
            _ => Err(DialectParseError(s.to_string())),
        }
    }
}

/// Dialect family groupings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DialectFamily {
    MySQL,
    PostgreSQL,
}

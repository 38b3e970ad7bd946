// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::format::{Item, StrftimeItems};
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::{LedgerError, Result};
use crate::models::Config;

pub const KEYS: &[&str] = &["setup_completed", "date_format", "currency_symbol", "week_start"];

pub fn load(conn: &Connection) -> Result<Config> {
    let cfg = conn
        .query_row(
            "SELECT id, setup_completed, date_format, currency_symbol, week_start FROM config WHERE id=1",
            [],
            |r| {
                Ok(Config {
                    id: r.get(0)?,
                    setup_completed: r.get(1)?,
                    date_format: r.get(2)?,
                    currency_symbol: r.get(3)?,
                    week_start: r.get(4)?,
                })
            },
        )
        .optional()?;
    Ok(cfg.unwrap_or_default())
}

pub fn save(conn: &Connection, cfg: &Config) -> Result<()> {
    conn.execute(
        "INSERT INTO config(id, setup_completed, date_format, currency_symbol, week_start)
         VALUES (1, ?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET setup_completed=excluded.setup_completed,
             date_format=excluded.date_format, currency_symbol=excluded.currency_symbol,
             week_start=excluded.week_start",
        params![
            cfg.setup_completed,
            cfg.date_format,
            cfg.currency_symbol,
            cfg.week_start
        ],
    )?;
    Ok(())
}

/// Sets one display preference by name.
pub fn set(conn: &Connection, key: &str, value: &str) -> Result<Config> {
    let mut cfg = load(conn)?;
    let value = value.trim();
    match key.trim() {
        "setup_completed" => {
            cfg.setup_completed = match value.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(LedgerError::Validation(format!(
                        "setup_completed expects true|false, got '{}'",
                        value
                    )));
                }
            }
        }
        "date_format" => {
            let malformed = StrftimeItems::new(value).any(|item| matches!(item, Item::Error));
            if value.is_empty() || malformed {
                return Err(LedgerError::Validation(format!(
                    "date_format '{}' is not a valid strftime pattern",
                    value
                )));
            }
            cfg.date_format = value.to_string();
        }
        "currency_symbol" => cfg.currency_symbol = value.to_string(),
        "week_start" => {
            let v = value.to_ascii_lowercase();
            if v != "monday" && v != "sunday" {
                return Err(LedgerError::Validation(format!(
                    "week_start expects monday|sunday, got '{}'",
                    value
                )));
            }
            cfg.week_start = v;
        }
        other => {
            return Err(LedgerError::Validation(format!(
                "unknown config key '{}', expected one of {}",
                other,
                KEYS.join(", ")
            )));
        }
    }
    save(conn, &cfg)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_validates_and_persists() {
        let conn = crate::db::open_in_memory().unwrap();
        assert_eq!(load(&conn).unwrap(), Config::default());

        let cfg = set(&conn, "date_format", "%d/%m/%Y").unwrap();
        assert_eq!(cfg.date_format, "%d/%m/%Y");
        assert_eq!(load(&conn).unwrap().date_format, "%d/%m/%Y");

        assert!(set(&conn, "date_format", "%Q").is_err());
        assert!(set(&conn, "week_start", "friday").is_err());
        assert!(set(&conn, "colour", "blue").is_err());
        assert!(set(&conn, "setup_completed", "yes").unwrap().setup_completed);
    }
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use std::path::Path;

use crate::budgets::{self, RenewalReport};
use crate::db;
use crate::models::Config;
use crate::store;

/// Source of "today" for expiry checks and month-to-date windows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    #[default]
    System,
    Fixed(NaiveDateTime),
}

impl Clock {
    pub fn now(&self) -> NaiveDateTime {
        match self {
            Clock::System => Local::now().naive_local(),
            Clock::Fixed(at) => *at,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Everything a command needs: the store connection, the loaded display
/// config and the clock. Built once in `main` and passed down explicitly.
pub struct AppContext {
    pub conn: Connection,
    pub config: Config,
    pub clock: Clock,
}

impl AppContext {
    pub fn new(conn: Connection, clock: Clock) -> Result<Self> {
        let config = store::config::load(&conn)?;
        Ok(AppContext {
            conn,
            config,
            clock,
        })
    }

    pub fn open_default() -> Result<Self> {
        Self::new(db::open_or_init()?, Clock::System)
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        Self::new(db::open_at(path)?, Clock::System)
    }

    pub fn in_memory(clock: Clock) -> Result<Self> {
        Self::new(db::open_in_memory()?, clock)
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn reload_config(&mut self) -> Result<()> {
        self.config = store::config::load(&self.conn)?;
        Ok(())
    }

    /// Start-up hook: renews repeating budgets whose period has ended.
    pub fn on_load(&self) -> Result<RenewalReport> {
        let report = budgets::renew_expired_budgets(&self.conn, self.today(), self.clock.now())?;
        if !report.renewed.is_empty() || !report.errors.is_empty() {
            tracing::info!(
                renewed = report.renewed.len(),
                errors = report.errors.len(),
                "budget renewal on load"
            );
        }
        Ok(report)
    }
}

// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod asset_categories;
pub mod assets;
pub mod backup;
pub mod budgets;
pub mod categories;
pub mod config;
pub mod doctor;
pub mod exporter;
pub mod reports;
pub mod transactions;

use crate::context::AppContext;

/// Routes a parsed command line to its handler. Returns false when no
/// handler matched.
pub fn dispatch(ctx: &mut AppContext, matches: &clap::ArgMatches) -> anyhow::Result<bool> {
    match matches.subcommand() {
        Some(("asset", sub)) => assets::handle(ctx, sub)?,
        Some(("asset-category", sub)) => asset_categories::handle(ctx, sub)?,
        Some(("category", sub)) => categories::handle(ctx, sub)?,
        Some(("tx", sub)) => transactions::handle(ctx, sub)?,
        Some(("budget", sub)) => budgets::handle(ctx, sub)?,
        Some(("report", sub)) => reports::handle(ctx, sub)?,
        Some(("config", sub)) => config::handle(ctx, sub)?,
        Some(("backup", sub)) => backup::handle(ctx, sub)?,
        Some(("export", sub)) => exporter::handle(ctx, sub)?,
        Some(("doctor", sub)) => doctor::handle(ctx, sub)?,
        _ => return Ok(false),
    }
    Ok(true)
}

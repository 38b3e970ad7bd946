// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::backup::{Snapshot, export_snapshot, import_snapshot};
use crate::context::AppContext;
use anyhow::{Context, Result};

pub fn handle(ctx: &mut AppContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("export", sub)) => {
            let out = sub.get_one::<String>("out").unwrap().trim();
            let snapshot = export_snapshot(&ctx.conn)?;
            std::fs::write(out, serde_json::to_string_pretty(&snapshot)?)
                .with_context(|| format!("Write snapshot to {}", out))?;
            println!(
                "Exported {} assets, {} transactions, {} budgets to {}",
                snapshot.assets.len(),
                snapshot.transactions.len(),
                snapshot.budgets.len(),
                out
            );
        }
        Some(("import", sub)) => {
            let path = sub.get_one::<String>("path").unwrap().trim();
            let raw =
                std::fs::read_to_string(path).with_context(|| format!("Read snapshot {}", path))?;
            let snapshot: Snapshot = serde_json::from_str(&raw)
                .with_context(|| format!("Parse snapshot {}", path))?;
            let reports = import_snapshot(&mut ctx.conn, &snapshot)?;
            ctx.reload_config()?;
            let drifted = reports.iter().filter(|r| r.drifted()).count();
            println!(
                "Imported {} from {} ({} asset balance(s) reconciled with the transaction log)",
                snapshot.transactions.len(),
                path,
                drifted
            );
        }
        _ => {}
    }
    Ok(())
}

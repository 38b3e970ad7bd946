// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use assetbook::{cli, commands, context::AppContext, db, logging};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let level = matches
        .get_one::<String>("log-level")
        .map(String::as_str)
        .unwrap_or("warn");
    logging::init_logging(level);

    let mut ctx = AppContext::open_default()?;

    // stdout is reserved for command output, so `--json` stays parseable
    let renewal = ctx.on_load()?;
    commands::budgets::write_renewal_notices(&renewal, &mut std::io::stderr().lock())?;

    if let Some(("init", _)) = matches.subcommand() {
        println!("Database initialized at {}", db::db_path()?.display());
    } else if !commands::dispatch(&mut ctx, &matches)? {
        cli::build_cli().print_help()?;
        println!();
    }
    Ok(())
}

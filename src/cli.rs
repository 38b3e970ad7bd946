// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON instead of a table")
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .help("Month as YYYY-MM (defaults to the current month)")
}

fn name_arg() -> Arg {
    Arg::new("name").long("name").required(true)
}

fn type_arg() -> Arg {
    Arg::new("type")
        .long("type")
        .required(true)
        .value_parser(["income", "expense"])
}

fn asset_cmd() -> Command {
    Command::new("asset")
        .about("Manage assets and their balances")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .arg(name_arg())
                .arg(Arg::new("category").long("category").help("Asset category name"))
                .arg(Arg::new("icon").long("icon")),
        )
        .subcommand(Command::new("list").arg(json_flag()))
        .subcommand(Command::new("rm").arg(name_arg()))
        .subcommand(
            Command::new("set-balance")
                .about("Overwrite the cached balance by hand")
                .arg(name_arg())
                .arg(Arg::new("amount").long("amount").required(true)),
        )
        .subcommand(
            Command::new("set-category")
                .arg(name_arg())
                .arg(
                    Arg::new("category")
                        .long("category")
                        .required(true)
                        .help("Asset category name, or 'none'"),
                ),
        )
        .subcommand(
            Command::new("recalc")
                .about("Rebuild balance and snapshots from the transaction log")
                .arg(Arg::new("name").long("name").conflicts_with("all"))
                .arg(Arg::new("all").long("all").action(ArgAction::SetTrue))
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("series")
                .about("Daily balance series")
                .arg(name_arg())
                .arg(Arg::new("from").long("from").required(true))
                .arg(Arg::new("to").long("to").required(true))
                .arg(json_flag()),
        )
}

fn asset_category_cmd() -> Command {
    Command::new("asset-category")
        .about("Manage asset categories")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .arg(name_arg())
                .arg(Arg::new("description").long("description"))
                .arg(Arg::new("icon").long("icon")),
        )
        .subcommand(Command::new("list").arg(json_flag()))
        .subcommand(Command::new("rm").arg(name_arg()))
}

fn category_cmd() -> Command {
    Command::new("category")
        .about("Manage transaction categories")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .arg(name_arg())
                .arg(type_arg())
                .arg(Arg::new("description").long("description"))
                .arg(Arg::new("icon").long("icon")),
        )
        .subcommand(Command::new("list").arg(json_flag()))
        .subcommand(Command::new("rm").arg(name_arg()))
        .subcommand(
            Command::new("set-type")
                .about("Change the type; history is re-signed on the next replay")
                .arg(name_arg())
                .arg(type_arg()),
        )
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Record and list transactions")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .arg(Arg::new("asset").long("asset").required(true))
                .arg(Arg::new("category").long("category").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("date").long("date").required(true))
                .arg(Arg::new("description").long("description"))
                .arg(Arg::new("details").long("details"))
                .arg(Arg::new("photo").long("photo").action(ArgAction::Append))
                .arg(
                    Arg::new("exclude")
                        .long("exclude")
                        .action(ArgAction::SetTrue)
                        .help("Exclude from reports"),
                ),
        )
        .subcommand(
            Command::new("edit")
                .arg(
                    Arg::new("id")
                        .long("id")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                )
                .arg(Arg::new("asset").long("asset"))
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("amount").long("amount"))
                .arg(Arg::new("date").long("date"))
                .arg(Arg::new("description").long("description"))
                .arg(Arg::new("details").long("details"))
                .arg(
                    Arg::new("exclude")
                        .long("exclude")
                        .value_parser(value_parser!(bool)),
                ),
        )
        .subcommand(
            Command::new("rm").arg(
                Arg::new("id")
                    .long("id")
                    .required(true)
                    .value_parser(value_parser!(i64)),
            ),
        )
        .subcommand(
            Command::new("list")
                .arg(Arg::new("month").long("month"))
                .arg(Arg::new("asset").long("asset"))
                .arg(Arg::new("category").long("category"))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                )
                .arg(json_flag()),
        )
}

fn budget_cmd() -> Command {
    Command::new("budget")
        .about("Budgets and repeating budget periods")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .arg(Arg::new("category").long("category").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(
                    Arg::new("month")
                        .long("month")
                        .conflicts_with_all(["start", "end"])
                        .help("Whole calendar month as YYYY-MM"),
                )
                .arg(Arg::new("start").long("start").requires("end"))
                .arg(Arg::new("end").long("end").requires("start"))
                .arg(Arg::new("description").long("description"))
                .arg(Arg::new("repeat").long("repeat").action(ArgAction::SetTrue)),
        )
        .subcommand(Command::new("list").arg(json_flag()))
        .subcommand(
            Command::new("rm").arg(
                Arg::new("id")
                    .long("id")
                    .required(true)
                    .value_parser(value_parser!(i64)),
            ),
        )
        .subcommand(Command::new("renew").arg(json_flag()))
        .subcommand(Command::new("status").arg(json_flag()))
}

fn report_cmd() -> Command {
    Command::new("report")
        .about("Net worth, performance and spending reports")
        .subcommand_required(true)
        .subcommand(Command::new("net-worth").arg(month_arg()).arg(json_flag()))
        .subcommand(Command::new("performance").arg(month_arg()).arg(json_flag()))
        .subcommand(Command::new("allocation").arg(month_arg()).arg(json_flag()))
        .subcommand(Command::new("summary").arg(month_arg()).arg(json_flag()))
}

pub fn build_cli() -> Command {
    Command::new("assetbook")
        .version(clap::crate_version!())
        .about("Offline personal finance ledger")
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .default_value("warn")
                .help("Log level when RUST_LOG is unset"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(asset_cmd())
        .subcommand(asset_category_cmd())
        .subcommand(category_cmd())
        .subcommand(tx_cmd())
        .subcommand(budget_cmd())
        .subcommand(report_cmd())
        .subcommand(
            Command::new("config")
                .about("Display preferences")
                .subcommand_required(true)
                .subcommand(Command::new("show").arg(json_flag()))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                ),
        )
        .subcommand(
            Command::new("backup")
                .about("Full database snapshots")
                .subcommand_required(true)
                .subcommand(Command::new("export").arg(Arg::new("out").long("out").required(true)))
                .subcommand(Command::new("import").arg(Arg::new("path").long("path").required(true))),
        )
        .subcommand(
            Command::new("export")
                .about("Flat exports")
                .subcommand_required(true)
                .subcommand(
                    Command::new("transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .value_parser(["csv", "json"]),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("doctor")
                .about("Check cached balances against the transaction log")
                .arg(
                    Arg::new("fix")
                        .long("fix")
                        .action(ArgAction::SetTrue)
                        .help("Recalculate drifted assets"),
                ),
        )
}

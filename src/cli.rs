// Copyright (c) 2025 Fintrack contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn user_arg() -> Arg {
    Arg::new("user")
        .long("user")
        .required(true)
        .help("Owner of the records")
}

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON instead of a table"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

fn range_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("start")
            .long("start")
            .required(true)
            .help("Start date (YYYY-MM-DD, inclusive)"),
    )
    .arg(
        Arg::new("end")
            .long("end")
            .required(true)
            .help("End date (YYYY-MM-DD, inclusive)"),
    )
}

pub fn build_cli() -> Command {
    Command::new("fintrack")
        .about("Multi-user personal finance ledger: transactions, budgets, reports")
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("user")
                .about("Manage users")
                .subcommand(
                    Command::new("add").about("Add a user and provision default categories").arg(
                        Arg::new("name").long("name").required(true),
                    ),
                )
                .subcommand(json_flags(Command::new("list").about("List users"))),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .about("Add a category")
                        .arg(user_arg())
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .help("income or expense"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List categories").arg(user_arg()),
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Remove an unreferenced category")
                        .arg(user_arg())
                        .arg(Arg::new("name").long("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and list transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction")
                        .arg(user_arg())
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("merchant").long("merchant").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .help("income or expense"),
                        )
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List transactions, newest first")
                        .arg(user_arg())
                        .arg(Arg::new("from").long("from").help("Earliest date (YYYY-MM-DD)"))
                        .arg(Arg::new("to").long("to").help("Latest date (YYYY-MM-DD)"))
                        .arg(Arg::new("type").long("type").help("income or expense"))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                )),
        )
        .subcommand(
            Command::new("budget")
                .about("Manage budgets")
                .subcommand(
                    range_args(
                        Command::new("set")
                            .about("Pledge a spending limit for a category window")
                            .arg(user_arg())
                            .arg(Arg::new("category").long("category").required(true))
                            .arg(Arg::new("amount").long("amount").required(true))
                            .arg(
                                Arg::new("period")
                                    .long("period")
                                    .default_value("monthly")
                                    .help("weekly, monthly, or yearly"),
                            ),
                    ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List budgets with spent/remaining/percentage figures")
                        .arg(user_arg()),
                ))
                .subcommand(json_flags(
                    Command::new("status")
                        .about("Evaluate one budget")
                        .arg(user_arg())
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        ),
                )),
        )
        .subcommand(
            Command::new("report")
                .about("Generate and manage reports")
                .subcommand(json_flags(range_args(
                    Command::new("generate")
                        .about("Summary, insights, and transactions for a date range")
                        .arg(user_arg())
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("all")
                                .help("all, income, or expense"),
                        ),
                )))
                .subcommand(json_flags(range_args(
                    Command::new("breakdown")
                        .about("Per-category totals by type")
                        .arg(user_arg()),
                )))
                .subcommand(range_args(
                    Command::new("save")
                        .about("Persist a report snapshot")
                        .arg(user_arg())
                        .arg(Arg::new("title").long("title").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("all")
                                .help("all, income, or expense"),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("list").about("List saved reports").arg(user_arg()),
                ))
                .subcommand(json_flags(
                    Command::new("stats")
                        .about("Saved-report counters and recent snapshots")
                        .arg(user_arg()),
                )),
        )
        .subcommand(
            Command::new("schedule")
                .about("Recurring report generation")
                .subcommand(
                    Command::new("add")
                        .about("Add a schedule")
                        .arg(user_arg())
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("frequency")
                                .long("frequency")
                                .required(true)
                                .help("daily, weekly, monthly, or quarterly"),
                        )
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("all")
                                .help("all, income, or expense"),
                        )
                        .arg(
                            Arg::new("next")
                                .long("next")
                                .required(true)
                                .help("First generation date (YYYY-MM-DD)"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List schedules").arg(user_arg()),
                ))
                .subcommand(
                    Command::new("run-due")
                        .about("Save snapshots for every schedule that is due")
                        .arg(user_arg()),
                ),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(range_args(
                Command::new("transactions")
                    .about("Write filtered transactions as CSV")
                    .arg(user_arg())
                    .arg(
                        Arg::new("type")
                            .long("type")
                            .default_value("all")
                            .help("all, income, or expense"),
                    )
                    .arg(Arg::new("out").long("out").required(true).help("Output file")),
            )),
        )
}

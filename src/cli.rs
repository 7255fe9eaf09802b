// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn business_arg() -> Arg {
    Arg::new("business")
        .long("business")
        .required(true)
        .help("Business (tenant) name")
}

pub fn build_cli() -> Command {
    Command::new("ledgerpost")
        .about("Multi-tenant double-entry ledger with AI-drafted vouchers")
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("business")
                .about("Manage client businesses")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("gstin").long("gstin")),
                )
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("group")
                .about("Manage account groups (chart of accounts hierarchy)")
                .subcommand(
                    Command::new("add")
                        .arg(business_arg())
                        .arg(Arg::new("name").required(true))
                        .arg(
                            Arg::new("classification")
                                .long("classification")
                                .required(true)
                                .help("asset|liability|equity|income|expense"),
                        )
                        .arg(Arg::new("parent").long("parent").help("Parent group name")),
                )
                .subcommand(json_flags(Command::new("list").arg(business_arg()))),
        )
        .subcommand(
            Command::new("account")
                .about("Manage ledger accounts")
                .subcommand(
                    Command::new("add")
                        .arg(business_arg())
                        .arg(Arg::new("name").required(true))
                        .arg(
                            Arg::new("group")
                                .long("group")
                                .required(true)
                                .help("Account group name"),
                        )
                        .arg(Arg::new("code").long("code"))
                        .arg(
                            Arg::new("opening")
                                .long("opening")
                                .default_value("0")
                                .help("Opening balance"),
                        ),
                )
                .subcommand(json_flags(Command::new("list").arg(business_arg())))
                .subcommand(
                    Command::new("rename")
                        .arg(business_arg())
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("new_name").required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(business_arg())
                        .arg(Arg::new("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("period")
                .about("Manage financial years")
                .subcommand(
                    Command::new("add")
                        .arg(business_arg())
                        .arg(Arg::new("start").required(true).help("YYYY-MM-DD"))
                        .arg(Arg::new("end").required(true).help("YYYY-MM-DD")),
                )
                .subcommand(json_flags(Command::new("list").arg(business_arg())))
                .subcommand(
                    Command::new("lock")
                        .arg(business_arg())
                        .arg(Arg::new("date").required(true).help(
                            "Any date inside the year to lock (YYYY-MM-DD); locking is permanent",
                        )),
                ),
        )
        .subcommand(
            Command::new("voucher")
                .about("Post and inspect vouchers")
                .subcommand(
                    Command::new("post")
                        .arg(business_arg())
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .help("sales|purchase|payment|receipt|contra|journal"),
                        )
                        .arg(Arg::new("number").long("number").required(true))
                        .arg(Arg::new("date").long("date").required(true).help("YYYY-MM-DD"))
                        .arg(Arg::new("narration").long("narration").default_value(""))
                        .arg(
                            Arg::new("draft")
                                .long("draft")
                                .action(ArgAction::SetTrue)
                                .help("Flag the voucher as an unreviewed draft"),
                        )
                        .arg(
                            Arg::new("line")
                                .long("line")
                                .action(ArgAction::Append)
                                .required(true)
                                .help("ACCOUNT:dr|cr:AMOUNT, repeatable"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(business_arg())
                        .arg(Arg::new("limit").long("limit").value_parser(clap::value_parser!(usize))),
                ))
                .subcommand(json_flags(
                    Command::new("show")
                        .arg(business_arg())
                        .arg(Arg::new("id").required(true).value_parser(clap::value_parser!(i64))),
                )),
        )
        .subcommand(json_flags(
            Command::new("balance")
                .about("Account balance (opening + debits - credits)")
                .arg(business_arg())
                .arg(Arg::new("account").required(true))
                .arg(Arg::new("as-of").long("as-of").help("YYYY-MM-DD")),
        ))
        .subcommand(
            Command::new("report")
                .about("Ledger reports")
                .subcommand(json_flags(Command::new("balances").arg(business_arg())))
                .subcommand(json_flags(
                    Command::new("statement")
                        .arg(business_arg())
                        .arg(Arg::new("account").required(true)),
                )),
        )
        .subcommand(
            Command::new("rules")
                .about("Account-mapping rules used by the document pipeline")
                .subcommand(
                    Command::new("add")
                        .arg(business_arg())
                        .arg(
                            Arg::new("pattern")
                                .long("pattern")
                                .required(true)
                                .help("Regex matched against extracted text"),
                        )
                        .arg(
                            Arg::new("account")
                                .long("account")
                                .required(true)
                                .help("Target account name"),
                        ),
                )
                .subcommand(json_flags(Command::new("list").arg(business_arg()))),
        )
        .subcommand(
            Command::new("doc")
                .about("Document pipeline: register, process, review")
                .subcommand(
                    Command::new("add")
                        .arg(business_arg())
                        .arg(Arg::new("path").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("invoice")
                                .help("invoice|bill|bank_statement|other"),
                        ),
                )
                .subcommand(json_flags(Command::new("list").arg(business_arg())))
                .subcommand(
                    Command::new("process")
                        .arg(business_arg())
                        .arg(Arg::new("id").required(true).value_parser(clap::value_parser!(i64)))
                        .arg(
                            Arg::new("mock")
                                .long("mock")
                                .action(ArgAction::SetTrue)
                                .help("Use the built-in mock extractor"),
                        ),
                )
                .subcommand(
                    Command::new("review")
                        .arg(business_arg())
                        .arg(Arg::new("id").required(true).value_parser(clap::value_parser!(i64))),
                ),
        )
        .subcommand(
            Command::new("ai")
                .about("Extraction backend settings")
                .subcommand(
                    Command::new("set-endpoint").arg(Arg::new("url").required(true)),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Bulk imports")
                .subcommand(
                    Command::new("accounts")
                        .arg(business_arg())
                        .arg(Arg::new("path").required(true).help(
                            "CSV: group,classification,account,code,opening_balance",
                        )),
                ),
        )
        .subcommand(Command::new("doctor").about("Ledger integrity sweep"))
}

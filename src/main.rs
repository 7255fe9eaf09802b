// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use ledgerpost::{cli, commands, db, utils};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut conn = db::open_or_init()?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("business", sub)) => commands::business::handle(&conn, sub)?,
        Some(("group", sub)) => commands::groups::handle(&conn, sub)?,
        Some(("account", sub)) => commands::accounts::handle(&conn, sub)?,
        Some(("period", sub)) => commands::periods::handle(&conn, sub)?,
        Some(("voucher", sub)) => commands::vouchers::handle(&mut conn, sub)?,
        Some(("balance", sub)) => commands::balances::handle_balance(&conn, sub)?,
        Some(("report", sub)) => commands::balances::handle_report(&conn, sub)?,
        Some(("rules", sub)) => commands::rules::handle(&conn, sub)?,
        Some(("doc", sub)) => commands::documents::handle(&mut conn, sub)?,
        Some(("ai", sub)) => match sub.subcommand() {
            Some(("set-endpoint", s)) => {
                let url = s.get_one::<String>("url").unwrap();
                utils::set_ai_endpoint(&conn, url)?;
                println!("Extraction endpoint set to {}", url);
            }
            _ => {}
        },
        Some(("import", sub)) => commands::importer::handle(&mut conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}

// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::accounts;
use crate::utils::{
    fmt_money, id_for_account, id_for_business, id_for_group, maybe_print_json, parse_decimal,
    pretty_table,
};
use anyhow::{Context, Result};
use rusqlite::{params, Connection};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let business = sub.get_one::<String>("business").unwrap();
            let name = sub.get_one::<String>("name").unwrap();
            let group = sub.get_one::<String>("group").unwrap();
            let code = sub.get_one::<String>("code").map(|s| s.as_str());
            let opening = parse_decimal(sub.get_one::<String>("opening").unwrap())?;
            let business_id = id_for_business(conn, business)?;
            let group_id = id_for_group(conn, business_id, group)?;
            accounts::create_account(conn, business_id, group_id, name, code, opening)?;
            println!("Added account '{}' under '{}'", name, group);
        }
        Some(("list", sub)) => {
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let business_id = id_for_business(conn, sub.get_one::<String>("business").unwrap())?;
            let data = accounts::list(conn, business_id)?;
            if !maybe_print_json(json_flag, jsonl_flag, &data)? {
                let rows: Vec<Vec<String>> = data
                    .iter()
                    .map(|a| {
                        vec![
                            a.id.to_string(),
                            a.name.clone(),
                            a.code.clone().unwrap_or_default(),
                            fmt_money(&a.opening_balance),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["Id", "Name", "Code", "Opening"], rows));
            }
        }
        Some(("rename", sub)) => {
            let business_id = id_for_business(conn, sub.get_one::<String>("business").unwrap())?;
            let name = sub.get_one::<String>("name").unwrap();
            let new_name = sub.get_one::<String>("new_name").unwrap();
            let account_id = id_for_account(conn, business_id, name)?;
            accounts::rename(conn, business_id, account_id, new_name)?;
            println!("Renamed account '{}' -> '{}'", name, new_name);
        }
        Some(("rm", sub)) => {
            let business_id = id_for_business(conn, sub.get_one::<String>("business").unwrap())?;
            let name = sub.get_one::<String>("name").unwrap();
            let account_id = id_for_account(conn, business_id, name)?;
            // FK RESTRICT refuses deletion while journal entries reference it.
            conn.execute(
                "DELETE FROM accounts WHERE id=?1 AND business_id=?2",
                params![account_id, business_id],
            )
            .with_context(|| {
                format!("Remove account '{}' (accounts with postings cannot be removed)", name)
            })?;
            println!("Removed account '{}'", name);
        }
        _ => {}
    }
    Ok(())
}

// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::pipeline;
use crate::utils::{id_for_account, id_for_business, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::{params, Connection};
use serde::Serialize;

#[derive(Serialize)]
pub struct RuleRow {
    pub id: i64,
    pub pattern: String,
    pub account: String,
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let business_id = id_for_business(conn, sub.get_one::<String>("business").unwrap())?;
            let pattern = sub.get_one::<String>("pattern").unwrap();
            let account = sub.get_one::<String>("account").unwrap();
            let account_id = id_for_account(conn, business_id, account)?;
            pipeline::add_rule(conn, business_id, pattern, account_id)?;
            println!("Added rule /{}/ -> '{}'", pattern, account);
        }
        Some(("list", sub)) => {
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let business_id = id_for_business(conn, sub.get_one::<String>("business").unwrap())?;
            let mut stmt = conn.prepare(
                "SELECT r.id, r.pattern, a.name
                 FROM account_rules r JOIN accounts a ON r.account_id=a.id
                 WHERE r.business_id=?1 ORDER BY r.id DESC",
            )?;
            let rows = stmt.query_map(params![business_id], |r| {
                Ok(RuleRow {
                    id: r.get(0)?,
                    pattern: r.get(1)?,
                    account: r.get(2)?,
                })
            })?;
            let mut data = Vec::new();
            for row in rows {
                data.push(row?);
            }
            if !maybe_print_json(json_flag, jsonl_flag, &data)? {
                let rows: Vec<Vec<String>> = data
                    .iter()
                    .map(|r| vec![r.id.to_string(), r.pattern.clone(), r.account.clone()])
                    .collect();
                println!("{}", pretty_table(&["Id", "Pattern", "Account"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}

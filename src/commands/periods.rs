// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::periods;
use crate::utils::{id_for_business, maybe_print_json, parse_date, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let business = sub.get_one::<String>("business").unwrap();
            let start = parse_date(sub.get_one::<String>("start").unwrap())?;
            let end = parse_date(sub.get_one::<String>("end").unwrap())?;
            let business_id = id_for_business(conn, business)?;
            periods::create_year(conn, business_id, start, end)?;
            println!("Added financial year {}..{} for '{}'", start, end, business);
        }
        Some(("list", sub)) => {
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let business_id = id_for_business(conn, sub.get_one::<String>("business").unwrap())?;
            let data = periods::list(conn, business_id)?;
            if !maybe_print_json(json_flag, jsonl_flag, &data)? {
                let rows: Vec<Vec<String>> = data
                    .iter()
                    .map(|fy| {
                        vec![
                            fy.id.to_string(),
                            fy.start_date.to_string(),
                            fy.end_date.to_string(),
                            if fy.is_locked { "locked" } else { "open" }.to_string(),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["Id", "Start", "End", "Status"], rows));
            }
        }
        Some(("lock", sub)) => {
            let business_id = id_for_business(conn, sub.get_one::<String>("business").unwrap())?;
            let date = parse_date(sub.get_one::<String>("date").unwrap())?;
            let fy = periods::find_period_for(conn, business_id, date)?;
            periods::lock(conn, business_id, fy.id)?;
            println!(
                "Locked financial year {}..{} (permanent; no unlock)",
                fy.start_date, fy.end_date
            );
        }
        _ => {}
    }
    Ok(())
}

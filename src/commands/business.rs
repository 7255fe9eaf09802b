// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Business;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::{params, Connection};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let gstin = sub.get_one::<String>("gstin").map(|s| s.to_uppercase());
            conn.execute(
                "INSERT INTO businesses(name, gstin) VALUES (?1, ?2)",
                params![name, gstin],
            )?;
            println!("Added business '{}'", name);
        }
        Some(("list", sub)) => {
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let mut stmt =
                conn.prepare("SELECT id, name, gstin FROM businesses ORDER BY name")?;
            let rows = stmt.query_map([], |r| {
                Ok(Business {
                    id: r.get(0)?,
                    name: r.get(1)?,
                    gstin: r.get(2)?,
                })
            })?;
            let mut data = Vec::new();
            for row in rows {
                data.push(row?);
            }
            if !maybe_print_json(json_flag, jsonl_flag, &data)? {
                let rows: Vec<Vec<String>> = data
                    .iter()
                    .map(|b| {
                        vec![
                            b.id.to_string(),
                            b.name.clone(),
                            b.gstin.clone().unwrap_or_default(),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["Id", "Name", "GSTIN"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}

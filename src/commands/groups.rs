// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::accounts;
use crate::models::Classification;
use crate::utils::{id_for_business, id_for_group, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let business = sub.get_one::<String>("business").unwrap();
            let name = sub.get_one::<String>("name").unwrap();
            let classification: Classification =
                sub.get_one::<String>("classification").unwrap().parse()?;
            let business_id = id_for_business(conn, business)?;
            let parent_id = sub
                .get_one::<String>("parent")
                .map(|p| id_for_group(conn, business_id, p))
                .transpose()?;
            accounts::create_group(conn, business_id, name, parent_id, classification)?;
            println!(
                "Added group '{}' ({}) to '{}'",
                name,
                classification.as_str(),
                business
            );
        }
        Some(("list", sub)) => {
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let business_id = id_for_business(conn, sub.get_one::<String>("business").unwrap())?;
            let data = accounts::list_groups(conn, business_id)?;
            if !maybe_print_json(json_flag, jsonl_flag, &data)? {
                let rows: Vec<Vec<String>> = data
                    .iter()
                    .map(|g| {
                        vec![
                            g.id.to_string(),
                            g.name.clone(),
                            g.classification.as_str().to_string(),
                            g.parent_id.map(|p| p.to_string()).unwrap_or_default(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Id", "Name", "Classification", "Parent"], rows)
                );
            }
        }
        _ => {}
    }
    Ok(())
}

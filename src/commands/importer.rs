// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Classification;
use crate::utils::{id_for_business, parse_decimal};
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::{hash_map::Entry, HashMap};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("accounts", sub)) => import_accounts(conn, sub),
        _ => Ok(()),
    }
}

/// Bulk-load a chart of accounts from CSV:
/// group,classification,account,code,opening_balance
fn import_accounts(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let business_id = id_for_business(conn, sub.get_one::<String>("business").unwrap())?;
    let path = sub.get_one::<String>("path").unwrap().trim();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let tx = conn.transaction()?;
    let mut group_cache: HashMap<String, i64> = HashMap::new();
    let mut imported = 0usize;

    for result in rdr.records() {
        let rec = result?;
        let group = rec.get(0).context("group missing")?.trim().to_string();
        let classification: Classification = rec
            .get(1)
            .context("classification missing")?
            .trim()
            .parse()?;
        let account = rec.get(2).context("account missing")?.trim();
        let code = rec
            .get(3)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());
        let opening_raw = rec.get(4).unwrap_or("0").trim();
        let opening = parse_decimal(if opening_raw.is_empty() { "0" } else { opening_raw })
            .with_context(|| format!("Invalid opening balance for '{}'", account))?;

        let group_id = match group_cache.entry(group.clone()) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let existing: Option<i64> = tx
                    .query_row(
                        "SELECT id FROM account_groups WHERE business_id=?1 AND name=?2",
                        params![business_id, &group],
                        |r| r.get(0),
                    )
                    .optional()?;
                let id = match existing {
                    Some(id) => id,
                    None => {
                        tx.execute(
                            "INSERT INTO account_groups(business_id, name, classification)
                             VALUES (?1, ?2, ?3)",
                            params![business_id, &group, classification],
                        )?;
                        tx.last_insert_rowid()
                    }
                };
                *entry.insert(id)
            }
        };

        tx.execute(
            "INSERT INTO accounts(business_id, group_id, name, code, opening_balance)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![business_id, group_id, account, code, opening.to_string()],
        )
        .with_context(|| format!("Import account '{}'", account))?;
        imported += 1;
    }

    tx.commit()?;
    println!("Imported {} accounts from {}", imported, path);
    Ok(())
}

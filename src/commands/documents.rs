// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::DocType;
use crate::pipeline::{self, provider::{ExtractionProvider, HttpProvider, MockProvider}};
use crate::utils::{get_ai_endpoint, id_for_business, maybe_print_json, pretty_table};
use anyhow::{bail, Result};
use rusqlite::{params, Connection};
use serde::Serialize;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let business = sub.get_one::<String>("business").unwrap();
            let business_id = id_for_business(conn, business)?;
            let path = sub.get_one::<String>("path").unwrap();
            let doc_type: DocType = sub.get_one::<String>("type").unwrap().parse()?;
            let id = pipeline::register_document(conn, business_id, doc_type, path)?;
            println!("Registered {} document {} for '{}'", doc_type.as_str(), id, business);
        }
        Some(("list", sub)) => list(conn, sub)?,
        Some(("process", sub)) => process(conn, sub)?,
        Some(("review", sub)) => {
            let business_id = id_for_business(conn, sub.get_one::<String>("business").unwrap())?;
            let id = *sub.get_one::<i64>("id").unwrap();
            pipeline::mark_reviewed(conn, business_id, id)?;
            println!("Document {} marked reviewed", id);
        }
        _ => {}
    }
    Ok(())
}

fn process(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let business_id = id_for_business(conn, sub.get_one::<String>("business").unwrap())?;
    let id = *sub.get_one::<i64>("id").unwrap();

    let provider: Box<dyn ExtractionProvider> = if sub.get_flag("mock") {
        Box::new(MockProvider)
    } else {
        match get_ai_endpoint(conn)? {
            Some(url) => Box::new(HttpProvider::new(&url)?),
            None => bail!(
                "No extraction endpoint configured; run 'ledgerpost ai set-endpoint <url>' or pass --mock"
            ),
        }
    };

    match pipeline::process_document(conn, provider.as_ref(), business_id, id)? {
        Some(voucher) => println!(
            "Document {} -> draft {} #{} (voucher id {})",
            id,
            voucher.voucher_type.as_str(),
            voucher.voucher_number,
            voucher.id
        ),
        None => {
            let err: Option<String> = conn.query_row(
                "SELECT error FROM documents WHERE id=?1",
                params![id],
                |r| r.get(0),
            )?;
            println!(
                "Document {} failed: {}",
                id,
                err.unwrap_or_else(|| "unknown error".to_string())
            );
        }
    }
    Ok(())
}

#[derive(Serialize)]
pub struct DocumentRow {
    pub id: i64,
    pub doc_type: String,
    pub status: String,
    pub source_path: String,
    pub voucher_id: Option<i64>,
    pub error: Option<String>,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let business_id = id_for_business(conn, sub.get_one::<String>("business").unwrap())?;
    let mut stmt = conn.prepare(
        "SELECT id, doc_type, status, source_path, voucher_id, error
         FROM documents WHERE business_id=?1 ORDER BY id DESC",
    )?;
    let rows = stmt.query_map(params![business_id], |r| {
        Ok(DocumentRow {
            id: r.get(0)?,
            doc_type: r.get(1)?,
            status: r.get(2)?,
            source_path: r.get(3)?,
            voucher_id: r.get(4)?,
            error: r.get(5)?,
        })
    })?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|d| {
                vec![
                    d.id.to_string(),
                    d.doc_type.clone(),
                    d.status.clone(),
                    d.source_path.clone(),
                    d.voucher_id.map(|v| v.to_string()).unwrap_or_default(),
                    d.error.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Type", "Status", "Source", "Voucher", "Error"], rows)
        );
    }
    Ok(())
}

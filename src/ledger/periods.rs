// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Financial period registry: date ranges per business, lockable.
//!
//! Locking is one-directional. There is deliberately no unlock operation.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{LedgerError, LedgerResult};
use crate::models::FinancialYear;

pub fn create_year(
    conn: &Connection,
    business_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<i64> {
    if end_date < start_date {
        anyhow::bail!(
            "Financial year ends ({}) before it starts ({})",
            end_date,
            start_date
        );
    }
    conn.execute(
        "INSERT INTO financial_years(business_id, start_date, end_date)
         VALUES (?1, ?2, ?3)",
        params![business_id, start_date.to_string(), end_date.to_string()],
    )
    .context("Create financial year")?;
    Ok(conn.last_insert_rowid())
}

fn year_from_row(r: &Row<'_>) -> rusqlite::Result<FinancialYear> {
    Ok(FinancialYear {
        id: r.get(0)?,
        business_id: r.get(1)?,
        start_date: r.get(2)?,
        end_date: r.get(3)?,
        is_locked: r.get::<_, i64>(4)? != 0,
    })
}

/// Find the financial year of a business covering `date`.
pub fn find_period_for(
    conn: &Connection,
    business_id: i64,
    date: NaiveDate,
) -> LedgerResult<FinancialYear> {
    let fy = conn
        .query_row(
            "SELECT id, business_id, start_date, end_date, is_locked
             FROM financial_years
             WHERE business_id=?1 AND start_date<=?2 AND end_date>=?2
             ORDER BY start_date DESC LIMIT 1",
            params![business_id, date.to_string()],
            year_from_row,
        )
        .optional()?;
    fy.ok_or(LedgerError::PeriodNotFound)
}

/// Fetch a financial year by id, tenant-checked.
pub fn get(conn: &Connection, business_id: i64, fy_id: i64) -> LedgerResult<FinancialYear> {
    let fy = conn
        .query_row(
            "SELECT id, business_id, start_date, end_date, is_locked
             FROM financial_years WHERE id=?1",
            params![fy_id],
            year_from_row,
        )
        .optional()?;
    match fy {
        None => Err(LedgerError::PeriodNotFound),
        Some(fy) if fy.business_id != business_id => {
            Err(LedgerError::CrossTenantReference("financial year"))
        }
        Some(fy) => Ok(fy),
    }
}

/// Lock a financial year. Permanent: locked years accept no new postings
/// and cannot be unlocked.
pub fn lock(conn: &Connection, business_id: i64, fy_id: i64) -> LedgerResult<()> {
    get(conn, business_id, fy_id)?;
    conn.execute(
        "UPDATE financial_years SET is_locked=1 WHERE id=?1 AND business_id=?2",
        params![fy_id, business_id],
    )?;
    Ok(())
}

pub fn list(conn: &Connection, business_id: i64) -> Result<Vec<FinancialYear>> {
    let mut stmt = conn.prepare(
        "SELECT id, business_id, start_date, end_date, is_locked
         FROM financial_years WHERE business_id=?1 ORDER BY start_date",
    )?;
    let rows = stmt.query_map(params![business_id], year_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

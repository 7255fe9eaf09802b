// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Ledgerpost", "ledgerpost"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("ledgerpost.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    open_or_init_at(&path)
}

/// Open (creating if needed) a ledger database at an explicit path.
pub fn open_or_init_at(path: &Path) -> Result<Connection> {
    let mut conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

/// In-memory database with the full schema; used by tests.
pub fn open_in_memory() -> Result<Connection> {
    let mut conn = Connection::open_in_memory().context("Open in-memory DB")?;
    init_schema(&mut conn)?;
    Ok(conn)
}

fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;
    -- Concurrent posters wait for the write lock instead of failing instantly.
    PRAGMA busy_timeout = 5000;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS businesses(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        gstin TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS account_groups(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        business_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        parent_id INTEGER,
        classification TEXT NOT NULL
            CHECK(classification IN ('asset','liability','equity','income','expense')),
        UNIQUE(business_id, name),
        FOREIGN KEY(business_id) REFERENCES businesses(id) ON DELETE CASCADE,
        FOREIGN KEY(parent_id) REFERENCES account_groups(id) ON DELETE RESTRICT
    );

    CREATE TABLE IF NOT EXISTS accounts(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        business_id INTEGER NOT NULL,
        group_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        code TEXT,
        opening_balance TEXT NOT NULL DEFAULT '0',
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(business_id, name),
        FOREIGN KEY(business_id) REFERENCES businesses(id) ON DELETE CASCADE,
        FOREIGN KEY(group_id) REFERENCES account_groups(id) ON DELETE RESTRICT
    );

    CREATE TABLE IF NOT EXISTS financial_years(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        business_id INTEGER NOT NULL,
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        is_locked INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(business_id) REFERENCES businesses(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_financial_years_range
        ON financial_years(business_id, start_date, end_date);

    CREATE TABLE IF NOT EXISTS vouchers(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        business_id INTEGER NOT NULL,
        financial_year_id INTEGER NOT NULL,
        voucher_type TEXT NOT NULL
            CHECK(voucher_type IN ('sales','purchase','payment','receipt','contra','journal')),
        voucher_number TEXT NOT NULL,
        date TEXT NOT NULL,
        narration TEXT NOT NULL DEFAULT '',
        is_draft INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        updated_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(business_id, voucher_type, voucher_number, financial_year_id),
        FOREIGN KEY(business_id) REFERENCES businesses(id) ON DELETE CASCADE,
        FOREIGN KEY(financial_year_id) REFERENCES financial_years(id) ON DELETE RESTRICT
    );
    CREATE INDEX IF NOT EXISTS idx_vouchers_date ON vouchers(business_id, date);

    CREATE TABLE IF NOT EXISTS journal_entries(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        voucher_id INTEGER NOT NULL,
        account_id INTEGER NOT NULL,
        debit TEXT NOT NULL DEFAULT '0',
        credit TEXT NOT NULL DEFAULT '0',
        FOREIGN KEY(voucher_id) REFERENCES vouchers(id) ON DELETE CASCADE,
        FOREIGN KEY(account_id) REFERENCES accounts(id) ON DELETE RESTRICT
    );
    CREATE INDEX IF NOT EXISTS idx_journal_entries_account ON journal_entries(account_id);

    CREATE TABLE IF NOT EXISTS documents(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        business_id INTEGER NOT NULL,
        doc_type TEXT NOT NULL
            CHECK(doc_type IN ('invoice','bill','bank_statement','other')),
        status TEXT NOT NULL DEFAULT 'pending'
            CHECK(status IN ('pending','processing','processed','failed','reviewed')),
        source_path TEXT NOT NULL,
        ai_metadata TEXT,
        error TEXT,
        voucher_id INTEGER,
        uploaded_at TEXT NOT NULL DEFAULT (datetime('now')),
        processed_at TEXT,
        FOREIGN KEY(business_id) REFERENCES businesses(id) ON DELETE CASCADE,
        FOREIGN KEY(voucher_id) REFERENCES vouchers(id) ON DELETE SET NULL
    );

    -- Pipeline mapping rules: regex over extracted free text -> concrete account.
    CREATE TABLE IF NOT EXISTS account_rules(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        business_id INTEGER NOT NULL,
        pattern TEXT NOT NULL,
        account_id INTEGER NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(business_id) REFERENCES businesses(id) ON DELETE CASCADE,
        FOREIGN KEY(account_id) REFERENCES accounts(id) ON DELETE CASCADE
    );
    "#,
    )?;
    Ok(())
}

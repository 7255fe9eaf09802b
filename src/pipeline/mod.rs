// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Document processing pipeline: turns uploaded documents into draft
//! vouchers through an extraction provider and explicit account-mapping
//! rules.
//!
//! The pipeline owns all fuzziness. Extracted free text is resolved to
//! concrete account ids through per-business regex rules; if any required
//! account does not resolve, the document fails for manual review and the
//! posting engine is never called. The ledger itself does no matching.

pub mod provider;

use anyhow::{bail, Context, Result};
use regex::Regex;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::ledger::{periods, posting};
use crate::models::{
    DocStatus, DocType, Document, EntryLine, Voucher, VoucherRequest, VoucherType,
};
use provider::ExtractionProvider;

/// Rule text probed for the tax account; businesses map it with
/// `rules add --pattern GST`.
const TAX_ACCOUNT_HINT: &str = "GST";

pub fn register_document(
    conn: &Connection,
    business_id: i64,
    doc_type: DocType,
    source_path: &str,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO documents(business_id, doc_type, source_path) VALUES (?1, ?2, ?3)",
        params![business_id, doc_type, source_path],
    )
    .context("Register document")?;
    Ok(conn.last_insert_rowid())
}

pub fn add_rule(conn: &Connection, business_id: i64, pattern: &str, account_id: i64) -> Result<i64> {
    Regex::new(pattern).with_context(|| format!("Invalid rule pattern '{}'", pattern))?;
    conn.execute(
        "INSERT INTO account_rules(business_id, pattern, account_id) VALUES (?1, ?2, ?3)",
        params![business_id, pattern, account_id],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Resolve extracted free text to an account id through the business's
/// mapping rules, newest rule first. No match means unresolved; the pipeline
/// never guesses.
pub fn resolve_account(conn: &Connection, business_id: i64, text: &str) -> Result<Option<i64>> {
    let mut stmt = conn.prepare(
        "SELECT pattern, account_id FROM account_rules
         WHERE business_id=?1 ORDER BY id DESC",
    )?;
    let mut cur = stmt.query(params![business_id])?;
    while let Some(r) = cur.next()? {
        let pat: String = r.get(0)?;
        let account_id: i64 = r.get(1)?;
        if let Ok(re) = Regex::new(&pat) {
            if re.is_match(text) {
                return Ok(Some(account_id));
            }
        }
    }
    Ok(None)
}

fn get_document(conn: &Connection, business_id: i64, document_id: i64) -> Result<Document> {
    let doc = conn
        .query_row(
            "SELECT id, business_id, doc_type, status, source_path, ai_metadata, error, voucher_id
             FROM documents WHERE id=?1 AND business_id=?2",
            params![document_id, business_id],
            |r| {
                Ok(Document {
                    id: r.get(0)?,
                    business_id: r.get(1)?,
                    doc_type: r.get(2)?,
                    status: r.get(3)?,
                    source_path: r.get(4)?,
                    ai_metadata: r.get(5)?,
                    error: r.get(6)?,
                    voucher_id: r.get(7)?,
                })
            },
        )
        .optional()?;
    match doc {
        Some(d) => Ok(d),
        None => bail!("Document {} not found", document_id),
    }
}

fn set_status(conn: &Connection, document_id: i64, status: DocStatus) -> Result<()> {
    conn.execute(
        "UPDATE documents SET status=?1 WHERE id=?2",
        params![status, document_id],
    )?;
    Ok(())
}

fn mark_failed(conn: &Connection, document_id: i64, reason: &str) -> Result<()> {
    conn.execute(
        "UPDATE documents SET status=?1, error=?2 WHERE id=?3",
        params![DocStatus::Failed, reason, document_id],
    )?;
    Ok(())
}

/// Run one document through extraction and draft-voucher creation.
///
/// Returns the committed draft voucher, or `None` when the document was
/// marked failed (extraction error, unresolved accounts, no covering
/// period, or a posting rejection). Failure paths write nothing to the
/// ledger.
pub fn process_document(
    conn: &mut Connection,
    provider: &dyn ExtractionProvider,
    business_id: i64,
    document_id: i64,
) -> Result<Option<Voucher>> {
    let doc = get_document(conn, business_id, document_id)?;
    match doc.status {
        DocStatus::Pending | DocStatus::Failed => {}
        other => bail!(
            "Document {} is {}; only pending or failed documents can be processed",
            document_id,
            other.as_str()
        ),
    }
    set_status(conn, document_id, DocStatus::Processing)?;

    let extraction = match provider.extract_invoice(std::path::Path::new(&doc.source_path)) {
        Ok(e) => e,
        Err(e) => {
            mark_failed(conn, document_id, &format!("extraction failed: {:#}", e))?;
            return Ok(None);
        }
    };
    conn.execute(
        "UPDATE documents SET ai_metadata=?1 WHERE id=?2",
        params![serde_json::to_string(&extraction)?, document_id],
    )?;

    let expense = resolve_account(conn, business_id, &extraction.suggested_ledger)?;
    let vendor = resolve_account(conn, business_id, &extraction.vendor_name)?;
    let tax = resolve_account(conn, business_id, TAX_ACCOUNT_HINT)?;

    let (expense, vendor) = match (expense, vendor) {
        (Some(e), Some(v)) => (e, v),
        _ => {
            mark_failed(
                conn,
                document_id,
                "could not map extracted fields to ledger accounts",
            )?;
            return Ok(None);
        }
    };
    let tax_amount = extraction.tax_amount;
    if tax_amount > Decimal::ZERO && tax.is_none() {
        mark_failed(conn, document_id, "no rule maps the tax account")?;
        return Ok(None);
    }

    let fy = match periods::find_period_for(conn, business_id, extraction.invoice_date) {
        Ok(fy) => fy,
        Err(e) => {
            mark_failed(conn, document_id, &e.to_string())?;
            return Ok(None);
        }
    };

    let net = extraction.total_amount - tax_amount;
    let mut lines = vec![
        EntryLine::debit(expense, net),
        EntryLine::credit(vendor, extraction.total_amount),
    ];
    if tax_amount > Decimal::ZERO {
        if let Some(tax_id) = tax {
            lines.insert(1, EntryLine::debit(tax_id, tax_amount));
        }
    }

    let req = VoucherRequest {
        business_id,
        financial_year_id: fy.id,
        voucher_type: match doc.doc_type {
            DocType::Invoice => VoucherType::Purchase,
            DocType::Bill => VoucherType::Sales,
            DocType::BankStatement | DocType::Other => VoucherType::Journal,
        },
        voucher_number: format!("AI-{:06}", document_id),
        date: extraction.invoice_date,
        narration: format!(
            "AI draft from uploaded document. Extracted vendor: {}",
            extraction.vendor_name
        ),
        is_draft: true,
        lines,
    };

    match posting::commit(conn, &req) {
        Ok(voucher) => {
            conn.execute(
                "UPDATE documents
                 SET status=?1, voucher_id=?2, error=NULL, processed_at=datetime('now')
                 WHERE id=?3",
                params![DocStatus::Processed, voucher.id, document_id],
            )?;
            Ok(Some(voucher))
        }
        Err(e) => {
            mark_failed(conn, document_id, &e.to_string())?;
            Ok(None)
        }
    }
}

/// An accountant signs off on a processed draft.
pub fn mark_reviewed(conn: &Connection, business_id: i64, document_id: i64) -> Result<()> {
    let doc = get_document(conn, business_id, document_id)?;
    if doc.status != DocStatus::Processed {
        bail!(
            "Document {} is {}; only processed documents can be reviewed",
            document_id,
            doc.status.as_str()
        );
    }
    set_status(conn, document_id, DocStatus::Reviewed)?;
    Ok(())
}

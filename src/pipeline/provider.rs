// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Extraction providers: the pluggable AI backend of the document pipeline.
//!
//! The provider is injected as a capability (`&dyn ExtractionProvider`) by
//! the caller; nothing here is process-global, so tests substitute their
//! own freely.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::utils::http_client;

/// Structured fields extracted from an invoice-like document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceExtraction {
    pub vendor_name: String,
    pub invoice_date: NaiveDate,
    pub total_amount: Decimal,
    pub tax_amount: Decimal,
    pub suggested_ledger: String,
}

pub trait ExtractionProvider {
    fn extract_invoice(&self, source: &Path) -> Result<InvoiceExtraction>;
}

/// Fixed-output provider for demos and tests.
pub struct MockProvider;

impl ExtractionProvider for MockProvider {
    fn extract_invoice(&self, _source: &Path) -> Result<InvoiceExtraction> {
        Ok(InvoiceExtraction {
            vendor_name: "Generic Supplier Ltd".to_string(),
            invoice_date: NaiveDate::from_ymd_opt(2026, 1, 4).unwrap(),
            total_amount: Decimal::new(118_000, 2),
            tax_amount: Decimal::new(18_000, 2),
            suggested_ledger: "Purchase Account".to_string(),
        })
    }
}

/// Remote extraction over HTTP: posts the document text to an endpoint that
/// answers with `InvoiceExtraction` JSON.
pub struct HttpProvider {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpProvider {
    pub fn new(endpoint: &str) -> Result<Self> {
        Ok(Self {
            endpoint: endpoint.to_string(),
            client: http_client()?,
        })
    }
}

impl ExtractionProvider for HttpProvider {
    fn extract_invoice(&self, source: &Path) -> Result<InvoiceExtraction> {
        let text = fs::read_to_string(source)
            .with_context(|| format!("Read document {}", source.display()))?;
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "document": text }))
            .send()
            .with_context(|| format!("POST {}", self.endpoint))?
            .error_for_status()
            .context("Extraction endpoint returned an error status")?;
        let extraction: InvoiceExtraction =
            resp.json().context("Malformed extraction response")?;
        Ok(extraction)
    }
}

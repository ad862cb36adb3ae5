//! Rule-driven record extraction.

use std::time::Instant;

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use tracing::{debug, info, warn};

use crate::models::record::{Slot, VehicleRecord};

use super::catalog::{Capture, Category, CompiledRule, FieldPatternCatalog};
use super::dates::{IssueDate, month_number};
use super::normalize::has_boilerplate;
use super::{CertificateParser, Result, ensure_usable, normalize};

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Trim a captured value and collapse internal whitespace to single spaces.
pub fn clean_value(value: &str) -> String {
    WHITESPACE_RUN.replace_all(value.trim(), " ").into_owned()
}

/// Result of one extraction pass with per-rule bookkeeping.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted record.
    pub record: VehicleRecord,
    /// Category rule set that was applied, if any.
    pub category: Option<Category>,
    /// Ids of rules that matched, in application order.
    pub matched: Vec<&'static str>,
    /// Ids of rules that found nothing.
    pub unmatched: Vec<&'static str>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Applies the field catalog to normalized certificate text.
#[derive(Debug, Clone)]
pub struct RecordExtractor {
    catalog: &'static FieldPatternCatalog,
    /// Choose the category rule set from the extracted category when no hint
    /// is given.
    infer_category: bool,
}

impl Default for RecordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordExtractor {
    /// Create an extractor over the built-in catalog.
    pub fn new() -> Self {
        Self {
            catalog: FieldPatternCatalog::global(),
            infer_category: false,
        }
    }

    /// Set category inference from the extracted category field.
    pub fn with_category_inference(mut self, infer: bool) -> Self {
        self.infer_category = infer;
        self
    }

    /// Extract a record from normalized text.
    ///
    /// Never fails: fields whose rules find nothing stay empty, so blank
    /// input yields the all-empty record.
    pub fn extract(&self, text: &str, category_hint: Option<&str>) -> VehicleRecord {
        self.extract_with_report(text, category_hint).record
    }

    /// Extract a record and report which rules matched.
    pub fn extract_with_report(&self, text: &str, category_hint: Option<&str>) -> ExtractionResult {
        let start = Instant::now();
        let mut record = VehicleRecord::new();
        let mut matched = Vec::new();
        let mut unmatched = Vec::new();

        for rule in self.catalog.common() {
            if apply_rule(rule, text, &mut record) {
                matched.push(rule.rule.id);
            } else {
                unmatched.push(rule.rule.id);
            }
        }

        let category = self.resolve_category(category_hint, &record);
        if let Some(category) = category {
            let rules = self.catalog.for_category(category);
            for rule in rules {
                if let Capture::Slot(Slot::Extra(key)) = rule.rule.capture {
                    record.category_fields.entry(key.to_string()).or_default();
                }
            }
            for rule in rules {
                if apply_rule(rule, text, &mut record) {
                    matched.push(rule.rule.id);
                } else {
                    unmatched.push(rule.rule.id);
                }
            }
        }

        debug!(
            "Matched {} of {} rules (category {:?})",
            matched.len(),
            matched.len() + unmatched.len(),
            category
        );

        ExtractionResult {
            record,
            category,
            matched,
            unmatched,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn resolve_category(&self, hint: Option<&str>, record: &VehicleRecord) -> Option<Category> {
        match hint {
            Some(code) => {
                let category = Category::parse(code);
                if category.is_none() {
                    debug!("Unknown category hint {:?}, applying common rules only", code);
                }
                category
            }
            None if self.infer_category => {
                let category = Category::parse(&record.category);
                if let Some(c) = category {
                    debug!("Inferred category {} from record", c);
                }
                category
            }
            None => None,
        }
    }
}

impl CertificateParser for RecordExtractor {
    fn parse(&self, raw: &str, category_hint: Option<&str>) -> Result<ExtractionResult> {
        ensure_usable(raw)?;
        if has_boilerplate(raw) {
            debug!("Removing page headers and stamps before extraction");
        }
        let text = normalize(raw);
        info!("Extracting certificate fields from {} characters of text", text.len());
        Ok(self.extract_with_report(&text, category_hint))
    }
}

/// Apply one rule, returning whether it matched.
fn apply_rule(rule: &CompiledRule, text: &str, record: &mut VehicleRecord) -> bool {
    let Some(caps) = rule.captures(text) else {
        return false;
    };

    match rule.rule.capture {
        Capture::Slot(slot) => {
            let value = group(&caps, 1);
            if value.is_empty() {
                return false;
            }
            *record.slot_mut(slot) = value;
        }
        Capture::Dimensions => {
            record.dimensions.length = group(&caps, 1);
            record.dimensions.width = group(&caps, 2);
            record.dimensions.height = group(&caps, 3);
        }
        Capture::IssueDate => {
            let (day, month, year) = (group(&caps, 1), group(&caps, 2), group(&caps, 3));
            if month_number(&month).is_none() {
                warn!("Unrecognized month name {:?} in issue date, using January", month);
            }
            let date = IssueDate::compose(&day, &month, &year);
            record.issue_date = date.formatted;
            record.issue_day = date.day;
            record.issue_month = date.month_name;
        }
    }
    true
}

fn group(caps: &Captures<'_>, i: usize) -> String {
    caps.get(i).map(|m| clean_value(m.as_str())).unwrap_or_default()
}

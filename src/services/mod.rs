//! Computation units
//!
//! Stateless functions over model values: the recurrence projector, the
//! receipt field extractor and its OCR front-end, and keyword-based category
//! suggestions.

pub mod categorize;
pub mod ocr;
pub mod projection;
pub mod receipt;

pub use categorize::KeywordMap;
pub use ocr::{scan_receipt, OcrEngine, OcrOutput, ReceiptScan, TesseractEngine};
pub use projection::{
    occurrences_in_range, total_in_range, totals_by_category, CategoryTotals, LedgerItem,
    Occurrence, OrphanReference,
};
pub use receipt::extract_fields;

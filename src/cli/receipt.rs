//! Receipt CLI commands
//!
//! `parse` reads already-recognized text, `scan` runs the OCR engine first.
//! Either can record the result as a one-time expense with `--add`.

use std::io::Read;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde::Serialize;

use crate::config::settings::Settings;
use crate::display::format_receipt_fields;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{OneTimeEntry, ReceiptFields};
use crate::services::categorize::KeywordMap;
use crate::services::ocr::{scan_receipt, TesseractEngine};
use crate::services::receipt::extract_fields;
use crate::state::{Command, Record};
use crate::storage::Storage;

use super::{print_json, today};

/// Receipt subcommands
#[derive(Subcommand)]
pub enum ReceiptCommands {
    /// Extract fields from receipt text (a file, or stdin when omitted)
    Parse {
        /// Text file holding OCR output
        file: Option<PathBuf>,
        #[command(flatten)]
        output: ReceiptOutput,
    },

    /// OCR a receipt image, then extract its fields
    Scan {
        /// Image file (png, jpg, tiff, ...)
        image: PathBuf,
        /// Tesseract language code, e.g. "deu"
        #[arg(long)]
        lang: Option<String>,
        #[command(flatten)]
        output: ReceiptOutput,
    },
}

/// Flags shared by `parse` and `scan`
#[derive(Args, Debug, Clone, Default)]
pub struct ReceiptOutput {
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Record the receipt as a one-time expense
    #[arg(long)]
    pub add: bool,

    /// Category for --add (default: the suggested category)
    #[arg(short, long, requires = "add")]
    pub category: Option<String>,

    /// Expense name for --add (default: the merchant)
    #[arg(short, long, requires = "add")]
    pub name: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReceiptReport<'a> {
    #[serde(flatten)]
    fields: &'a ReceiptFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggested_category: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    confidence: Option<f64>,
}

/// Handle a receipt command
pub fn handle_receipt_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReceiptCommands,
) -> FinanceResult<()> {
    let (fields, confidence, output) = match cmd {
        ReceiptCommands::Parse { file, output } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(&path).map_err(|e| {
                    FinanceError::Io(format!("Failed to read {}: {}", path.display(), e))
                })?,
                None => {
                    let mut text = String::new();
                    std::io::stdin().read_to_string(&mut text)?;
                    text
                }
            };
            (extract_fields(&text), None, output)
        }

        ReceiptCommands::Scan {
            image,
            lang,
            output,
        } => {
            let mut engine = TesseractEngine::new(settings.ocr_command.as_str());
            if let Some(lang) = lang {
                engine = engine.with_language(lang);
            }
            let scan = scan_receipt(&engine, &image)?;
            (scan.fields, Some(scan.confidence), output)
        }
    };

    let keywords = KeywordMap::from_settings(settings);
    let suggested = fields.merchant.as_deref().and_then(|m| keywords.suggest(m));

    if output.json {
        print_json(&ReceiptReport {
            fields: &fields,
            suggested_category: suggested,
            confidence,
        })?;
    } else {
        print!("{}", format_receipt_fields(&fields, suggested, confidence));
    }

    if output.add {
        let expense = receipt_expense(storage, &fields, suggested, &output)?;
        storage.apply(Command::Add(Record::OneTimeExpense(expense.clone())))?;
        if !output.json {
            println!("Added expense {} ({}) on {}", expense.name, expense.amount, expense.date);
        }
    }

    Ok(())
}

fn receipt_expense(
    storage: &Storage,
    fields: &ReceiptFields,
    suggested: Option<&str>,
    output: &ReceiptOutput,
) -> FinanceResult<OneTimeEntry> {
    let amount = fields.total.ok_or_else(|| {
        FinanceError::Validation("No total found on the receipt; nothing to add".into())
    })?;

    let state = storage.load()?;
    let category = match (output.category.as_deref(), suggested) {
        (Some(category), _) | (None, Some(category)) => state.resolve_category(category)?,
        (None, None) => {
            return Err(FinanceError::Validation(
                "No category could be suggested; pass --category".into(),
            ))
        }
    };

    let name = output
        .name
        .clone()
        .or_else(|| fields.merchant.clone())
        .unwrap_or_else(|| "Receipt".to_string());

    Ok(OneTimeEntry::expense(
        name.trim(),
        amount,
        fields.date.unwrap_or_else(today),
        category.id,
    ))
}

//! OCR front-end for receipt images
//!
//! Recognition itself is delegated to an [`OcrEngine`]. The default engine
//! shells out to the `tesseract` binary and reads its TSV output, which carries
//! per-word confidences.

use std::path::Path;
use std::process::Command;

use serde::Serialize;

use crate::error::{FinanceError, FinanceResult};
use crate::models::ReceiptFields;

use super::receipt::extract_fields;

/// Image extensions accepted by [`scan_receipt`]
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tif", "tiff", "webp"];

/// Recognized text plus the engine's confidence in the range 0.0..=1.0
#[derive(Debug, Clone, PartialEq)]
pub struct OcrOutput {
    pub text: String,
    pub confidence: f64,
}

/// Anything that can turn an image file into text
pub trait OcrEngine {
    fn recognize(&self, image: &Path) -> FinanceResult<OcrOutput>;
}

/// Runs an external tesseract-compatible command
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    program: String,
    language: Option<String>,
}

impl TesseractEngine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            language: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &Path) -> FinanceResult<OcrOutput> {
        let mut command = Command::new(&self.program);
        command.arg(image).arg("stdout");
        if let Some(language) = &self.language {
            command.arg("-l").arg(language);
        }
        command.arg("tsv");

        tracing::debug!(program = %self.program, image = %image.display(), "running OCR");
        let output = command.output().map_err(|e| {
            FinanceError::Ocr(format!("Failed to run '{}': {}", self.program, e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FinanceError::Ocr(format!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        Ok(parse_tsv(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Rebuild line-broken text and mean word confidence from tesseract TSV.
///
/// Only word rows (level 5) with a non-negative confidence are used. Words
/// are grouped into lines by their (page, block, paragraph, line) numbers.
pub fn parse_tsv(tsv: &str) -> OcrOutput {
    let mut lines: Vec<((u32, u32, u32, u32), Vec<String>)> = Vec::new();
    let mut confidence_sum = 0.0;
    let mut word_count = 0usize;

    for row in tsv.lines().skip(1) {
        let cols: Vec<&str> = row.split('\t').collect();
        if cols.len() < 12 || cols[0] != "5" {
            continue;
        }
        let Ok(conf) = cols[10].trim().parse::<f64>() else {
            continue;
        };
        let word = cols[11].trim();
        if conf < 0.0 || word.is_empty() {
            continue;
        }

        let key = (
            cols[1].parse().unwrap_or(0),
            cols[2].parse().unwrap_or(0),
            cols[3].parse().unwrap_or(0),
            cols[4].parse().unwrap_or(0),
        );
        match lines.last_mut() {
            Some((last_key, words)) if *last_key == key => words.push(word.to_string()),
            _ => lines.push((key, vec![word.to_string()])),
        }

        confidence_sum += conf;
        word_count += 1;
    }

    let text = lines
        .into_iter()
        .map(|(_, words)| words.join(" "))
        .collect::<Vec<_>>()
        .join("\n");
    let confidence = if word_count == 0 {
        0.0
    } else {
        (confidence_sum / word_count as f64 / 100.0).clamp(0.0, 1.0)
    };

    OcrOutput { text, confidence }
}

/// Result of scanning a receipt image
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptScan {
    pub fields: ReceiptFields,
    pub confidence: f64,
    pub raw_text: String,
}

/// Whether the path has one of the supported image extensions
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// OCR an image and extract receipt fields from the recognized text
pub fn scan_receipt(engine: &dyn OcrEngine, image: &Path) -> FinanceResult<ReceiptScan> {
    if !image.exists() {
        return Err(FinanceError::Ocr(format!(
            "Image not found: {}",
            image.display()
        )));
    }
    if !is_supported_image(image) {
        return Err(FinanceError::Ocr(format!(
            "Unsupported image type: {} (expected one of {})",
            image.display(),
            SUPPORTED_EXTENSIONS.join(", ")
        )));
    }

    let output = engine.recognize(image)?;
    tracing::info!(
        image = %image.display(),
        confidence = output.confidence,
        "receipt recognized"
    );

    Ok(ReceiptScan {
        fields: extract_fields(&output.text),
        confidence: output.confidence,
        raw_text: output.text,
    })
}

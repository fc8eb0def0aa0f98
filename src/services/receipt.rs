//! Receipt field extraction
//!
//! Turns raw OCR text into a `ReceiptFields` record using line-oriented
//! heuristics. Extraction never fails: a field whose heuristic finds nothing is
//! simply left empty.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Currency, Money, ReceiptFields};

/// Number of leading non-blank lines searched for the merchant name
const MERCHANT_SCAN_LINES: usize = 6;

static CURRENCY_PATTERNS: Lazy<Vec<(Currency, Regex)>> = Lazy::new(|| {
    vec![
        (Currency::Eur, Regex::new(r"€|(?i)(?:\b|\d)EUR(?:OS?)?\b").unwrap()),
        (Currency::Usd, Regex::new(r"\$|(?i)(?:\b|\d)USD\b").unwrap()),
        (Currency::Gbp, Regex::new(r"£|(?i)(?:\b|\d)GBP\b").unwrap()),
    ]
});

/// Date layouts in priority order: day/month/year, ISO, day.month.year
static DATE_PATTERNS: Lazy<Vec<(DateLayout, Regex)>> = Lazy::new(|| {
    vec![
        (
            DateLayout::DayFirst,
            Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{2}|\d{4})\b").unwrap(),
        ),
        (
            DateLayout::YearFirst,
            Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").unwrap(),
        ),
        (
            DateLayout::DayFirst,
            Regex::new(r"\b(\d{1,2})\.(\d{1,2})\.(\d{2}|\d{4})\b").unwrap(),
        ),
    ]
});

/// A decimal amount in group 1. The trailing non-digit lets a currency code
/// sit directly against the number (`12,50EUR`).
static AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,3}(?:[.,']\d{3})+[.,]\d{2}|\d+[.,]\d{2})(?:\D|$)").unwrap()
});

/// As [`AMOUNT`], but also taking a space as thousands separator. Only used
/// on total lines, where a stray quantity column is unlikely.
static SPACED_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,3}(?:[.,' ]\d{3})+[.,]\d{2}|\d+[.,]\d{2})(?:\D|$)").unwrap()
});

static TOTAL_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(total|grand total|amount due|balance due|amount payable|to pay|sum|totale|gesamt|summe|montant|betrag)\b",
    )
    .unwrap()
});

static SUBTOTAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bsub[\s-]?total\b").unwrap());

static HEADER_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(receipt|invoice|bill|vat|tax|tva|iva|mwst|ust|date|time|tel|phone|fax|www|http|https|email|order|table|cashier|server|guest|welcome|thank|thanks|total|subtotal|amount|balance|change)\b",
    )
    .unwrap()
});

static MIXED_CASE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{Lu}\p{Ll}+").unwrap());

static CAPS_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\p{Lu}{2,}\b").unwrap());

#[derive(Debug, Clone, Copy)]
enum DateLayout {
    DayFirst,
    YearFirst,
}

/// Extract merchant, total, currency and date from OCR text.
///
/// The currency is always filled: when no symbol or code is present the EUR
/// policy default is used. Use [`detect_currency`] to tell the two apart.
pub fn extract_fields(ocr_text: &str) -> ReceiptFields {
    let fields = ReceiptFields {
        merchant: detect_merchant(ocr_text),
        total: detect_total(ocr_text),
        currency: Some(detect_currency(ocr_text).unwrap_or_default()),
        date: detect_date(ocr_text),
    };
    tracing::debug!(?fields, "extracted receipt fields");
    fields
}

/// The currency whose symbol or code appears earliest in the text
pub fn detect_currency(text: &str) -> Option<Currency> {
    CURRENCY_PATTERNS
        .iter()
        .filter_map(|(currency, re)| re.find(text).map(|m| (m.start(), *currency)))
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, currency)| currency)
}

/// The first calendar-valid date in source order.
///
/// Candidates from all layouts are ordered by position; at the same position
/// the earlier layout wins. Two-digit years are read as 20YY.
pub fn detect_date(text: &str) -> Option<NaiveDate> {
    let mut candidates: Vec<(usize, usize, NaiveDate)> = Vec::new();

    for (priority, (layout, re)) in DATE_PATTERNS.iter().enumerate() {
        for caps in re.captures_iter(text) {
            let (Some(whole), Some(a), Some(b), Some(c)) =
                (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
            else {
                continue;
            };
            let (year, month, day) = match layout {
                DateLayout::DayFirst => (c.as_str(), b.as_str(), a.as_str()),
                DateLayout::YearFirst => (a.as_str(), b.as_str(), c.as_str()),
            };
            if let Some(date) = validated_date(year, month, day) {
                candidates.push((whole.start(), priority, date));
            }
        }
    }

    candidates
        .into_iter()
        .min_by_key(|(pos, priority, _)| (*pos, *priority))
        .map(|(_, _, date)| date)
}

fn validated_date(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    let month: u32 = month.parse().ok()?;
    let day: u32 = day.parse().ok()?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    let year: i32 = if year.len() == 2 {
        format!("20{}", year).parse().ok()?
    } else {
        year.parse().ok()?
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// The receipt total.
///
/// Lines naming a total ("total", "amount due", ...) are preferred and the
/// largest amount among them wins; subtotal lines do not count. Without any
/// such line the largest amount in the whole text is used.
pub fn detect_total(text: &str) -> Option<Money> {
    let mut best_keyword: Option<Money> = None;
    let mut best_any: Option<Money> = None;

    for line in text.lines() {
        let total_line = TOTAL_KEYWORDS.is_match(line) && !SUBTOTAL.is_match(line);
        let Some(line_max) = amounts_in_line(line, total_line).into_iter().max() else {
            continue;
        };

        best_any = best_any.max(Some(line_max));
        if total_line {
            best_keyword = best_keyword.max(Some(line_max));
        }
    }

    best_keyword.or(best_any)
}

/// Every decimal amount on a line, with date fragments masked out first so
/// `05.12.2024` is not read as `5.12`. Space grouping (`1 234,56`) is only
/// accepted when `spaced` is set.
fn amounts_in_line(line: &str, spaced: bool) -> Vec<Money> {
    let mut masked = line.to_string();
    for (_, re) in DATE_PATTERNS.iter() {
        masked = re
            .replace_all(&masked, |caps: &regex::Captures<'_>| " ".repeat(caps[0].len()))
            .into_owned();
    }

    let re = if spaced { &SPACED_AMOUNT } else { &AMOUNT };
    re.captures_iter(&masked)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| parse_amount(m.as_str()))
        .collect()
}

/// Parse an amount written with either European (`1.234,56`) or US
/// (`1,234.56`) grouping. The separator that appears last is the decimal one.
pub fn parse_amount(raw: &str) -> Option<Money> {
    let raw = raw.trim();
    let decimal_pos = raw.rfind(['.', ','])?;
    let (int_part, frac_part) = raw.split_at(decimal_pos);
    let frac_part = &frac_part[1..];

    let digits: String = int_part.chars().filter(|c| c.is_ascii_digit()).collect();
    if frac_part.is_empty() || !frac_part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let normalized = format!("{}.{}", if digits.is_empty() { "0" } else { &digits }, frac_part);
    Money::parse(&normalized).ok()
}

/// The merchant name: the first name-looking line near the top of the
/// receipt, falling back to the very first non-blank line
pub fn detect_merchant(text: &str) -> Option<String> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
    let first = lines.next()?;

    std::iter::once(first)
        .chain(lines)
        .take(MERCHANT_SCAN_LINES)
        .filter(|line| !is_mostly_digits(line))
        .filter(|line| !HEADER_KEYWORDS.is_match(line))
        .find(|line| looks_like_name(line))
        .or(Some(first))
        .map(clean_merchant)
        .filter(|name| !name.is_empty())
}

fn is_mostly_digits(line: &str) -> bool {
    let chars: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
    if chars.is_empty() {
        return true;
    }
    let digits = chars.iter().filter(|c| c.is_ascii_digit()).count();
    digits * 2 > chars.len()
}

fn looks_like_name(line: &str) -> bool {
    MIXED_CASE_WORD.is_match(line) || CAPS_TOKEN.is_match(line)
}

fn clean_merchant(line: &str) -> String {
    line.trim_matches(|c: char| !c.is_alphanumeric() && c != ')' && c != '.')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

//! Print parameter translation.
//!
//! BiDi speaks centimeters and structured page ranges; CDP wants inches
//! and a comma-separated range string.

use crate::error::{Error, Result};
use crate::protocol::browsing_context::PageRange;

/// Centimeters per inch.
const CM_PER_INCH: f64 = 2.54;

/// Convert a length in centimeters to inches.
pub fn cm_to_inches(cm: f64) -> f64 {
    cm / CM_PER_INCH
}

/// Validate and render page ranges into the CDP form.
///
/// A range is a single page number or `"N-M"` with `N <= M`; an empty
/// bound means the first or last page respectively.
pub fn format_page_ranges(ranges: &[PageRange]) -> Result<String> {
    let mut rendered = Vec::with_capacity(ranges.len());
    for range in ranges {
        match range {
            PageRange::Number(page) => {
                if *page == 0 {
                    return Err(Error::invalid_argument("Page numbers start at 1"));
                }
                rendered.push(page.to_string());
            }
            PageRange::Expression(expression) => {
                rendered.push(validate_range_expression(expression)?);
            }
        }
    }
    Ok(rendered.join(","))
}

fn parse_bound(bound: &str) -> Result<Option<u64>> {
    if bound.is_empty() {
        return Ok(None);
    }
    let page: u64 = bound
        .trim()
        .parse()
        .map_err(|_| Error::invalid_argument(format!("Invalid page bound '{bound}'")))?;
    if page == 0 {
        return Err(Error::invalid_argument("Page numbers start at 1"));
    }
    Ok(Some(page))
}

fn validate_range_expression(expression: &str) -> Result<String> {
    let trimmed = expression.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_argument("Empty page range"));
    }

    match trimmed.split_once('-') {
        None => {
            let page = parse_bound(trimmed)?.expect("non-empty bound");
            Ok(page.to_string())
        }
        Some((start, end)) => {
            let start = parse_bound(start)?;
            let end = parse_bound(end)?;
            if let (Some(start), Some(end)) = (start, end) {
                if start > end {
                    return Err(Error::invalid_argument(format!(
                        "Page range '{trimmed}' is reversed"
                    )));
                }
            }
            // Empty bounds mean the first and last page.
            Ok(format!(
                "{}-{}",
                start.map_or(String::from("1"), |s| s.to_string()),
                end.map_or(String::new(), |e| e.to_string())
            ))
        }
    }
}

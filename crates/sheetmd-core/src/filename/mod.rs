//! Output filename derivation.
//!
//! The server's `Content-Disposition` suggestion wins; otherwise the name is
//! derived from the uploaded workbook. Either way the result is sanitized
//! before it is joined onto the download directory.

mod content_disposition;
mod markdown;
mod sanitize;

pub use content_disposition::parse_content_disposition_filename;
pub use markdown::markdown_name_for;
pub use sanitize::{sanitize_filename, MAX_NAME_LEN};

/// Used when both the header and the original name sanitize to nothing.
pub const DEFAULT_FILENAME: &str = "download.md";

/// Picks the filename to save a converted document under.
///
/// # Examples
///
/// - `derive_output_filename(Some("attachment; filename=\"out.md\""), "report.xlsx")` → `"out.md"`
/// - `derive_output_filename(None, "report.xlsx")` → `"report.md"`
pub fn derive_output_filename(content_disposition: Option<&str>, original: &str) -> String {
    let suggested = content_disposition
        .and_then(parse_content_disposition_filename)
        .map(|name| sanitize_filename(&name))
        .filter(|name| !name.is_empty());

    if let Some(name) = suggested {
        return name;
    }

    let derived = sanitize_filename(&markdown_name_for(original));
    if derived.is_empty() || derived == MD_ONLY {
        DEFAULT_FILENAME.to_string()
    } else {
        derived
    }
}

/// What an empty original name turns into after derivation and trimming.
const MD_ONLY: &str = "md";

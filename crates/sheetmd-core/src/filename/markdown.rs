//! Output name derived from the uploaded workbook's name.

const XLSX_SUFFIX: &str = ".xlsx";
const MD_SUFFIX: &str = ".md";

/// `report.xlsx` → `report.md`. The `.xlsx` match ignores ASCII case;
/// any other name gets `.md` appended so the input is never reused as the output name.
pub fn markdown_name_for(original: &str) -> String {
    let split = original.len().checked_sub(XLSX_SUFFIX.len());
    match split {
        Some(at)
            if original.is_char_boundary(at)
                && original[at..].eq_ignore_ascii_case(XLSX_SUFFIX) =>
        {
            format!("{}{}", &original[..at], MD_SUFFIX)
        }
        _ => format!("{}{}", original, MD_SUFFIX),
    }
}

//! Local-filesystem-safe filenames for server-suggested names.

use crate::download::TEMP_SUFFIX;

/// Linux NAME_MAX, less room for the `.part` temp suffix the sink writes first.
pub const MAX_NAME_LEN: usize = 255 - TEMP_SUFFIX.len();

/// Extensions longer than this are treated as part of the stem when truncating.
const MAX_EXT_LEN: usize = 16;

/// Makes a candidate filename safe to join onto the download directory.
///
/// - Path separators, NUL and control characters become `_`; a run of them becomes one `_`
/// - Underscores already in the name are kept as-is
/// - Leading/trailing spaces and dots are trimmed
/// - Capped at `MAX_NAME_LEN` bytes by shortening the stem, so the extension survives
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_replaced = false;

    for c in name.chars() {
        if c == '/' || c == '\\' || c.is_control() {
            if !prev_replaced {
                out.push('_');
            }
            prev_replaced = true;
        } else {
            out.push(c);
            prev_replaced = false;
        }
    }

    let trimmed = trim_name(&out);
    if trimmed.len() <= MAX_NAME_LEN {
        return trimmed.to_string();
    }

    let (stem, ext) = match trimmed.rfind('.') {
        Some(dot) if dot > 0 && trimmed.len() - dot <= MAX_EXT_LEN => trimmed.split_at(dot),
        _ => (trimmed, ""),
    };
    let mut take = MAX_NAME_LEN - ext.len();
    while !stem.is_char_boundary(take) {
        take -= 1;
    }
    format!("{}{}", trim_name(&stem[..take]), ext)
}

fn trim_name(s: &str) -> &str {
    s.trim_matches(|c: char| c == ' ' || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_path_components() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize_filename("a\\b.md"), "a_b.md");
        assert_eq!(sanitize_filename("a/\\/b.md"), "a_b.md");
    }

    #[test]
    fn keeps_inner_spaces() {
        assert_eq!(sanitize_filename("  Q3 report.md "), "Q3 report.md");
    }

    #[test]
    fn keeps_existing_underscores() {
        assert_eq!(sanitize_filename("__init__.md"), "__init__.md");
        assert_eq!(sanitize_filename("a__b.md"), "a__b.md");
        assert_eq!(sanitize_filename("a__/b.md"), "a___b.md");
    }

    #[test]
    fn control_chars_and_nul() {
        assert_eq!(sanitize_filename("out\x00put\n.md"), "out_put_.md");
    }

    #[test]
    fn long_name_leaves_room_for_temp_suffix_and_keeps_extension() {
        let name = format!("{}.md", "a".repeat(251));
        let s = sanitize_filename(&name);
        assert_eq!(s.len(), MAX_NAME_LEN);
        assert!(s.ends_with("a.md"));
        assert!(s.len() + TEMP_SUFFIX.len() <= 255);
    }

    #[test]
    fn truncated_stem_does_not_end_in_dot_or_space() {
        let name = format!("{}{}.md", "b".repeat(246), " . .  ");
        let s = sanitize_filename(&name);
        assert!(s.ends_with("b.md"), "{}", s);
    }

    #[test]
    fn truncates_on_char_boundary() {
        let long = format!("{}.md", "設".repeat(100));
        let s = sanitize_filename(&long);
        assert!(s.len() <= MAX_NAME_LEN);
        assert!(s.ends_with(".md"));
        assert_eq!(s.chars().count(), 82 + 3);
    }

    #[test]
    fn long_name_without_extension() {
        let s = sanitize_filename(&"x".repeat(300));
        assert_eq!(s.len(), MAX_NAME_LEN);
    }

    #[test]
    fn only_dots() {
        assert_eq!(sanitize_filename(".."), "");
    }
}

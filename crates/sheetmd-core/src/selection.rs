//! The file chosen for upload.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Workbook type the conversion service accepts.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// A local file read into memory, ready to be wrapped in an upload request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    mime: String,
    bytes: Vec<u8>,
}

impl SelectedFile {
    /// Builds a selection from in-memory content; the MIME type is guessed from `name`.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime = guess_mime(&name);
        Self { name, mime, bytes }
    }

    /// Reads `path` and uses its final component as the upload name.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| anyhow::anyhow!("not a file path: {}", path.display()))?;
        let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
        Ok(Self::from_bytes(name, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// True if the name carries the `.xlsx` extension the server insists on.
    pub fn is_xlsx(&self) -> bool {
        Path::new(&self.name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"))
    }

    pub(crate) fn into_parts(self) -> (String, String, Vec<u8>) {
        (self.name, self.mime, self.bytes)
    }
}

fn guess_mime(name: &str) -> String {
    if Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"))
    {
        return XLSX_MIME.to_string();
    }
    mime_guess::from_path(name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// The picker slot: empty until a file is chosen.
#[derive(Debug, Clone, Default)]
pub struct FileSelection {
    file: Option<SelectedFile>,
}

impl FileSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, file: SelectedFile) {
        self.file = Some(file);
    }

    pub fn clear(&mut self) {
        self.file = None;
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }
}

impl From<SelectedFile> for FileSelection {
    fn from(file: SelectedFile) -> Self {
        Self { file: Some(file) }
    }
}

impl From<Option<SelectedFile>> for FileSelection {
    fn from(file: Option<SelectedFile>) -> Self {
        Self { file }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn xlsx_mime_and_flag() {
        let f = SelectedFile::from_bytes("Report.XLSX", vec![1, 2, 3]);
        assert_eq!(f.mime(), XLSX_MIME);
        assert!(f.is_xlsx());
        assert_eq!(f.len(), 3);
    }

    #[test]
    fn other_types_are_guessed() {
        assert_eq!(SelectedFile::from_bytes("a.csv", vec![]).mime(), "text/csv");
        assert_eq!(
            SelectedFile::from_bytes("blob", vec![]).mime(),
            "application/octet-stream"
        );
        assert!(!SelectedFile::from_bytes("a.csv", vec![]).is_xlsx());
    }

    #[test]
    fn from_path_reads_content_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.xlsx");
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(b"PK\x03\x04").unwrap();
        drop(f);

        let sel = SelectedFile::from_path(&path).unwrap();
        assert_eq!(sel.name(), "plan.xlsx");
        assert_eq!(sel.bytes(), b"PK\x03\x04");
    }

    #[test]
    fn from_path_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SelectedFile::from_path(&dir.path().join("nope.xlsx")).is_err());
    }

    #[test]
    fn selection_slot() {
        let mut slot = FileSelection::new();
        assert!(slot.selected().is_none());
        slot.select(SelectedFile::from_bytes("a.xlsx", vec![]));
        assert_eq!(slot.selected().map(|f| f.name()), Some("a.xlsx"));
        slot.clear();
        assert!(slot.selected().is_none());
    }
}

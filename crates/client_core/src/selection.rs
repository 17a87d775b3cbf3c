use std::path::Path;

use crate::error::DocumentFileError;

/// A document picked by the user, held in memory until it is uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFile {
    name: String,
    mime_type: Option<String>,
    bytes: Vec<u8>,
}

impl DocumentFile {
    pub fn new(
        name: impl Into<String>,
        mime_type: Option<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, DocumentFileError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DocumentFileError::EmptyName);
        }
        Ok(Self {
            name,
            mime_type,
            bytes,
        })
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, DocumentFileError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| DocumentFileError::Read {
                path: path.display().to_string(),
                source,
            })?;
        let mime_type = mime_guess::from_path(path)
            .first()
            .map(|mime| mime.essence_str().to_string());
        Self::new(name, mime_type, bytes)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
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
}

/// Files chosen by the user. Each selection replaces the previous one wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    files: Vec<DocumentFile>,
    selected_name: String,
}

impl SelectionState {
    pub fn select(&mut self, files: Vec<DocumentFile>) {
        self.selected_name = files
            .first()
            .map(|file| file.name().to_string())
            .unwrap_or_default();
        self.files = files;
    }

    pub fn clear(&mut self) {
        self.select(Vec::new());
    }

    pub fn files(&self) -> &[DocumentFile] {
        &self.files
    }

    /// Display name of the first selected file, empty when nothing is selected.
    pub fn selected_name(&self) -> &str {
        &self.selected_name
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        env, fs,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn doc(name: &str) -> DocumentFile {
        DocumentFile::new(name, None, b"%PDF-1.7".to_vec()).expect("document")
    }

    #[test]
    fn select_takes_display_name_from_first_file() {
        let mut selection = SelectionState::default();
        selection.select(vec![doc("report.pdf"), doc("appendix.pdf")]);

        assert_eq!(selection.selected_name(), "report.pdf");
        assert_eq!(selection.files().len(), 2);
    }

    #[test]
    fn select_replaces_instead_of_merging() {
        let mut selection = SelectionState::default();
        selection.select(vec![doc("a.pdf"), doc("b.pdf")]);
        selection.select(vec![doc("c.pdf")]);

        assert_eq!(selection.files(), &[doc("c.pdf")]);
        assert_eq!(selection.selected_name(), "c.pdf");
    }

    #[test]
    fn empty_selection_clears_name() {
        let mut selection = SelectionState::default();
        selection.select(vec![doc("a.pdf")]);
        selection.select(Vec::new());

        assert!(selection.is_empty());
        assert_eq!(selection.selected_name(), "");
        assert_eq!(selection, SelectionState::default());
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(matches!(
            DocumentFile::new("  ", None, Vec::new()),
            Err(DocumentFileError::EmptyName)
        ));
    }

    #[tokio::test]
    async fn from_path_reads_bytes_name_and_mime_type() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let temp_root = env::temp_dir().join(format!("docchat_selection_test_{suffix}"));
        fs::create_dir_all(&temp_root).expect("temp root");
        let path = temp_root.join("report.pdf");
        fs::write(&path, b"%PDF-1.7 test").expect("write");

        let file = DocumentFile::from_path(&path).await.expect("read document");
        assert_eq!(file.name(), "report.pdf");
        assert_eq!(file.mime_type(), Some("application/pdf"));
        assert_eq!(file.bytes(), b"%PDF-1.7 test");

        fs::remove_dir_all(temp_root).expect("cleanup");
    }

    #[tokio::test]
    async fn from_path_reports_missing_file() {
        let err = DocumentFile::from_path("/definitely/not/here.pdf")
            .await
            .expect_err("must fail");
        assert!(matches!(err, DocumentFileError::Read { .. }));
    }
}

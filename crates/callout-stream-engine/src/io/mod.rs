use relative_path::RelativePath;
use std::fs;
use std::path::{Path, PathBuf};

use crate::editing::{Document, SharedAnchors};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("File is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("Invalid notes directory: {0}")]
    InvalidNotesDir(String),
}

/// Read a markdown file and return its content
pub fn read_file(relative_path: &RelativePath, notes_root: &Path) -> Result<String, IoError> {
    let absolute_path = relative_path.to_path(notes_root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    fs::read_to_string(&absolute_path).map_err(IoError::Io)
}

/// Write content to a markdown file
pub fn write_file(
    relative_path: &RelativePath,
    notes_root: &Path,
    content: &str,
) -> Result<(), IoError> {
    write_bytes(relative_path, notes_root, content.as_bytes())
}

fn write_bytes(
    relative_path: &RelativePath,
    notes_root: &Path,
    bytes: &[u8],
) -> Result<(), IoError> {
    let absolute_path = relative_path.to_path(notes_root);

    // Create parent directories if they don't exist
    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    fs::write(&absolute_path, bytes).map_err(IoError::Io)
}

/// Load a markdown file into a document whose edits map `anchors`
pub fn load_document(
    relative_path: &RelativePath,
    notes_root: &Path,
    anchors: SharedAnchors,
) -> Result<Document, IoError> {
    let absolute_path = relative_path.to_path(notes_root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    let bytes = fs::read(&absolute_path)?;
    Ok(Document::from_bytes(&bytes, anchors)?)
}

/// Save a document's exact bytes back to disk
pub fn save_document(
    relative_path: &RelativePath,
    notes_root: &Path,
    document: &Document,
) -> Result<(), IoError> {
    write_bytes(relative_path, notes_root, &document.to_bytes())
}

pub fn validate_notes_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidNotesDir(
            "Directory does not exist".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::{AnchorSet, Edit, EditHost};
    use crate::tests::{create_test_file, create_test_notes_dir};

    #[test]
    fn test_validate_notes_dir_exists() {
        let notes_dir = create_test_notes_dir();
        assert!(validate_notes_dir(notes_dir.path()).is_ok());
    }

    #[test]
    fn test_validate_notes_dir_not_exists() {
        let result = validate_notes_dir(Path::new("/nonexistent/path"));
        assert!(matches!(result, Err(IoError::InvalidNotesDir(_))));
    }

    #[test]
    fn test_read_file_success() {
        let notes_dir = create_test_notes_dir();
        create_test_file(&notes_dir, "test.md", "# Test Content\n\nParagraph");

        let content = read_file(RelativePath::new("test.md"), notes_dir.path()).unwrap();
        assert_eq!(content, "# Test Content\n\nParagraph");
    }

    #[test]
    fn test_read_file_not_found() {
        let notes_dir = create_test_notes_dir();
        let result = read_file(RelativePath::new("nonexistent.md"), notes_dir.path());
        assert!(matches!(result, Err(IoError::NotFound(_))));
    }

    #[test]
    fn test_write_file_creates_parent_directories() {
        let notes_dir = create_test_notes_dir();
        let relative_path = RelativePath::new("folder/subfolder/new_file.md");
        let content = "# New File in Nested Folder";

        write_file(relative_path, notes_dir.path(), content).unwrap();

        let written_content = read_file(relative_path, notes_dir.path()).unwrap();
        assert_eq!(written_content, content);
        assert!(notes_dir.path().join("folder").join("subfolder").is_dir());
    }

    #[test]
    fn test_document_round_trip_after_edit() {
        let notes_dir = create_test_notes_dir();
        create_test_file(&notes_dir, "doc.md", "Line one\r\nLine two\n");
        let relative_path = RelativePath::new("doc.md");

        let mut document =
            load_document(relative_path, notes_dir.path(), AnchorSet::shared()).unwrap();
        let end = document.len();
        document.apply(Edit::insert(end, "Line three\n")).unwrap();
        save_document(relative_path, notes_dir.path(), &document).unwrap();

        let saved = read_file(relative_path, notes_dir.path()).unwrap();
        assert_eq!(saved, "Line one\r\nLine two\nLine three\n");
    }

    #[test]
    fn test_load_document_rejects_invalid_utf8() {
        let notes_dir = create_test_notes_dir();
        std::fs::write(notes_dir.path().join("binary.md"), [0x66, 0xff, 0x6f]).unwrap();

        let result = load_document(
            RelativePath::new("binary.md"),
            notes_dir.path(),
            AnchorSet::shared(),
        );

        assert!(matches!(result, Err(IoError::Utf8(_))));
    }

    #[test]
    fn test_load_document_missing_file() {
        let notes_dir = create_test_notes_dir();

        let result = load_document(
            RelativePath::new("missing.md"),
            notes_dir.path(),
            AnchorSet::shared(),
        );

        assert!(matches!(result, Err(IoError::NotFound(_))));
    }
}

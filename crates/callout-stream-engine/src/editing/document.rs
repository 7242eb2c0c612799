use xi_rope::Rope;

use crate::editing::{Edit, Patch, SharedAnchors};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EditError {
    #[error("Edit range {start}..{end} is outside the document (length {len})")]
    OutOfBounds { start: usize, end: usize, len: usize },
    #[error("Edit offset {0} is not on a character boundary")]
    NotCharBoundary(usize),
}

/// Where edits are applied. The stream inserter decides what goes where; the host performs it.
pub trait EditHost {
    /// Current document length in bytes
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Offset of the end of the line containing `offset`, before its line break
    fn line_end_at(&self, offset: usize) -> usize;

    /// Apply an edit, keeping every registered anchor in step with it
    fn apply(&mut self, edit: Edit) -> Result<Patch, EditError>;
}

/// Markdown document being written into
///
/// The document keeps:
///
/// - **Lossless storage**: the whole text in one `xi_rope::Rope` buffer, saved back verbatim
/// - **Anchor mapping**: a handle to the caller-owned anchor set, transformed on every edit
///   before `apply` returns so no reader ever sees a stale anchor
/// - **Versioning**: a counter bumped on every applied edit
///
/// ```rust
/// # use callout_stream_engine::editing::{AnchorId, AnchorSet, Document, Edit, EditHost};
/// let anchors = AnchorSet::shared();
/// let mut doc = Document::new("Hello world", anchors.clone());
///
/// let id = AnchorId::new();
/// anchors.borrow_mut().register(id, 5, doc.len()).unwrap();
///
/// doc.apply(Edit::insert(0, ">> ")).unwrap();
/// assert_eq!(doc.text(), ">> Hello world");
/// assert_eq!(anchors.borrow().get(id).unwrap().to, 8);
/// ```
pub struct Document {
    /// xi-rope buffer containing the entire document as UTF-8
    pub(crate) buffer: Rope,
    /// Version counter incremented on each edit
    pub(crate) version: u64,
    /// Anchors owned by the caller, mapped through every edit
    pub(crate) anchors: SharedAnchors,
}

impl Document {
    pub fn new(text: &str, anchors: SharedAnchors) -> Self {
        Self {
            buffer: Rope::from(text),
            version: 0,
            anchors,
        }
    }

    /// Create a new document from raw bytes
    pub fn from_bytes(bytes: &[u8], anchors: SharedAnchors) -> Result<Self, std::str::Utf8Error> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::new(text, anchors))
    }

    /// Get the document's content as raw bytes (exact round-trip)
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buffer.to_string().into_bytes()
    }

    /// Get the current text content
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// Get the current version
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn anchors(&self) -> &SharedAnchors {
        &self.anchors
    }

    /// Slice the buffer to a cow string, clamping the range to the document
    pub fn slice_to_cow(&self, range: std::ops::Range<usize>) -> std::borrow::Cow<'_, str> {
        let doc_len = self.buffer.len();
        let start = range.start.min(doc_len);
        let end = range.end.min(doc_len).max(start);
        self.buffer.slice_to_cow(start..end)
    }

    fn check_offset(&self, offset: usize) -> Result<(), EditError> {
        if offset < self.buffer.len() && !self.buffer.is_codepoint_boundary(offset) {
            return Err(EditError::NotCharBoundary(offset));
        }
        Ok(())
    }

    fn validate(&self, edit: &Edit) -> Result<(), EditError> {
        let range = edit.deleted_range();
        let len = self.buffer.len();
        if range.end > len {
            return Err(EditError::OutOfBounds {
                start: range.start,
                end: range.end,
                len,
            });
        }
        self.check_offset(range.start)?;
        self.check_offset(range.end)
    }
}

impl EditHost for Document {
    fn len(&self) -> usize {
        self.buffer.len()
    }

    fn line_end_at(&self, offset: usize) -> usize {
        let len = self.buffer.len();
        let start = offset.min(len);
        let text = self.buffer.slice_to_cow(0..len);
        let rest = &text.as_bytes()[start..];
        match rest.iter().position(|&byte| byte == b'\n') {
            Some(newline) if newline > 0 && rest[newline - 1] == b'\r' => start + newline - 1,
            Some(newline) => start + newline,
            None => len,
        }
    }

    /// Apply an edit to the buffer
    ///
    /// 1. **Validation**: the deleted range must fit the document and sit on char boundaries
    /// 2. **Delta compilation**: the edit becomes an xi-rope `Delta`
    /// 3. **Buffer application**: the delta replaces the rope
    /// 4. **Anchor transformation**: every live anchor is mapped through the same edit
    /// 5. **Version increment**
    fn apply(&mut self, edit: Edit) -> Result<Patch, EditError> {
        self.validate(&edit)?;

        let delta = edit.to_delta(self.buffer.len());
        self.buffer = delta.apply(&self.buffer);

        self.anchors.borrow_mut().apply_edit(&edit);

        self.version += 1;
        log::trace!(
            "applied edit at {} (-{} +{}), version {}",
            edit.at,
            edit.delete_len,
            edit.text.len(),
            self.version
        );

        Ok(Patch {
            changed: vec![edit.inserted_range()],
            version: self.version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::{AnchorId, AnchorSet};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn doc(text: &str) -> Document {
        Document::new(text, AnchorSet::shared())
    }

    // ============ Basic document tests ============

    #[test]
    fn test_document_from_bytes_valid_utf8() {
        let text = "# Hello World\n\nThis is a test document.";
        let doc = Document::from_bytes(text.as_bytes(), AnchorSet::shared())
            .expect("Should create document from valid UTF-8");

        assert_eq!(doc.to_bytes(), text.as_bytes());
        assert_eq!(doc.version(), 0);
    }

    #[test]
    fn test_document_from_bytes_invalid_utf8() {
        let invalid_bytes = vec![0xFF, 0xFE, 0xFD];
        assert!(Document::from_bytes(&invalid_bytes, AnchorSet::shared()).is_err());
    }

    #[test]
    fn test_document_with_mixed_line_endings() {
        let text = "Unix line\nWindows line\r\nAnother Unix\n";
        assert_eq!(doc(text).to_bytes(), text.as_bytes());
    }

    // ============ Edit application ============

    #[test]
    fn test_apply_insert_delete_replace() {
        let mut d = doc("Hello world");

        d.apply(Edit::insert(5, ",")).unwrap();
        assert_eq!(d.text(), "Hello, world");

        d.apply(Edit::delete(0..7)).unwrap();
        assert_eq!(d.text(), "world");

        let patch = d.apply(Edit::replace(0..1, "W")).unwrap();
        assert_eq!(d.text(), "World");
        assert_eq!(patch.version, 3);
        assert_eq!(patch.changed, vec![0..1]);
    }

    #[test]
    fn test_apply_rejects_out_of_bounds() {
        let mut d = doc("abc");
        let result = d.apply(Edit::delete(2..6));

        assert_eq!(
            result.unwrap_err(),
            EditError::OutOfBounds {
                start: 2,
                end: 6,
                len: 3
            }
        );
        assert_eq!(d.text(), "abc");
        assert_eq!(d.version(), 0);
    }

    #[test]
    fn test_apply_rejects_split_character() {
        let mut d = doc("a🦀b");
        assert_eq!(
            d.apply(Edit::insert(2, "x")).unwrap_err(),
            EditError::NotCharBoundary(2)
        );
        assert!(d.apply(Edit::insert(5, "x")).is_ok());
        assert_eq!(d.text(), "a🦀xb");
    }

    #[test]
    fn test_apply_maps_shared_anchors() {
        let anchors = AnchorSet::shared();
        let mut d = Document::new("0123456789", anchors.clone());
        let id = AnchorId::new();
        anchors.borrow_mut().register(id, 6, d.len()).unwrap();

        d.apply(Edit::insert(2, "ab")).unwrap();
        d.apply(Edit::delete(0..2)).unwrap();

        let anchor = anchors.borrow().get(id).cloned().unwrap();
        assert_eq!((anchor.from, anchor.to), (6, 6));
        assert_eq!(d.slice_to_cow(anchor.from..d.len()), "6789");
    }

    #[test]
    fn test_slice_clamps_stale_ranges() {
        let d = doc("short");
        assert_eq!(d.slice_to_cow(3..100), "rt");
        assert_eq!(d.slice_to_cow(50..60), "");
    }

    // ============ Line lookup ============

    #[rstest]
    #[case::middle_of_first_line("first\nsecond", 2, 5)]
    #[case::at_line_end("first\nsecond", 5, 5)]
    #[case::last_line_without_break("first\nsecond", 7, 12)]
    #[case::crlf_line("first\r\nsecond", 1, 5)]
    #[case::empty_line("a\n\nb", 2, 2)]
    #[case::past_end("abc", 10, 3)]
    fn test_line_end_at(#[case] text: &str, #[case] offset: usize, #[case] expected: usize) {
        assert_eq!(doc(text).line_end_at(offset), expected);
    }
}

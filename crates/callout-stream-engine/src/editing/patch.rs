/// Result of applying an edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Byte ranges of the new document filled by the edit
    pub changed: Vec<std::ops::Range<usize>>,
    pub version: u64,
}

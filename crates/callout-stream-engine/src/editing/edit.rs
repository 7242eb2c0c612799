use xi_rope::delta::Builder;
use xi_rope::{Delta, Rope, RopeInfo};

/// A single document mutation: delete `delete_len` bytes at `at`, then insert `text` there
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub at: usize,
    pub delete_len: usize,
    pub text: String,
}

impl Edit {
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self {
            at,
            delete_len: 0,
            text: text.into(),
        }
    }

    pub fn delete(range: std::ops::Range<usize>) -> Self {
        Self {
            at: range.start,
            delete_len: range.len(),
            text: String::new(),
        }
    }

    pub fn replace(range: std::ops::Range<usize>, text: impl Into<String>) -> Self {
        Self {
            at: range.start,
            delete_len: range.len(),
            text: text.into(),
        }
    }

    /// Byte range of the original document this edit removes
    pub fn deleted_range(&self) -> std::ops::Range<usize> {
        self.at..self.at + self.delete_len
    }

    /// Byte range of the new document this edit fills
    pub fn inserted_range(&self) -> std::ops::Range<usize> {
        self.at..self.at + self.text.len()
    }

    pub fn is_noop(&self) -> bool {
        self.delete_len == 0 && self.text.is_empty()
    }

    /// Compile the edit into a delta over a document of `base_len` bytes.
    ///
    /// `base_len` must cover the deleted range; positions past the edit are copied through.
    pub(crate) fn to_delta(&self, base_len: usize) -> Delta<RopeInfo> {
        let mut builder = Builder::new(base_len);
        builder.replace(self.deleted_range(), Rope::from(self.text.as_str()));
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_describe_ranges() {
        let insert = Edit::insert(4, "abc");
        assert_eq!(insert.deleted_range(), 4..4);
        assert_eq!(insert.inserted_range(), 4..7);

        let delete = Edit::delete(2..6);
        assert_eq!(delete.delete_len, 4);
        assert_eq!(delete.inserted_range(), 2..2);

        let replace = Edit::replace(1..3, "xyz");
        assert_eq!(replace.deleted_range(), 1..3);
        assert_eq!(replace.inserted_range(), 1..4);
    }

    #[test]
    fn test_noop_edit() {
        assert!(Edit::insert(3, "").is_noop());
        assert!(!Edit::delete(0..1).is_noop());
    }

    #[test]
    fn test_delta_applies_to_rope() {
        let rope = Rope::from("hello world");
        let delta = Edit::replace(0..5, "goodbye").to_delta(rope.len());
        assert_eq!(delta.apply(&rope).to_string(), "goodbye world");
    }
}

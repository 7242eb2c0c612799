use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use uuid::Uuid;

use crate::editing::Edit;

/// Which side of an insertion made exactly at a position the position ends up on
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Bias {
    /// Stay in front of the inserted text
    #[default]
    Before,
    /// Move past the inserted text
    After,
}

/// Unique identifier for an anchor, one per generation request
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct AnchorId(pub Uuid);

impl AnchorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AnchorId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for AnchorId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Insertion point of one generation request that survives edits.
///
/// `from` is always mapped with [`Bias::Before`]; `to` is mapped with `bias`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Anchor {
    pub id: AnchorId,
    pub from: usize,
    pub to: usize,
    pub bias: Bias,
}

impl Anchor {
    /// Zero-width anchor whose end moves forward with text inserted at it
    pub fn at(id: AnchorId, position: usize) -> Self {
        Self {
            id,
            from: position,
            to: position,
            bias: Bias::After,
        }
    }

    /// Position one before the anchor's end, where the next chunk goes
    pub fn insertion_point(&self) -> Option<usize> {
        self.to.checked_sub(1)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AnchorError {
    #[error("Anchor position {position} is outside the document (length {len})")]
    OutOfBounds { position: usize, len: usize },
    #[error("Anchor {0} is already registered")]
    Duplicate(AnchorId),
}

/// Map a single position through an edit
pub fn map_position(position: usize, edit: &Edit, bias: Bias) -> usize {
    let deleted = edit.deleted_range();
    if position < deleted.start {
        position
    } else if position > deleted.end {
        position - edit.delete_len + edit.text.len()
    } else {
        // Touching or inside the deleted range: collapse to the edit point
        match bias {
            Bias::Before => deleted.start,
            Bias::After => deleted.start + edit.text.len(),
        }
    }
}

/// Transform an anchor through an edit, leaving the original untouched
pub fn map_through_edit(anchor: &Anchor, edit: &Edit) -> Anchor {
    Anchor {
        id: anchor.id,
        from: map_position(anchor.from, edit, Bias::Before),
        to: map_position(anchor.to, edit, anchor.bias),
        bias: anchor.bias,
    }
}

/// All live anchors, kept in document order
#[derive(Debug, Default)]
pub struct AnchorSet {
    anchors: Vec<Anchor>,
}

/// Anchor set shared between a document and the trackers reading it
pub type SharedAnchors = Rc<RefCell<AnchorSet>>;

impl AnchorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedAnchors {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Create a zero-width anchor at `position` in a document of `doc_len` bytes
    pub fn register(
        &mut self,
        id: AnchorId,
        position: usize,
        doc_len: usize,
    ) -> Result<Anchor, AnchorError> {
        if position > doc_len {
            return Err(AnchorError::OutOfBounds {
                position,
                len: doc_len,
            });
        }
        if self.contains(id) {
            return Err(AnchorError::Duplicate(id));
        }

        let anchor = Anchor::at(id, position);
        let index = self
            .anchors
            .partition_point(|existing| (existing.from, existing.to) <= (anchor.from, anchor.to));
        self.anchors.insert(index, anchor.clone());
        Ok(anchor)
    }

    /// Transform every live anchor through an edit
    pub fn apply_edit(&mut self, edit: &Edit) {
        if edit.is_noop() {
            return;
        }
        for anchor in &mut self.anchors {
            *anchor = map_through_edit(anchor, edit);
        }
        // Mapping is monotonic, so document order survives
        debug_assert!(
            self.anchors
                .windows(2)
                .all(|pair| (pair[0].from, pair[0].to) <= (pair[1].from, pair[1].to))
        );
    }

    /// Insertion point for `id`, or `None` when no such anchor is live
    pub fn resolve(&self, id: AnchorId) -> Option<usize> {
        self.anchors
            .iter()
            .find(|anchor| anchor.id == id)
            .and_then(Anchor::insertion_point)
    }

    pub fn get(&self, id: AnchorId) -> Option<&Anchor> {
        self.anchors.iter().find(|anchor| anchor.id == id)
    }

    pub fn contains(&self, id: AnchorId) -> bool {
        self.get(id).is_some()
    }

    /// Drop the anchor for `id`; later resolves report it as gone
    pub fn release(&mut self, id: AnchorId) -> Option<Anchor> {
        let index = self.anchors.iter().position(|anchor| anchor.id == id)?;
        Some(self.anchors.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Anchor> {
        self.anchors.iter()
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

/// Handle onto a shared [`AnchorSet`] used by the stream inserter
#[derive(Clone, Debug)]
pub struct AnchorTracker {
    anchors: SharedAnchors,
}

impl AnchorTracker {
    pub fn new(anchors: SharedAnchors) -> Self {
        Self { anchors }
    }

    pub fn register(
        &self,
        id: AnchorId,
        position: usize,
        doc_len: usize,
    ) -> Result<Anchor, AnchorError> {
        self.anchors.borrow_mut().register(id, position, doc_len)
    }

    /// Map the shared anchors through an edit made to some other buffer.
    ///
    /// `Document::apply` already does this for the set it was built with. Calling it again for
    /// the same edit maps every anchor twice.
    pub fn apply_edit(&self, edit: &Edit) {
        self.anchors.borrow_mut().apply_edit(edit);
    }

    pub fn resolve(&self, id: AnchorId) -> Option<usize> {
        self.anchors.borrow().resolve(id)
    }

    pub fn contains(&self, id: AnchorId) -> bool {
        self.anchors.borrow().contains(id)
    }

    pub fn get(&self, id: AnchorId) -> Option<Anchor> {
        self.anchors.borrow().get(id).cloned()
    }

    pub fn release(&self, id: AnchorId) -> Option<Anchor> {
        self.anchors.borrow_mut().release(id)
    }

    pub fn anchors(&self) -> &SharedAnchors {
        &self.anchors
    }
}

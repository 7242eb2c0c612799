/*!
 * # Editing Core Module
 *
 * The document model that streamed text is written into, and the anchors that
 * remember where each stream writes next.
 *
 * ## Architecture Overview
 *
 * ### 1. Single Source of Truth: xi-rope Buffer
 * - The entire document is stored in a single **`xi_rope::Rope`** buffer
 * - Every mutation is an **`Edit`** `(at, delete_len, text)` compiled to an xi-rope **Delta**
 * - Saving writes rope bytes verbatim
 *
 * ### 2. Anchors Survive Edits
 * - An **Anchor** is a `(from, to, bias)` marker keyed by an **AnchorId**
 * - `from` stays in front of text inserted exactly at it; `to` moves past it
 * - Deletions spanning an anchor collapse it to the deletion point
 * - The **AnchorSet** is owned by the caller and shared with the document, which maps
 *   it through every edit synchronously inside `Document::apply`
 *
 * ### 3. Insertion Point Convention
 * - `resolve(id)` answers with the offset one before the anchor's end
 * - Text inserted there lands inside the generated region and pushes the anchor's end forward,
 *   so the following chunk lands after it
 *
 * ## Module Structure
 *
 * - **`document`**: `Document` and the `EditHost` trait the stream inserter writes through
 * - **`edit`**: the `Edit` type and its delta compilation
 * - **`anchors`**: `Anchor`, `AnchorSet`, `AnchorTracker` and position mapping
 * - **`patch`**: edit result metadata
 *
 * ## Usage Pattern
 *
 * ```rust
 * use callout_stream_engine::editing::*;
 *
 * let anchors = AnchorSet::shared();
 * let mut doc = Document::new("Question?\n", anchors.clone());
 * let tracker = AnchorTracker::new(anchors);
 *
 * let id = AnchorId::new();
 * tracker.register(id, 9, doc.len()).unwrap();
 *
 * let at = tracker.resolve(id).unwrap();
 * doc.apply(Edit::insert(at, " Yes")).unwrap();
 * assert_eq!(doc.text(), "Question Yes?\n");
 * ```
 */

pub mod anchors;
pub mod document;
pub mod edit;
pub mod patch;

pub use anchors::{
    Anchor, AnchorError, AnchorId, AnchorSet, AnchorTracker, Bias, SharedAnchors,
    map_through_edit,
};
pub use document::{Document, EditError, EditHost};
pub use edit::Edit;
pub use patch::Patch;

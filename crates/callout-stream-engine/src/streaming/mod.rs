//! Streaming generated text into a document.
//!
//! A [`StreamInserter`] writes a callout header, anchors the request right after it, then feeds
//! each fragment of the response through [`format_fragment`] into the document at the anchor's
//! current insertion point.

pub mod error;
pub mod fragment;
pub mod inserter;
pub mod source;
pub mod template;

pub use error::{StreamError, UNKNOWN_ERROR, display_message};
pub use fragment::{Fragment, format_fragment};
pub use inserter::{Generation, StreamInserter, StreamOutcome};
pub use source::{FragmentStream, GenerationSource, PromptSpec};
pub use template::CalloutTemplate;

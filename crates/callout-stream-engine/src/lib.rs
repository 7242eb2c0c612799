pub mod editing;
pub mod io;
pub mod streaming;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use editing::{anchors::*, document::*, edit::*, patch::*};
pub use io::*;
pub use streaming::{error::*, fragment::*, inserter::*, source::*, template::*};

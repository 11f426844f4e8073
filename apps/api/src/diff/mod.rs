// Resume diffing: structural differ, path labels, metadata reconciliation.
// Everything here is pure; no I/O, no clocks (callers pass "now").

pub mod differ;
pub mod metadata;
pub mod path_format;

pub use differ::{diff, diff_documents, ChangeRecord};
pub use metadata::{merge, OptimizationMetadata};
pub use path_format::{label_changes, LabeledChange};

//! Repository mirroring and file selection.

mod clone;
mod walk;

pub use clone::{mirror_repo, MirrorOutcome};
pub use walk::{has_allowed_extension, select_files};

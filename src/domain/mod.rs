//! Domain logic - pure release rules independent of files and git

pub mod commit;
pub mod stage;
pub mod tag;
pub mod version;

pub use commit::CommitTemplate;
pub use stage::Stage;
pub use tag::{parse_release_ref, Tag};
pub use version::{compare, Bump, BumpKind, Version};

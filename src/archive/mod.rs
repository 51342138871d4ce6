mod index;
mod locator;

pub use index::{ArchiveHandle, ArchiveSet};
pub use locator::{class_entry_name, locate, EntrypointDescriptor};

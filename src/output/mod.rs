//! Post-rip metadata: document model and writer

pub mod metadata;
pub mod writer;

pub use metadata::{MetadataBuilder, MetadataDocument};
pub use writer::{write_metadata_document, MetadataWriter, METADATA_FILE_NAME};

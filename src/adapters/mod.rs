// Adapters - External system implementations

pub mod metadata_stub;
pub mod path_discovery;
pub mod process_runner;

// Re-export adapters
pub use metadata_stub::NullMetadataProvider;
pub use path_discovery::PathToolDiscovery;
pub use process_runner::SystemCommandRunner;

// Metadata stub adapter - Placeholder until an online catalogue is wired in

use crate::domain::model::DiscInfo;
use crate::ports::{MetadataLookup, MetadataProvider};

/// Provider that never finds anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMetadataProvider;

impl MetadataProvider for NullMetadataProvider {
    fn name(&self) -> &str {
        "none"
    }

    fn lookup_disc(&self, _disc: &DiscInfo) -> MetadataLookup {
        MetadataLookup {
            provider: self.name().to_string(),
            metadata: None,
            message: Some(
                "Metadata lookup is not yet implemented; continuing without it".to_string(),
            ),
        }
    }
}

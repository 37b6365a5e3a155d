use crate::adapters::{NullMetadataProvider, PathToolDiscovery, SystemCommandRunner};
use crate::app::inspect_interactor::InspectInteractor;
use crate::app::pipeline::DiscPipeline;
use crate::app::rip_interactor::RipInteractor;
use crate::config::AppConfig;
use crate::ports::{CommandRunner, MetadataProvider, ToolDiscovery};

pub trait AppContainer {
    fn rip_interactor<'a>(&'a self, config: &'a AppConfig) -> RipInteractor<'a>;
    fn inspect_interactor<'a>(&'a self, config: &'a AppConfig) -> InspectInteractor<'a>;
}

/// Owns the adapters and lends them to interactors
pub struct DefaultAppContainer {
    discovery: Box<dyn ToolDiscovery>,
    runner: Box<dyn CommandRunner>,
    metadata: Box<dyn MetadataProvider>,
}

impl Default for DefaultAppContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultAppContainer {
    /// Container wired to the host: `PATH` lookup and real processes
    pub fn new() -> Self {
        Self::with_adapters(
            Box::new(PathToolDiscovery::new()),
            Box::new(SystemCommandRunner::new()),
            Box::new(NullMetadataProvider),
        )
    }

    pub fn with_adapters(
        discovery: Box<dyn ToolDiscovery>,
        runner: Box<dyn CommandRunner>,
        metadata: Box<dyn MetadataProvider>,
    ) -> Self {
        Self {
            discovery,
            runner,
            metadata,
        }
    }

    fn pipeline<'a>(&'a self, config: &'a AppConfig) -> DiscPipeline<'a> {
        DiscPipeline::new(
            self.discovery.as_ref(),
            self.runner.as_ref(),
            self.metadata.as_ref(),
            config,
        )
    }
}

impl AppContainer for DefaultAppContainer {
    fn rip_interactor<'a>(&'a self, config: &'a AppConfig) -> RipInteractor<'a> {
        RipInteractor::new(self.pipeline(config))
    }

    fn inspect_interactor<'a>(&'a self, config: &'a AppConfig) -> InspectInteractor<'a> {
        InspectInteractor::new(self.pipeline(config))
    }
}

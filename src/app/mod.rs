// Application layer - Use case interactors

pub mod container;
pub mod inspect_interactor;
pub mod pipeline;
pub mod rip_interactor;

// Re-export interactors
pub use container::{AppContainer, DefaultAppContainer};
pub use inspect_interactor::{InspectInteractor, InspectRequest, InspectResponse};
pub use pipeline::{DiscPipeline, DiscSource, LoadedDisc};
pub use rip_interactor::{RipInteractor, RipRequest, RipResponse};

pub mod registry;
pub mod settings;

pub use registry::{ChangeKind, GeometryRegistry, SharedRegistry, SubscriptionId};
pub use settings::{AppSettings, RegistrationSettings, ServerSettings};

// Library crate: the headless mesh session used by the `meshlab` binary and
// by integration tests. Rendering is not part of this crate; viewers read
// geometry through `state::SharedRegistry` and poll `version()` for changes.

pub mod build;
pub mod command;
pub mod controls;
pub mod error;
pub mod export;
pub mod fixtures;
pub mod remote;
pub mod session;
pub mod state;
pub mod validation;

pub use error::ClientError;
pub use session::Session;

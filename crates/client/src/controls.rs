//! At-most-one-in-flight gating for request-triggering controls.
//!
//! A control is "disabled" while its request is outstanding. A second
//! trigger is rejected, never queued.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// A user control that starts a remote request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Register,
    Deform,
    Clean,
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Control::Register => "register",
            Control::Deform => "deform",
            Control::Clean => "clean",
        })
    }
}

/// Tracks which controls have a request outstanding.
#[derive(Debug, Clone, Default)]
pub struct ControlGate {
    in_flight: Arc<Mutex<HashSet<Control>>>,
}

impl ControlGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `control`, or fail with [`ClientError::Busy`] if it is taken.
    pub fn try_begin(&self, control: Control) -> Result<InFlight, ClientError> {
        let mut set = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !set.insert(control) {
            tracing::warn!("{control} rejected: request already in flight");
            return Err(ClientError::Busy { control });
        }
        tracing::debug!("{control} request started");
        Ok(InFlight {
            control,
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    /// Whether `control` should be shown disabled.
    pub fn is_busy(&self, control: Control) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&control)
    }
}

/// Guard for an outstanding request; releases its control on drop.
#[derive(Debug)]
pub struct InFlight {
    control: Control,
    in_flight: Arc<Mutex<HashSet<Control>>>,
}

impl InFlight {
    pub fn control(&self) -> Control {
        self.control
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.control);
        tracing::debug!("{} request finished", self.control);
    }
}

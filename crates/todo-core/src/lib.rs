pub mod error;
pub use error::ControllerError;

pub mod feedback;
pub use feedback::{Notice, Severity};

pub mod state;
pub use state::{ListState, LoadPhase};

pub mod controller;
pub use controller::{
    ControllerConfig, ListController, LoadOutcome, QueryChange, RemoveOutcome, Startup,
    SubmitOutcome,
};

#[cfg(test)]
mod test_support;

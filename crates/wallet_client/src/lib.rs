//! Client for the StakeUp wallet's background form actions.
//!
//! [`FormActionController`] owns the guarded-action flow; [`HttpTransport`]
//! carries it over HTTP with the signed-in session's cookies.

mod actions;
pub mod controller;
pub mod error;
pub mod page;
pub mod session;
pub mod transport;

pub use controller::{
    FormActionController, GuardedAction, OnSuccess, Resolution, Trigger,
    GENERIC_FAILURE_MESSAGE,
};
pub use error::{ActionError, SessionError, TransportError};
pub use page::{ButtonSnapshot, ButtonState, Control, Page, PageSnapshot, RecordingPage};
pub use session::Credentials;
pub use transport::{Endpoint, FormTransport, HttpTransport, TransportOptions};

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod controller_tests;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

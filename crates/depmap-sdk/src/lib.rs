//! Depmap SDK - client library for the dependency elicitation protocol.
//!
//! Provides the typed HTTP client ([`HttpApi`]) and the interview
//! controller state machine ([`InterviewController`]) that drives the
//! yes/no loop against any transport implementing [`ElicitationApi`].

#![warn(missing_docs)]

pub mod api;
pub mod controller;
pub mod error;

pub use api::{
    ConfirmResponse, DeclineResponse, ElicitationApi, FinalizeResponse, GraphResponse, HttpApi,
    PairsResponse,
};
pub use controller::{AnswerOutcome, ControllerState, InterviewController};
pub use error::SdkError;

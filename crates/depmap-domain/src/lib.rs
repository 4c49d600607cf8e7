//! Depmap Domain Layer
//!
//! This crate contains the core elicitation logic for Depmap: the pairwise
//! dependency interview model. It defines the fundamental concepts, value
//! objects, and trait interfaces that all other layers depend upon.
//!
//! ## Key Concepts
//!
//! - **Variable**: a named quantity the respondent reasons about
//! - **Pair**: an ordered (source, target) candidate dependency
//! - **Cursor**: position in the fixed enumeration of all candidate pairs
//! - **Edge**: a confirmed directed dependency (source influences target)
//! - **Session**: one respondent's interview, a forward-only state machine
//!
//! ## Architecture
//!
//! - Pure interview logic only, no I/O
//! - Infrastructure implementations (rendering, results storage) live in
//!   other crates behind the traits in [`traits`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod graph;
pub mod pair;
pub mod session;
pub mod traits;
pub mod variable;

// Re-exports for convenience
pub use error::ElicitError;
pub use graph::EdgeSet;
pub use pair::{enumerate_pairs, Pair, PairCursor};
pub use session::{Phase, Respondent, Session, SessionId};
pub use traits::{ElicitationRecord, RenderArtifact};

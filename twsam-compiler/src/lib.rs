//! # twsam
//!
//! A compiler from twee passages to SAM scripts.
//!
//! File Layout
//!
//! The compiler is a strictly forward pipeline, and the module tree follows the stages
//! in the order data flows through them:
//! src/twsam
//!   ├── lexing       passage text -> (Token, Range) pairs
//!   ├── expression   macro argument expressions -> compiled SAM fragments
//!   ├── parsing      tokens -> Command trees
//!   ├── indexing     passage titles -> dense script indices
//!   ├── codegen      Command trees -> SAM scripts, registers, assets, manifests
//!   └── pipeline     the three batch passes glued together
//!
//! For test helpers shared by unit and integration tests, see the
//! [testing module](twsam::testing).

pub mod twsam;

pub use twsam::pipeline::{compile, CompiledStory};

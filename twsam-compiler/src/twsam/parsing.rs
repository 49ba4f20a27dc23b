//! Parser
//!
//!     Turns the token sequence of a passage into a tree of [commands](command::Command).
//!
//!     Text, image and link tokens map one to one onto commands; link specs are split
//!     into label, target and on-click here. List tokens become list commands with their
//!     children parsed recursively. Macro tokens are dispatched by name to the
//!     [macro parsers](macros), which call into the
//!     [expression compiler](crate::twsam::expression) for their arguments.
//!
//! Error Policy
//!
//!     Parsing never fails. A macro that cannot be parsed becomes a single
//!     [Invalid](command::Command::Invalid) command carrying the reason, and parsing goes
//!     on with the next token. The code generator reports invalid commands as
//!     diagnostics.

pub mod command;
pub mod macros;
pub mod parser;
pub mod passage;

pub use command::{Command, Link};
pub use parser::{parse_commands, CommandParser};
pub use passage::{Passage, PassageSet};

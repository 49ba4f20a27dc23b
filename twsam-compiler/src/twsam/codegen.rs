//! Code generation
//!
//!     Lowers each passage's command tree to a SAM script. Passages are generated in
//!     index order; a passage's script prints its text, runs its macros and ends either
//!     in a menu of its links or, when it has none, in an endless loop.
//!
//! State
//!
//!     Story variables and asset numbers are global to the run: the
//!     [allocator](variables::VariableAllocator) hands out each variable one register the
//!     first time any passage uses it, and [asset lists](assets::AssetList) number paths
//!     in first-seen order. The print buffer counter, the link list and the display stack
//!     belong to one passage and are dropped with it.
//!
//! Menu
//!
//!     Links print their label where they appear (list item links only join the menu).
//!     After the body, all labels are printed again as the menu, `?A.` reads the player's
//!     choice into `A`, and each link compares `A` against the counter `B` and jumps to
//!     its target. Links reached inside an `<<if>>` body are remembered in a temp register
//!     so both the menu entry and its dispatch are guarded.
//!
//! Errors
//!
//!     A link to a passage that does not exist aborts the run
//!     ([UnresolvedLink](crate::twsam::error::CompileError::UnresolvedLink)). Everything
//!     else, including calls to a missing passage, is a diagnostic.

pub mod assets;
pub mod buffer;
pub mod generator;
pub mod manifest;
pub mod options;
pub mod variables;

pub use assets::AssetList;
pub use buffer::TextBuffer;
pub use generator::{CodeGenerator, Generated, Script};
pub use manifest::{name_to_identifier, OutputNaming};
pub use options::CompileOptions;
pub use variables::{TempRegisterPool, VariableAllocator};

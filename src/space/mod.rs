//! Search-space model.
//!
//! A search space declares the parameters being optimized, either as
//! explicit value lists (**fixed search**) or as typed range / choice
//! descriptors (**flexible search**). The two styles cannot be mixed within
//! one space.
//!
//! # Key Types
//!
//! - [`SearchSpace`]: validated, ordered parameter declarations
//! - [`ParamSpec`]: one dimension (`Fixed`, `Int`, `Float`, `Categorical`)
//! - [`Value`]: a gene value
//! - [`Params`]: named view of a genome passed to objective functions
//!
//! Spaces are built either with [`SearchSpace::builder`] or inferred from a
//! raw JSON map with [`SearchSpace::from_json`].

mod inference;
mod params;
mod types;

pub use inference::infer_search_space_kind;
pub use params::Params;
pub use types::{ParamKey, ParamSpec, SearchSpace, SearchSpaceBuilder, SearchSpaceKind, Value};

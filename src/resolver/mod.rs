//! Resolution of block states to models and of models to concrete
//! geometry/texture definitions.

pub mod model_resolver;
pub mod state_resolver;

pub use model_resolver::{dereference_texture, ModelResolver};
pub use state_resolver::StateResolver;

//! Map tile loading: a shared tile store and the background thread that fills it.

pub mod generator;
pub mod loader;
pub mod store;

pub use generator::*;
pub use loader::*;
pub use store::*;

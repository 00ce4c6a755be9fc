pub mod error;
pub mod guard;
pub mod model;
pub mod rules;
pub mod validate;
pub mod vocab;
pub mod wasm;

// Change pipeline: access checks and field hooks applied to incoming payloads

pub mod context;
pub mod stage;
pub mod pipeline;
pub mod validate;

pub use context::*;
pub use stage::*;
pub use pipeline::*;

pub mod constants;
pub mod deadline;

pub use constants::*;
pub use deadline::with_deadline;

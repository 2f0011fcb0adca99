pub mod record;
pub mod task;

pub use record::*;
pub use task::*;

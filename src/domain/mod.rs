mod directive;
mod names;
mod types;

pub use directive::*;
pub use names::*;
pub use types::*;

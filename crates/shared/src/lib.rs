pub mod constants;
pub mod error;
pub mod report;
pub mod types;

pub use constants::*;
pub use error::*;
pub use report::*;
pub use types::*;

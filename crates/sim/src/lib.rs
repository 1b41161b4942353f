pub mod controller;
pub mod controllers;
pub mod engine;
pub mod reporter;

pub use controller::*;
pub use engine::*;
pub use reporter::*;

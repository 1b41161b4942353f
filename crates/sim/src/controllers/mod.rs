pub mod evader;
pub mod random;

pub use evader::EvaderController;
pub use random::RandomController;

pub mod handlers;
pub mod normalizer;
pub mod validation;

pub use normalizer::normalize;

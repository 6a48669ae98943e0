pub mod args;
pub mod convert;
pub mod errors;
pub mod grafeas;
pub mod normalize;
pub mod trivy;

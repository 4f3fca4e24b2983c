pub mod normalize;
pub mod numbers;

pub use normalize::normalize;
pub use numbers::extract_numbers;

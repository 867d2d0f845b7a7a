pub mod error;
pub mod individual;
pub mod params;
pub mod series;

pub use error::*;
pub use individual::*;
pub use params::*;
pub use series::*;

/// Trait values of founders are mapped into `[-TRAIT_BOUND, TRAIT_BOUND]`
pub const TRAIT_BOUND: f64 = 2.0;

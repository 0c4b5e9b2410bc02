//! Score types for evaluating planning solutions

mod simple;
mod traits;

pub use simple::SimpleScore;
pub use traits::Score;

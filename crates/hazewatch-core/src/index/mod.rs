pub mod convert;
pub mod engine;
pub mod outcome;

pub use convert::convert;
pub use engine::{interpolate, overall_index, sub_index};
pub use outcome::{IndexResult, SubIndexResult};

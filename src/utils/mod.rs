pub mod extractors;
pub mod lenient;

pub mod sales;
pub mod stats;

mod product;
mod report;
mod sale;

pub use product::*;
pub use report::*;
pub use sale::*;

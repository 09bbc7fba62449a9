pub mod product_queries;
pub mod sale_queries;

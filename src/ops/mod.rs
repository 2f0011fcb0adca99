pub mod filter;
pub mod query;
pub mod sort;
pub mod tree;

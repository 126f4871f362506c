pub mod classifier;
pub mod error;
pub mod fields;
pub mod records;

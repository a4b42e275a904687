pub mod aggregation;
pub mod classification;
pub mod common;
pub mod error;
pub mod fetching;
pub mod graphql;
pub mod storage;

pub use error::Error;
pub use error::Result;

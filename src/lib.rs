pub mod batch;
pub mod codec;
pub mod error;
pub mod protocol;
pub mod shamir;
pub mod solver;
pub mod types;

pub use error::{Error, Result};

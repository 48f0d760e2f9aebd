pub mod config;
pub mod convert;
pub mod error;
pub mod models;
pub mod store;

pub use convert::{convert, convert_exact, convert_many, Converted};
pub use error::{ConvertError, FetchError};
pub use models::RateSnapshot;
pub use store::SnapshotStore;

pub mod client;
pub mod flatten;
pub mod intervals;
pub mod store;

pub use crate::domain::model::{OrderTables, StoreRecord, Table};
pub use crate::utils::error::Result;
pub use client::Client;
pub use intervals::DateInterval;
pub use store::Store;

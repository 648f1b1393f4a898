pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::config::{ClientConfig, Environment};
pub use crate::core::{client::Client, store::Store};
pub use crate::domain::model::{OrderTables, StoreId, StoreRecord, Table};
pub use crate::utils::error::{BrightloomError, Result};

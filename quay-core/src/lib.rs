mod column;
mod config;
mod connection;
mod driver;
mod error;
mod filter;
mod join;
mod limit;
mod order;
mod performer;
mod query;
mod select;
mod table;
mod util;
mod value;
mod writer;

pub use ::anyhow::Context as ErrorContext;
pub use ::serde_json::Value as JsonValue;
pub use column::*;
pub use config::*;
pub use connection::*;
pub use driver::*;
pub use error::*;
pub use filter::*;
pub use join::*;
pub use limit::*;
pub use order::*;
pub use performer::*;
pub use query::*;
pub use select::*;
pub use table::*;
pub use util::*;
pub use value::*;
pub use writer::*;
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;

mod as_value;
mod column;
mod condition;
mod decode_type;
mod driver;
mod entity;
mod executor;
mod projection;
mod query;
mod quick_read;
mod record;
mod registry;
mod schema;
mod scope;
mod sql_writer;
mod statement;
mod table_ref;
mod util;
mod value;

pub use ::anyhow::Context;
pub use as_value::*;
pub use column::*;
pub use condition::*;
pub use decode_type::*;
pub use driver::*;
pub use entity::Entity;
pub use executor::*;
pub use projection::*;
pub use query::*;
pub use quick_read::*;
pub use record::*;
pub use registry::*;
pub use schema::*;
pub use scope::*;
pub use sql_writer::*;
pub use statement::*;
pub use table_ref::*;
pub use util::*;
pub use value::*;
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;

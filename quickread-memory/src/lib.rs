mod compare;
mod connection;
mod driver;
mod table;

pub use connection::*;
pub use driver::*;
pub use table::*;

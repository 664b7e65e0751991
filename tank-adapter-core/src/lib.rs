mod connection;
mod error;
mod events;
mod logger;
mod param_type;
mod payload;
mod performance;
mod pipeline;
mod row;
mod sql_writer;
mod util;
mod value;

pub use ::anyhow::Context;
pub use connection::*;
pub use error::*;
pub use events::*;
pub use logger::*;
pub use param_type::*;
pub use payload::*;
pub use performance::*;
pub use pipeline::*;
pub use row::*;
pub use sql_writer::*;
pub use util::*;
pub use value::*;
pub use log::Level;

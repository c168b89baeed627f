mod config;
mod entity;
mod error;
mod generator;
mod pipeline;
mod schema;
mod util;

pub use config::*;
pub use entity::*;
pub use error::*;
pub use generator::*;
pub use pipeline::*;
pub use schema::*;
pub use util::Naming;

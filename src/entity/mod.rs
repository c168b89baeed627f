mod column;
mod relation;
mod resolver;
mod table;

pub use column::*;
pub use relation::*;
pub use resolver::*;
pub use table::*;

mod policy;
mod registry;
mod snapshot;

pub use policy::*;
pub use registry::*;
pub use snapshot::*;

mod base;
mod ir;

mod actions;
mod component;
mod middleware;
mod model;
mod selectors;
mod service;
mod types;

pub use base::{Artifact, Emission, TechGenerator};
pub use ir::*;

pub(crate) use base::Emitter;

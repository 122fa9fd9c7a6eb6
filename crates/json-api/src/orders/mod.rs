//! Orders

mod errors;
mod handlers;
pub(crate) mod notes;
mod schemas;

pub(crate) use handlers::*;

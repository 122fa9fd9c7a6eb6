//! Order Repositories

pub(crate) mod notes;
pub(crate) mod orders;

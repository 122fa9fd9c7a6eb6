//! Order Notes

mod handlers;

pub(crate) use handlers::*;

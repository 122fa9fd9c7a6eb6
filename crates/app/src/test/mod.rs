//! Shared fixtures for database-backed service tests.

mod context;
mod db;

pub(crate) use context::TestContext;

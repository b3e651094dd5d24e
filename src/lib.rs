pub mod allocator;
pub mod api;
pub mod config;
pub mod handlers;
pub mod observability;
pub mod query;
pub mod records;
pub mod store;

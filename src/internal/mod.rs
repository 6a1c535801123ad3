pub mod error;
pub mod events;
pub mod favorites;
pub mod models;
pub mod query;
pub mod results;
pub mod selection;
pub mod session;
pub mod storage;
pub mod summary;
pub mod ui;

#[cfg(test)]
pub(crate) mod testing;

pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod logging;
pub mod model;
pub mod repository;
pub mod routes;

#[cfg(test)]
pub(crate) mod test_support;

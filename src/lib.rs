// Library exports for the binary and for tests

pub mod auth;
pub mod backend;
pub mod config;
pub mod models;
pub mod monitoring;
pub mod state;
pub mod web;

#[cfg(test)]
pub mod test_utils;

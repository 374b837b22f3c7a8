//! Dental clinic backend: family-grouped patient directory and period revenue
//! reports, served over a small REST API.

pub mod backend;
pub mod config;

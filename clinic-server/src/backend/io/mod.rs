//! # IO Module
//!
//! Adapter layer between HTTP clients and the domain services.
//!
//! ## Key Responsibilities
//!
//! - **API Endpoints**: Exposing the patient directory and revenue reports over REST
//! - **Session Handling**: Resolving the caller's bearer token and role from headers
//! - **Data Mapping**: Converting between the `shared` DTOs and domain models
//! - **Error Translation**: Converting domain errors to HTTP status codes

pub mod rest;

pub use rest::*;

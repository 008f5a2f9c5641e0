//! Client for a UAS Service Supplier (USS) that validates flight plans
//! against existing constraints and operational intents.

pub mod client;
pub mod config;
pub mod error;
pub mod schema;

pub use client::{BoxFuture, ConflictService, UssClient};
pub use config::{SubmitEndpoint, UssConfig};
pub use error::UssError;
pub use schema::*;

//! Domains module containing business logic organized by bounded contexts.
//!
//! - **sources**: which upstream APIs are configured and how they authenticate
//! - **credentials**: read-only access to cached credentials
//! - **tools**: the generated API tools and the request pipeline behind them

pub mod credentials;
pub mod sources;
pub mod tools;

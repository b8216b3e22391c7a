//! Shared data models for the connector crates.

pub mod connection;
pub mod operation;

// Re-export commonly used types
pub use connection::{ConnectionConfig, ConnectionItem, CreateConnectionRequest};
pub use operation::{
    AggregateRequest, DeleteRequest, FindOneRequest, FindRequest, InsertManyRequest,
    InsertOneRequest, UpdateRequest,
};

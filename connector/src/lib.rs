//! MongoDB 连接器核心
//!
//! 提供中介引擎连接器的核心功能，包括：
//! - 按逻辑连接名管理池化客户端句柄
//! - 各数据库操作的参数解析与执行
//! - 统一的错误分类与结果编码

pub mod operations;
pub mod registry;
pub mod service;

pub use registry::{ConnectionHandle, ConnectionRegistry, RegistryStats, DEFAULT_CONNECTION_NAME};
pub use service::{ConnectorOperations, MongoConnector};

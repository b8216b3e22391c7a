//! 连接器服务模块

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use common::errors::ConnectorResult;
use common::models::connection::{ConnectionItem, CreateConnectionRequest};
use common::models::operation::{
    AggregateRequest, DeleteRequest, FindOneRequest, FindRequest, InsertManyRequest,
    InsertOneRequest, UpdateRequest,
};

use crate::operations;
use crate::registry::{ConnectionRegistry, RegistryStats};

/// 连接器操作 Trait
#[async_trait]
pub trait ConnectorOperations: Send + Sync {
    /// 查询单个文档
    async fn find_one(&self, request: FindOneRequest) -> ConnectorResult<Value>;

    /// 查询所有匹配的文档
    async fn find(&self, request: FindRequest) -> ConnectorResult<Value>;

    /// 插入单个文档
    async fn insert_one(&self, request: InsertOneRequest) -> ConnectorResult<Value>;

    /// 批量插入文档
    async fn insert_many(&self, request: InsertManyRequest) -> ConnectorResult<Value>;

    /// 更新第一个匹配的文档
    async fn update_one(&self, request: UpdateRequest) -> ConnectorResult<Value>;

    /// 更新所有匹配的文档
    async fn update_many(&self, request: UpdateRequest) -> ConnectorResult<Value>;

    /// 删除第一个匹配的文档
    async fn delete_one(&self, request: DeleteRequest) -> ConnectorResult<Value>;

    /// 删除所有匹配的文档
    async fn delete_many(&self, request: DeleteRequest) -> ConnectorResult<Value>;

    /// 执行聚合管道
    async fn aggregate(&self, request: AggregateRequest) -> ConnectorResult<Value>;
}

/// MongoDB 连接器服务
pub struct MongoConnector {
    registry: Arc<ConnectionRegistry>,
}

impl MongoConnector {
    /// 创建新的连接器实例
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// 注册新的数据库连接
    pub async fn register_connection(
        &self,
        request: CreateConnectionRequest,
    ) -> ConnectorResult<ConnectionItem> {
        let item = self.registry.register(request).await?;
        tracing::info!(name = %item.name, "连接已注册");
        Ok(item)
    }

    /// 移除数据库连接
    pub async fn remove_connection(&self, name: &str) -> ConnectorResult<()> {
        self.registry.remove(name).await?;
        tracing::info!(name = %name, "连接已移除");
        Ok(())
    }

    /// 列出所有已注册的连接
    pub async fn list_connections(&self) -> Vec<ConnectionItem> {
        self.registry.list().await
    }

    /// 测试连接，返回毫秒延迟
    pub async fn test_connection(&self, name: Option<&str>) -> ConnectorResult<u64> {
        let latency = self.registry.test(name).await?;
        Ok(latency.as_millis() as u64)
    }

    /// 注册表统计信息
    pub async fn stats(&self) -> RegistryStats {
        self.registry.stats().await
    }
}

#[async_trait]
impl ConnectorOperations for MongoConnector {
    async fn find_one(&self, request: FindOneRequest) -> ConnectorResult<Value> {
        operations::find::find_one(&self.registry, request).await
    }

    async fn find(&self, request: FindRequest) -> ConnectorResult<Value> {
        operations::find::find(&self.registry, request).await
    }

    async fn insert_one(&self, request: InsertOneRequest) -> ConnectorResult<Value> {
        operations::insert::insert_one(&self.registry, request).await
    }

    async fn insert_many(&self, request: InsertManyRequest) -> ConnectorResult<Value> {
        operations::insert::insert_many(&self.registry, request).await
    }

    async fn update_one(&self, request: UpdateRequest) -> ConnectorResult<Value> {
        operations::update::update_one(&self.registry, request).await
    }

    async fn update_many(&self, request: UpdateRequest) -> ConnectorResult<Value> {
        operations::update::update_many(&self.registry, request).await
    }

    async fn delete_one(&self, request: DeleteRequest) -> ConnectorResult<Value> {
        operations::delete::delete_one(&self.registry, request).await
    }

    async fn delete_many(&self, request: DeleteRequest) -> ConnectorResult<Value> {
        operations::delete::delete_many(&self.registry, request).await
    }

    async fn aggregate(&self, request: AggregateRequest) -> ConnectorResult<Value> {
        operations::aggregate::aggregate(&self.registry, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::errors::ConnectorError;
    use common::ConnectorConfig;
    use serde_json::json;
    use uuid::Uuid;

    const CONNECTION_NAME: &str = "live";

    /// Connector wired against the database named by `MONGODB_URI`
    /// (defaults to a local server). Used by the ignored live scenarios.
    async fn live_connector() -> MongoConnector {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("connector=debug")
            .try_init();

        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://127.0.0.1:27017/connector_test".to_string());

        let registry = Arc::new(ConnectionRegistry::new(ConnectorConfig::default()));
        registry
            .register(CreateConnectionRequest {
                name: CONNECTION_NAME.to_string(),
                connection_string: Some(uri),
                host: None,
                port: None,
                username: None,
                password: None,
                database: None,
                max_pool_size: None,
                min_pool_size: None,
                connect_timeout_secs: None,
                server_selection_timeout_secs: None,
                tls: None,
            })
            .await
            .unwrap();
        MongoConnector::new(registry)
    }

    fn scratch_collection() -> String {
        format!("scratch_{}", Uuid::new_v4().simple())
    }

    #[tokio::test]
    #[ignore = "requires a running MongoDB (set MONGODB_URI)"]
    async fn insert_then_find_round_trips() {
        let connector = live_connector().await;
        let collection = scratch_collection();

        let ack = connector
            .insert_one(InsertOneRequest {
                collection: collection.clone(),
                document: Some(r#"{"a": 1}"#.to_string()),
                connection_name: Some(CONNECTION_NAME.to_string()),
            })
            .await
            .unwrap();
        assert_eq!(ack, json!({ "InsertOneResult": "Successful" }));

        let found = connector
            .find_one(FindOneRequest {
                collection: collection.clone(),
                query: Some(r#"{"a": 1}"#.to_string()),
                connection_name: Some(CONNECTION_NAME.to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.get("a"), Some(&json!(1)));

        connector
            .delete_many(DeleteRequest {
                collection,
                query: Some("{}".to_string()),
                connection_name: Some(CONNECTION_NAME.to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    #[ignore = "requires a running MongoDB (set MONGODB_URI)"]
    async fn omitted_query_matches_all() {
        let connector = live_connector().await;
        let collection = scratch_collection();

        connector
            .insert_one(InsertOneRequest {
                collection: collection.clone(),
                document: Some(r#"{"only": true}"#.to_string()),
                connection_name: Some(CONNECTION_NAME.to_string()),
            })
            .await
            .unwrap();

        let without_query = connector
            .find_one(FindOneRequest {
                collection: collection.clone(),
                connection_name: Some(CONNECTION_NAME.to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        let with_empty_query = connector
            .find_one(FindOneRequest {
                collection: collection.clone(),
                query: Some("{}".to_string()),
                connection_name: Some(CONNECTION_NAME.to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(without_query, with_empty_query);
        assert_eq!(without_query.get("only"), Some(&json!(true)));

        connector
            .delete_many(DeleteRequest {
                collection,
                query: Some("{}".to_string()),
                connection_name: Some(CONNECTION_NAME.to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    #[ignore = "requires a running MongoDB (set MONGODB_URI)"]
    async fn rejected_array_document_writes_nothing() {
        let connector = live_connector().await;
        let collection = scratch_collection();

        let error = connector
            .insert_one(InsertOneRequest {
                collection: collection.clone(),
                document: Some("[1, 2]".to_string()),
                connection_name: Some(CONNECTION_NAME.to_string()),
            })
            .await
            .unwrap_err();
        assert!(matches!(error, ConnectorError::Validation(_)));

        let everything = connector
            .find(FindRequest {
                collection,
                connection_name: Some(CONNECTION_NAME.to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(everything, json!([]));
    }

    #[tokio::test]
    #[ignore = "requires a running MongoDB (set MONGODB_URI)"]
    async fn no_match_is_null_not_an_error() {
        let connector = live_connector().await;

        let result = connector
            .find_one(FindOneRequest {
                collection: scratch_collection(),
                query: Some(r#"{"missing": "surely"}"#.to_string()),
                connection_name: Some(CONNECTION_NAME.to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(result, Value::Null);
    }

    #[tokio::test]
    #[ignore = "requires a running MongoDB (set MONGODB_URI)"]
    async fn update_delete_aggregate_round_trip() {
        let connector = live_connector().await;
        let collection = scratch_collection();

        connector
            .insert_many(InsertManyRequest {
                collection: collection.clone(),
                documents: Some(r#"[{"n": 1}, {"n": 2}, {"n": 2}]"#.to_string()),
                ordered: None,
                connection_name: Some(CONNECTION_NAME.to_string()),
            })
            .await
            .unwrap();

        let ack = connector
            .update_many(UpdateRequest {
                collection: collection.clone(),
                query: Some(r#"{"n": 2}"#.to_string()),
                update: Some(r#"{"$set": {"seen": true}}"#.to_string()),
                connection_name: Some(CONNECTION_NAME.to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(ack, json!({ "UpdateManyResult": "Successful" }));

        let grouped = connector
            .aggregate(AggregateRequest {
                collection: collection.clone(),
                pipeline: Some(
                    r#"[{"$match": {"seen": true}}, {"$count": "total"}]"#.to_string(),
                ),
                connection_name: Some(CONNECTION_NAME.to_string()),
            })
            .await
            .unwrap();
        assert_eq!(grouped, json!([{ "total": 2 }]));

        let ack = connector
            .delete_many(DeleteRequest {
                collection,
                query: Some("{}".to_string()),
                connection_name: Some(CONNECTION_NAME.to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(ack, json!({ "DeleteManyResult": "Successful" }));
    }
}

use std::sync::{Arc, LazyLock};

use dashmap::DashMap;

use crate::error::DbError;
use crate::executor::session::Session;
use crate::models::db_config::ConnectionOptions;
use crate::provider::TransactionProvider;
use crate::rdbc::pool::Pool;

// 全局单例（Rust 1.80+ 推荐）
pub static UTX: LazyLock<ProviderManager> = LazyLock::new(ProviderManager::new);

/// 获取全局 ProviderManager 实例
pub fn provider_mgr() -> &'static ProviderManager {
    &UTX
}

/// 事务管理器注册表
/// Keeps named TransactionProvider instances, one pool each
pub struct ProviderManager {
    providers: DashMap<String, Arc<TransactionProvider>>,
}

impl ProviderManager {
    pub fn new() -> Self {
        Self {
            providers: DashMap::new(),
        }
    }

    /// 注册并启动一个事务管理器
    pub async fn register(&self, name: &str, options: ConnectionOptions) -> Result<(), DbError> {
        let provider = Arc::new(TransactionProvider::new(name, options));
        provider.start().await?;
        self.providers.insert(name.to_string(), provider);
        Ok(())
    }

    /// 以自带连接池注册（自定义 Pool 实现）
    pub fn register_pool(&self, name: &str, pool: Arc<dyn Pool>) {
        let provider = Arc::new(TransactionProvider::from_pool(name, pool));
        self.providers.insert(name.to_string(), provider);
    }

    pub fn provider(&self, name: &str) -> Option<Arc<TransactionProvider>> {
        self.providers.get(name).map(|v| v.value().clone())
    }

    /// 获取用于执行事务与原生 SQL 的客户端
    pub fn session(&self, name: &str) -> Option<Session> {
        self.provider(name).map(Session::new)
    }

    /// 停机：drain 所有连接池并清空注册表
    pub async fn end_all(&self) {
        let providers: Vec<Arc<TransactionProvider>> =
            self.providers.iter().map(|e| e.value().clone()).collect();
        self.providers.clear();
        for provider in providers {
            if let Err(e) = provider.end().await {
                tracing::warn!(provider = provider.name(), error = %e, "error draining pool");
            }
        }
    }
}

impl Default for ProviderManager {
    fn default() -> Self {
        Self::new()
    }
}

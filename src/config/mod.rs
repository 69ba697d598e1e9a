//! 配置模块
//!
//! 从 TOML 文件加载日志、存储客户端与规划器配置，缺省字段使用默认值。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{DBError, DBResult};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub log: LogConfig,
    pub storage_client: StorageClientConfig,
    pub planner: PlannerConfig,
}

/// 日志配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub dir: String,
    pub file: String,
    pub max_file_size: u64,
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: "logs".to_string(),
            file: "graphdb-planner".to_string(),
            max_file_size: 100 * 1024 * 1024, // 100MB
            max_files: 5,
        }
    }
}

/// 存储客户端配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct StorageClientConfig {
    /// 单次 RPC 超时（毫秒）
    pub timeout_ms: u64,
    pub enable_ssl: bool,
    pub io_threads: usize,
}

impl Default for StorageClientConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 60_000,
            enable_ssl: false,
            io_threads: 4,
        }
    }
}

/// 规划器配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct PlannerConfig {
    /// 允许 MATCH 在仅有标签时使用标签索引全扫描
    pub enable_label_index_seek: bool,
    /// 允许 MATCH 在没有可用索引时退化为全表扫描
    pub enable_scan_seek: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            enable_label_index_seek: true,
            enable_scan_seek: true,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> DBResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> DBResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| DBError::Serialization(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> DBResult<()> {
        if self.storage_client.timeout_ms == 0 {
            return Err(DBError::Config("storage_client.timeout_ms 必须大于 0".into()));
        }
        if self.storage_client.io_threads == 0 {
            return Err(DBError::Config("storage_client.io_threads 必须大于 0".into()));
        }
        Ok(())
    }
}

//! 引擎配置

use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{ProcureError, Result};

/// 預設最大展開深度
pub const DEFAULT_MAX_DEPTH: usize = 12;

/// 預設單次操作時間預算（秒）
pub const DEFAULT_OPERATION_TIMEOUT_SECS: u64 = 60;

/// 預設一次性狀態碼有效期（秒）
pub const DEFAULT_STATE_TTL_SECS: u64 = 300;

/// 環境變數前綴（`PROCURE_MAX_DEPTH` 等）
pub const ENV_PREFIX: &str = "PROCURE_";

/// BOM 解析與批次下單的引擎參數
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 最大展開深度（根節點為第 1 層）
    pub max_depth: usize,

    /// 單次操作時間預算（`None` 表示不限）
    pub operation_timeout: Option<Duration>,

    /// 一次性狀態碼有效期
    pub state_ttl: Duration,
}

impl EngineConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            operation_timeout: Some(Duration::from_secs(DEFAULT_OPERATION_TIMEOUT_SECS)),
            state_ttl: Duration::from_secs(DEFAULT_STATE_TTL_SECS),
        }
    }

    /// 由環境變數讀取配置，未設定的項目使用預設值
    pub fn from_env() -> Result<Self> {
        Self::from_figment(Self::figment())
    }

    /// 預設值疊加 `PROCURE_` 環境變數
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(EngineSettings::from(&Self::new())))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// 由任意 figment 來源讀取配置並檢查
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let settings: EngineSettings = figment.extract()?;
        let config = Self::from(settings);
        config.validate()?;
        Ok(config)
    }

    /// 建構器模式：設置最大深度
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// 建構器模式：設置操作時間預算
    pub fn with_operation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.operation_timeout = timeout;
        self
    }

    /// 建構器模式：設置狀態碼有效期
    pub fn with_state_ttl(mut self, ttl: Duration) -> Self {
        self.state_ttl = ttl;
        self
    }

    /// 檢查配置是否有效
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(ProcureError::InvalidConfig(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if self.operation_timeout == Some(Duration::ZERO) {
            return Err(ProcureError::InvalidConfig(
                "operation_timeout must be positive".to_string(),
            ));
        }
        if self.state_ttl.is_zero() {
            return Err(ProcureError::InvalidConfig(
                "state_ttl must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// 外部配置的鍵值形狀（時間以秒表示）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct EngineSettings {
    max_depth: usize,

    /// 0 表示不限時
    operation_timeout_secs: u64,

    state_ttl_secs: u64,
}

impl From<&EngineConfig> for EngineSettings {
    fn from(config: &EngineConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            operation_timeout_secs: config.operation_timeout.map_or(0, |t| t.as_secs()),
            state_ttl_secs: config.state_ttl.as_secs(),
        }
    }
}

impl From<EngineSettings> for EngineConfig {
    fn from(settings: EngineSettings) -> Self {
        Self {
            max_depth: settings.max_depth,
            operation_timeout: match settings.operation_timeout_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            state_ttl: Duration::from_secs(settings.state_ttl_secs),
        }
    }
}

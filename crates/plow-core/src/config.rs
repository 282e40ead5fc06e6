//! 帳本配置

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::shipment::PlowModel;
use crate::{PlowError, Result};

/// 帳本與操作層參數配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// 使用 SCHWENKBOCK_3000 擺動座的型號，其餘型號使用 SCHWENKBOCK_2000
    pub schwenkbock_3000_models: Vec<PlowModel>,

    /// 操作紀錄保留天數
    pub activity_retention_days: i64,

    /// 零件查詢緩存有效期（毫秒）
    pub cache_ttl_ms: u64,

    /// 預設分頁大小
    pub default_page_size: usize,

    /// 分頁大小上限
    pub max_page_size: usize,

    /// 新零件的預設單位
    pub default_part_unit: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            schwenkbock_3000_models: vec![
                PlowModel::Fl640,
                PlowModel::Fl540,
                PlowModel::Fl470,
                PlowModel::Fl400,
            ],
            activity_retention_days: 180,
            cache_ttl_ms: 60_000,
            default_page_size: 50,
            max_page_size: 200,
            default_part_unit: "pcs".to_string(),
        }
    }
}

impl LedgerConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 從 JSON 載入，缺少的欄位使用預設值
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| PlowError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 建構器模式：設置 SCHWENKBOCK_3000 型號
    pub fn with_schwenkbock_3000_models(mut self, models: Vec<PlowModel>) -> Self {
        self.schwenkbock_3000_models = models;
        self
    }

    /// 建構器模式：設置操作紀錄保留天數
    pub fn with_activity_retention_days(mut self, days: i64) -> Self {
        self.activity_retention_days = days;
        self
    }

    /// 建構器模式：設置緩存有效期
    pub fn with_cache_ttl_ms(mut self, ttl_ms: u64) -> Self {
        self.cache_ttl_ms = ttl_ms;
        self
    }

    /// 建構器模式：設置分頁大小
    pub fn with_page_sizes(mut self, default_page_size: usize, max_page_size: usize) -> Self {
        self.default_page_size = default_page_size;
        self.max_page_size = max_page_size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.activity_retention_days <= 0 {
            return Err(PlowError::Config(
                "activity_retention_days 必須大於 0".to_string(),
            ));
        }
        if self.max_page_size == 0 || self.default_page_size == 0 {
            return Err(PlowError::Config("分頁大小必須大於 0".to_string()));
        }
        if self.default_page_size > self.max_page_size {
            return Err(PlowError::Config(
                "default_page_size 不可大於 max_page_size".to_string(),
            ));
        }
        Ok(())
    }

    /// 該型號的擺動座是否使用 SCHWENKBOCK_3000
    pub fn uses_schwenkbock_3000(&self, model: PlowModel) -> bool {
        self.schwenkbock_3000_models.contains(&model)
    }

    /// 將請求的分頁大小限制在 1..=max_page_size
    pub fn clamp_page_size(&self, per: Option<usize>) -> usize {
        per.unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size)
    }

    /// 早於此時間的操作紀錄可清除
    pub fn retention_cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(self.activity_retention_days)
    }

    pub fn cache_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.cache_ttl_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_config() {
        let config = LedgerConfig::new();
        assert!(config.uses_schwenkbock_3000(PlowModel::Fl640));
        assert!(config.uses_schwenkbock_3000(PlowModel::Fl400));
        assert!(!config.uses_schwenkbock_3000(PlowModel::Fl340));
        assert!(!config.uses_schwenkbock_3000(PlowModel::Fl260));
        assert_eq!(config.activity_retention_days, 180);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_clamp_page_size() {
        let config = LedgerConfig::new();
        assert_eq!(config.clamp_page_size(None), 50);
        assert_eq!(config.clamp_page_size(Some(0)), 1);
        assert_eq!(config.clamp_page_size(Some(500)), 200);
        assert_eq!(config.clamp_page_size(Some(20)), 20);
    }

    #[test]
    fn test_retention_cutoff() {
        let config = LedgerConfig::new().with_activity_retention_days(10);
        let now = Utc.with_ymd_and_hms(2025, 3, 11, 12, 0, 0).unwrap();
        assert_eq!(
            config.retention_cutoff(now),
            Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_from_json_partial() {
        let config = LedgerConfig::from_json_str(
            r#"{ "schwenkbock_3000_models": ["FL_640"], "cache_ttl_ms": 5000 }"#,
        )
        .unwrap();
        assert_eq!(config.schwenkbock_3000_models, vec![PlowModel::Fl640]);
        assert_eq!(config.cache_ttl_ms, 5000);
        assert_eq!(config.default_page_size, 50);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(
            LedgerConfig::from_json_str(r#"{ "activity_retention_days": 0 }"#),
            Err(PlowError::Config(_))
        ));
        assert!(matches!(
            LedgerConfig::from_json_str("not json"),
            Err(PlowError::Config(_))
        ));
    }
}

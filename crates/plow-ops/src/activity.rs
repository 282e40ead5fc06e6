//! 操作紀錄查詢與清理

use chrono::{DateTime, Utc};
use plow_core::{ActivityId, ActivityLog, Database, Result};
use serde::Serialize;

use crate::PlowService;

/// 單次查詢的筆數上限
pub const MAX_ACTIVITY_TAKE: usize = 100;
pub const DEFAULT_ACTIVITY_TAKE: usize = 50;

/// 游標分頁結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityPage {
    pub items: Vec<ActivityLog>,
    /// 下一頁第一筆的 ID；沒有下一頁時為 `None`
    pub next_cursor: Option<ActivityId>,
}

impl<D: Database> PlowService<D> {
    /// 操作紀錄（新到舊）
    ///
    /// `cursor` 為上一頁回傳的 `next_cursor`，該筆會包含在本頁。
    pub fn list_activity(
        &self,
        query: Option<&str>,
        cursor: Option<ActivityId>,
        take: Option<usize>,
    ) -> Result<ActivityPage> {
        let take = take
            .unwrap_or(DEFAULT_ACTIVITY_TAKE)
            .clamp(1, MAX_ACTIVITY_TAKE);
        let query = query.map(str::trim).filter(|q| !q.is_empty());

        let logs = self.db.transaction(|tx| tx.list_activity())?;
        let mut items: Vec<ActivityLog> = logs
            .into_iter()
            .filter(|log| query.map_or(true, |q| log.matches_query(q)))
            .skip_while(|log| cursor.is_some_and(|c| log.id != c))
            .take(take + 1)
            .collect();

        let next_cursor = if items.len() > take {
            items.pop().map(|log| log.id)
        } else {
            None
        };

        Ok(ActivityPage { items, next_cursor })
    }

    /// 清除超過保留天數的操作紀錄，回傳刪除筆數
    pub fn cleanup_activity(&self, now: DateTime<Utc>) -> Result<usize> {
        let cutoff = self.config.retention_cutoff(now);
        let deleted = self
            .db
            .transaction(|tx| tx.delete_activity_before(cutoff))?;

        tracing::info!("清除 {} 之前的操作紀錄 {} 筆", cutoff, deleted);
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::service;
    use chrono::Duration;
    use plow_core::NewPart;
    use rstest::rstest;

    fn with_adjustments(count: usize) -> PlowService<plow_store::MemoryDatabase> {
        let mut service = service();
        let part = service.create_part(NewPart::new("Kufe", 0)).unwrap();
        for _ in 0..count {
            service.adjust_part_stock(part.id, 1, None).unwrap();
        }
        service
    }

    #[test]
    fn test_cursor_walks_all_pages() {
        let service = with_adjustments(5);

        let first = service.list_activity(None, None, Some(2)).unwrap();
        assert_eq!(first.items.len(), 2);
        let second = service
            .list_activity(None, first.next_cursor, Some(2))
            .unwrap();
        let third = service
            .list_activity(None, second.next_cursor, Some(2))
            .unwrap();
        assert_eq!(third.items.len(), 1);
        assert_eq!(third.next_cursor, None);

        let ids: Vec<ActivityId> = [first, second, third]
            .into_iter()
            .flat_map(|page| page.items)
            .map(|log| log.id)
            .collect();
        assert_eq!(ids, vec![5, 4, 3, 2, 1]);
    }

    #[rstest]
    #[case(Some(0), 1)]
    #[case(Some(500), 7)]
    #[case(None, 7)]
    fn test_take_clamped(#[case] take: Option<usize>, #[case] expected: usize) {
        let service = with_adjustments(7);
        let page = service.list_activity(None, None, take).unwrap();
        assert_eq!(page.items.len(), expected);
    }

    #[test]
    fn test_query_filters() {
        let service = with_adjustments(2);
        assert_eq!(
            service.list_activity(Some("PART"), None, None).unwrap().items.len(),
            2
        );
        assert!(service
            .list_activity(Some("shipment"), None, None)
            .unwrap()
            .items
            .is_empty());
    }

    #[test]
    fn test_cleanup_uses_retention() {
        let service = with_adjustments(3);

        assert_eq!(service.cleanup_activity(Utc::now()).unwrap(), 0);
        let later = Utc::now() + Duration::days(181);
        assert_eq!(service.cleanup_activity(later).unwrap(), 3);
        assert!(service.list_activity(None, None, None).unwrap().items.is_empty());
    }
}

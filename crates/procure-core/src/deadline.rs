//! 操作時間預算

use std::time::{Duration, Instant};

use crate::{ProcureError, Result};

/// 單次操作的截止時間
///
/// 每次呼叫協作者之前檢查；逾時即以基礎設施錯誤中止整個操作。
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    budget: Option<Duration>,
}

impl Deadline {
    /// 從現在開始計時
    pub fn after(budget: Option<Duration>) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    /// 不限時
    pub fn unbounded() -> Self {
        Self::after(None)
    }

    /// 已耗時
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// 剩餘時間（不限時為 `None`）
    pub fn remaining(&self) -> Option<Duration> {
        self.budget
            .map(|budget| budget.saturating_sub(self.started.elapsed()))
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_some_and(|left| left.is_zero())
    }

    /// 檢查是否逾時
    pub fn check(&self) -> Result<()> {
        match self.budget {
            Some(budget) if self.is_expired() => Err(ProcureError::Timeout {
                elapsed: self.elapsed(),
                budget,
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_never_expires() {
        let deadline = Deadline::unbounded();
        assert!(deadline.check().is_ok());
        assert_eq!(deadline.remaining(), None);
    }

    #[test]
    fn test_zero_budget_expires_immediately() {
        let deadline = Deadline::after(Some(Duration::ZERO));
        assert!(deadline.is_expired());
        assert!(matches!(
            deadline.check(),
            Err(ProcureError::Timeout { .. })
        ));
    }

    #[test]
    fn test_generous_budget() {
        let deadline = Deadline::after(Some(Duration::from_secs(3600)));
        assert!(deadline.check().is_ok());
        assert!(deadline.remaining().unwrap() > Duration::from_secs(3500));
    }
}

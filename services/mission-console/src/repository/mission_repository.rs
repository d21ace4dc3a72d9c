use async_trait::async_trait;

use crate::domain::MoonMission;
use crate::repository::RepositoryResult;

/// 月探査ミッションリポジトリインターフェース（読み取り専用）
#[async_trait]
pub trait MoonMissionRepository: Send + Sync {
    /// 全ミッションを取得
    async fn find_all(&self) -> RepositoryResult<Vec<MoonMission>>;

    /// ID でミッションを取得
    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<MoonMission>>;

    /// 指定した年に打ち上げられたミッション数
    async fn count_by_year(&self, year: i32) -> RepositoryResult<i64>;

    /// 宇宙船名のみを取得
    async fn list_spacecraft(&self) -> RepositoryResult<Vec<String>>;
}

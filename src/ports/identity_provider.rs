use crate::domain::UserId;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 認証基盤ポート
///
/// 貸出台帳と利用者管理の境界を維持する。
/// 台帳は認証済みの不透明な`UserId`のみを受け取り、認証自体は行わない。
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// 利用者が存在するか確認する
    ///
    /// 貸出前の利用者バリデーションに使用される。
    async fn exists(&self, user_id: UserId) -> Result<bool>;
}

//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;

use super::Stage;

/// Stage への排他的なアクセス権
///
/// ガードを保持している間、他の状態遷移は実行されない。
pub type StageGuard = OwnedMutexGuard<Stage>;

/// Stage Repository trait
///
/// 全ての状態遷移は `acquire` で得たガードの上で行う。
/// ガードを保持したままイベントを送信キューに積むことで、
/// 全クライアントが状態遷移と同じ順序でイベントを受け取る。
#[async_trait]
pub trait StageRepository: Send + Sync {
    /// Stage の排他ロックを取得
    async fn acquire(&self) -> StageGuard;

    /// Stage のスナップショットを取得（読み取り専用）
    async fn snapshot(&self) -> Stage;
}

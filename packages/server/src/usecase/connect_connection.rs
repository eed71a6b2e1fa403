//! UseCase: 接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectConnectionUseCase::execute() メソッド
//! - 接続の登録と、現在の履歴のリプレイ要求
//!
//! ### なぜこのテストが必要か
//! - 新規接続が以降のブロードキャストを受け取れることを保証
//! - 参加時点の履歴が最初に届くことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：履歴がある状態での接続
//! - 異常系：エンジン停止中の接続（何も登録されない）

use crate::domain::{ConnectionId, PusherChannel};

use super::{broadcast::BroadcastHandle, error::EngineError};

/// 接続のユースケース
pub struct ConnectConnectionUseCase {
    broadcast: BroadcastHandle,
}

impl ConnectConnectionUseCase {
    pub fn new(broadcast: BroadcastHandle) -> Self {
        Self { broadcast }
    }

    /// 接続を登録し、現在の履歴をリプレイする
    ///
    /// 登録とリプレイは順序付けポイント経由でまとめて処理されるため、
    /// 接続はそれ以降の各ラウンドのスナップショットをちょうど 1 回ずつ受け取る。
    ///
    /// # Arguments
    ///
    /// * `sender` - この接続への送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(ConnectionId)` - 登録された接続 ID
    /// * `Err(EngineError)` - エンジンが停止している（何も登録されない）
    pub async fn execute(&self, sender: PusherChannel) -> Result<ConnectionId, EngineError> {
        let connection_id = ConnectionId::generate();
        self.broadcast.join(connection_id, sender).await?;
        Ok(connection_id)
    }
}

//! UseCase: 履歴の閲覧
//!
//! チャットページの入口です。トークンを検証し、その username のセッションが
//! 有効な場合にだけ現在の履歴を返します。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ViewHistoryUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - セッションのないユーザーや不正なトークンに履歴が見えないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：セッションのあるユーザー
//! - 異常系：不正なトークン、セッションなし

use std::sync::Arc;

use crate::domain::{ChatMessage, SessionAuthority, TokenVerifier, Username};

use super::{broadcast::BroadcastHandle, error::HistoryAccessError};

/// 履歴閲覧のユースケース
pub struct ViewHistoryUseCase {
    token_verifier: Arc<dyn TokenVerifier>,
    session_authority: Arc<dyn SessionAuthority>,
    broadcast: BroadcastHandle,
}

impl ViewHistoryUseCase {
    pub fn new(
        token_verifier: Arc<dyn TokenVerifier>,
        session_authority: Arc<dyn SessionAuthority>,
        broadcast: BroadcastHandle,
    ) -> Self {
        Self {
            token_verifier,
            session_authority,
            broadcast,
        }
    }

    /// トークンの持ち主と現在の履歴を返す
    pub async fn execute(
        &self,
        token: &str,
    ) -> Result<(Username, Vec<ChatMessage>), HistoryAccessError> {
        let username = self.token_verifier.verify(token).await?;

        if !self.session_authority.is_authenticated(&username).await {
            return Err(HistoryAccessError::NoSession(username.into_string()));
        }

        let history = self.broadcast.history().await?;
        Ok((username, history))
    }
}

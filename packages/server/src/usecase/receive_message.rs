//! UseCase: 受信メッセージ処理
//!
//! 1 つの受信フレーム（デコード済み）に対して、認可・分類・振り分けを行います。
//! トークンは接続ごとにキャッシュせず、フレームごとに毎回検証します。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ReceiveMessageUseCase::execute() メソッド
//! - トークン検証、コマンド分類、エンジン／Bot ゲートウェイへの振り分け
//!
//! ### なぜこのテストが必要か
//! - 不正なトークンのメッセージが履歴に入らないことを保証
//! - 配信される username が常にトークン由来であることを保証
//! - コマンドがチャットとして配信されないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：チャット、/stock= コマンド、未知のコマンド
//! - 異常系：不正なトークン

use std::sync::Arc;

use crate::domain::{
    ChatMessage, Classified, HELP_MESSAGE, InboundMessage, StockCode, TokenVerifier, classify,
};

use super::{
    broadcast::BroadcastHandle, command_dispatch::CommandDispatcher, error::ReceiveError,
    timestamp::TimestampIssuer,
};

/// What happened to an accepted inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Chat message handed to the broadcast engine
    Broadcast,
    /// Stock code handed to the bot gateway (detached)
    CommandDispatched(StockCode),
    /// Unknown command answered with the help message
    HelpSent,
}

/// 受信メッセージ処理のユースケース
pub struct ReceiveMessageUseCase {
    token_verifier: Arc<dyn TokenVerifier>,
    command_dispatcher: CommandDispatcher,
    broadcast: BroadcastHandle,
    timestamps: TimestampIssuer,
}

impl ReceiveMessageUseCase {
    pub fn new(
        token_verifier: Arc<dyn TokenVerifier>,
        command_dispatcher: CommandDispatcher,
        broadcast: BroadcastHandle,
        timestamps: TimestampIssuer,
    ) -> Self {
        Self {
            token_verifier,
            command_dispatcher,
            broadcast,
            timestamps,
        }
    }

    /// 受信メッセージを認可・分類し、振り分ける
    ///
    /// # Returns
    ///
    /// * `Ok(Disposition)` - 受理された
    /// * `Err(ReceiveError)` - 接続を終了すべきエラー（認可失敗、エンジン停止）
    pub async fn execute(&self, inbound: InboundMessage) -> Result<Disposition, ReceiveError> {
        // 1. 認可（フレームごとに毎回検証）
        let username = self.token_verifier.verify(&inbound.token).await?;

        // 2. 分類と振り分け
        match classify(&inbound.content) {
            Classified::StockQuote(code) => {
                tracing::debug!("'{}' requested stock quote '{}'", username, code);
                self.command_dispatcher.dispatch_detached(code.clone());
                Ok(Disposition::CommandDispatched(code))
            }
            Classified::UnknownCommand => {
                tracing::debug!("'{}' sent an unknown command", username);
                let help = ChatMessage::from_bot(HELP_MESSAGE.to_string(), self.timestamps.issue());
                self.broadcast.submit(help).await?;
                Ok(Disposition::HelpSent)
            }
            Classified::Chat => {
                let message = ChatMessage::new(username, inbound.content, self.timestamps.issue());
                self.broadcast.submit(message).await?;
                Ok(Disposition::Broadcast)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;
    use crate::{
        domain::{
            BOT_USERNAME, BotGatewayError, MessageHistory, TokenError, Username,
            auth::MockTokenVerifier, bot::MockBotGateway,
        },
        infrastructure::message_pusher::WebSocketMessagePusher,
        usecase::broadcast::BroadcastEngine,
    };
    use hiroba_shared::time::{FixedClock, offset_from_hours};

    const VALID_TOKEN: &str = "valid-token";

    fn token_verifier() -> MockTokenVerifier {
        let mut verifier = MockTokenVerifier::new();
        verifier.expect_verify().returning(|token| {
            if token == VALID_TOKEN {
                Ok(Username::new("alice".to_string()).unwrap())
            } else {
                Err(TokenError::Invalid("bad signature".to_string()))
            }
        });
        verifier
    }

    fn create_usecase(gateway: MockBotGateway) -> (ReceiveMessageUseCase, BroadcastHandle) {
        let (engine, handle) = BroadcastEngine::new(
            MessageHistory::default(),
            Arc::new(WebSocketMessagePusher::new()),
            NonZeroUsize::new(8).unwrap(),
        );
        engine.spawn();
        let usecase = ReceiveMessageUseCase::new(
            Arc::new(token_verifier()),
            CommandDispatcher::new(Arc::new(gateway)),
            handle.clone(),
            TimestampIssuer::new(
                Arc::new(FixedClock::new(1672498800000)),
                offset_from_hours(0).unwrap(),
            ),
        );
        (usecase, handle)
    }

    fn inbound(token: &str, content: &str) -> InboundMessage {
        InboundMessage {
            token: token.to_string(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_chat_uses_verified_identity_and_server_time() {
        // テスト項目: チャットはトークン由来の username とサーバー時刻で履歴に入る
        // given (前提条件):
        let (usecase, handle) = create_usecase(MockBotGateway::new());

        // when (操作):
        let result = usecase.execute(inbound(VALID_TOKEN, "Hello!")).await;
        let history = handle.history().await.unwrap();

        // then (期待する結果):
        assert_eq!(result, Ok(Disposition::Broadcast));
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].username.as_str(), "alice");
        assert_eq!(history[0].content, "Hello!");
        assert_eq!(history[0].timestamp, "2022-12-31 15:00:00");
    }

    #[tokio::test]
    async fn test_invalid_token_is_rejected_and_not_recorded() {
        // テスト項目: 不正なトークンのメッセージはエラーになり、履歴に入らない
        // given (前提条件):
        let (usecase, handle) = create_usecase(MockBotGateway::new());

        // when (操作):
        let result = usecase.execute(inbound("forged", "Hello!")).await;
        let history = handle.history().await.unwrap();

        // then (期待する結果):
        assert!(matches!(result, Err(ReceiveError::Unauthorized(_))));
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_token_with_command_does_not_reach_bot() {
        // テスト項目: 不正なトークンのコマンドは Bot に届かない
        // given (前提条件):
        let mut gateway = MockBotGateway::new();
        gateway.expect_submit_command().times(0);
        let (usecase, _handle) = create_usecase(gateway);

        // when (操作):
        let result = usecase.execute(inbound("forged", "/stock=AAPL")).await;

        // then (期待する結果):
        assert!(matches!(result, Err(ReceiveError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_stock_command_is_dispatched_not_recorded() {
        // テスト項目: /stock= コマンドは Bot に渡され、同期的には履歴に何も入らない
        // given (前提条件):
        let (submitted_tx, mut submitted_rx) = tokio::sync::mpsc::unbounded_channel();
        let mut gateway = MockBotGateway::new();
        gateway.expect_submit_command().returning(move |code| {
            let _ = submitted_tx.send(code.as_str().to_string());
            Ok(())
        });
        let (usecase, handle) = create_usecase(gateway);

        // when (操作):
        let result = usecase.execute(inbound(VALID_TOKEN, "/stock=TEST")).await;
        let history = handle.history().await.unwrap();

        // then (期待する結果):
        assert_eq!(
            result,
            Ok(Disposition::CommandDispatched(StockCode::new("TEST").unwrap()))
        );
        assert!(history.is_empty());
        assert_eq!(submitted_rx.recv().await, Some("TEST".to_string()));
    }

    #[tokio::test]
    async fn test_stock_command_survives_bot_failure() {
        // テスト項目: Bot ゲートウェイが失敗しても送信者にはエラーが返らない
        // given (前提条件):
        let mut gateway = MockBotGateway::new();
        gateway
            .expect_submit_command()
            .returning(|_| Err(BotGatewayError::Request("connection refused".to_string())));
        let (usecase, _handle) = create_usecase(gateway);

        // when (操作):
        let result = usecase.execute(inbound(VALID_TOKEN, "/stock=TEST")).await;

        // then (期待する結果):
        assert!(matches!(result, Ok(Disposition::CommandDispatched(_))));
    }

    #[tokio::test]
    async fn test_unknown_command_appends_exactly_one_help_message() {
        // テスト項目: 未知のコマンドに対して Bot のヘルプメッセージがちょうど 1 件追加される
        // given (前提条件):
        let (usecase, handle) = create_usecase(MockBotGateway::new());

        // when (操作):
        let result = usecase.execute(inbound(VALID_TOKEN, "/unknown")).await;
        let history = handle.history().await.unwrap();

        // then (期待する結果):
        assert_eq!(result, Ok(Disposition::HelpSent));
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].username.as_str(), BOT_USERNAME);
        assert_eq!(history[0].content, HELP_MESSAGE);
    }
}

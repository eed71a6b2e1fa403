//! HTTP bot gateway.
//!
//! The bot service exposes `GET /stock-quote?stock_code=<code>`; it answers
//! immediately and delivers the actual quote later through the reply queue.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{BotGateway, BotGatewayError, StockCode};

/// Default timeout for one submission
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct HttpBotGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpBotGateway {
    /// Create a gateway for the bot service at `base_url` (e.g. `http://localhost:8082`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BotGatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BotGatewayError::Request(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/stock-quote", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl BotGateway for HttpBotGateway {
    async fn submit_command(&self, code: &StockCode) -> Result<(), BotGatewayError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("stock_code", code.as_str())])
            .send()
            .await
            .map_err(|e| BotGatewayError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BotGatewayError::Status(status.as_u16()));
        }

        tracing::debug!("Bot accepted stock command '{}'", code);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Arc};

    use axum::{
        Router,
        extract::{Query, State},
        http::StatusCode,
        routing::get,
    };
    use tokio::sync::Mutex;

    use super::*;

    type Seen = Arc<Mutex<Vec<String>>>;

    async fn stock_quote(
        State(seen): State<Seen>,
        Query(params): Query<HashMap<String, String>>,
    ) -> StatusCode {
        match params.get("stock_code") {
            Some(code) if code == "FAIL" => StatusCode::INTERNAL_SERVER_ERROR,
            Some(code) => {
                seen.lock().await.push(code.clone());
                StatusCode::OK
            }
            None => StatusCode::BAD_REQUEST,
        }
    }

    /// Start a fake bot service and return its base URL.
    async fn start_fake_bot() -> (String, Seen) {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/stock-quote", get(stock_quote))
            .with_state(seen.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}/", addr), seen)
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        // テスト項目: ベース URL 末尾のスラッシュは重複しない
        // given (前提条件):
        let base_url = "http://localhost:8082/";

        // when (操作):
        let gateway = HttpBotGateway::new(base_url, DEFAULT_SUBMIT_TIMEOUT).unwrap();

        // then (期待する結果):
        assert_eq!(gateway.endpoint(), "http://localhost:8082/stock-quote");
    }

    #[tokio::test]
    async fn test_submit_command_sends_stock_code() {
        // テスト項目: stock_code クエリ付きで Bot にリクエストが送られる
        // given (前提条件):
        let (base_url, seen) = start_fake_bot().await;
        let gateway = HttpBotGateway::new(&base_url, DEFAULT_SUBMIT_TIMEOUT).unwrap();

        // when (操作):
        let result = gateway
            .submit_command(&StockCode::new("aapl.us").unwrap())
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(*seen.lock().await, vec!["aapl.us".to_string()]);
    }

    #[tokio::test]
    async fn test_submit_command_reports_error_status() {
        // テスト項目: Bot がエラーステータスを返した場合は Status エラーになる
        // given (前提条件):
        let (base_url, _seen) = start_fake_bot().await;
        let gateway = HttpBotGateway::new(&base_url, DEFAULT_SUBMIT_TIMEOUT).unwrap();

        // when (操作):
        let result = gateway.submit_command(&StockCode::new("FAIL").unwrap()).await;

        // then (期待する結果):
        assert_eq!(result, Err(BotGatewayError::Status(500)));
    }

    #[tokio::test]
    async fn test_submit_command_unreachable_bot() {
        // テスト項目: Bot に接続できない場合は Request エラーになる
        // given (前提条件):
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let gateway =
            HttpBotGateway::new(&format!("http://{}", addr), DEFAULT_SUBMIT_TIMEOUT).unwrap();

        // when (操作):
        let result = gateway.submit_command(&StockCode::new("AAPL").unwrap()).await;

        // then (期待する結果):
        assert!(matches!(result, Err(BotGatewayError::Request(_))));
    }
}

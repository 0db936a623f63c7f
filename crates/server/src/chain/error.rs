// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use thiserror::Error;

pub type ChainResult<T> = Result<T, ChainError>;

/// Failures crossing the Chain Gateway boundary.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("RPC call failed: {0}")]
    Rpc(String),

    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout {
        operation: &'static str,
        timeout_ms: u64,
    },

    #[error("Failed to decode chain data: {0}")]
    Decode(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Server is in offline mode")]
    Offline,
}

impl From<subxt_rpcs::Error> for ChainError {
    fn from(err: subxt_rpcs::Error) -> Self {
        ChainError::Rpc(err.to_string())
    }
}

/// Runs `fut`, failing with [`ChainError::Timeout`] once `timeout_ms` elapses.
pub async fn with_timeout<T, F>(operation: &'static str, timeout_ms: u64, fut: F) -> ChainResult<T>
where
    F: std::future::Future<Output = ChainResult<T>>,
{
    match tokio::time::timeout(std::time::Duration::from_millis(timeout_ms), fut).await {
        Ok(result) => result,
        Err(_) => Err(ChainError::Timeout {
            operation,
            timeout_ms,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_passes_result_through() {
        let result = with_timeout("noop", 1_000, async { Ok::<_, ChainError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_with_timeout_expires() {
        let result: ChainResult<()> = with_timeout("sleep", 5, async {
            tokio::time::sleep(std::time::Duration::from_millis(200)).await;
            Ok(())
        })
        .await;
        assert!(matches!(
            result,
            Err(ChainError::Timeout {
                operation: "sleep",
                timeout_ms: 5
            })
        ));
    }
}

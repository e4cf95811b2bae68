//! UseCase: ヘルスチェック
//!
//! 接続中ユーザー数とバックエンドへの到達性を報告します。

use std::{sync::Arc, time::Duration};

use crate::domain::{Backend, BackendError, BackendKind, SessionRepository};

#[derive(Debug, Clone, PartialEq)]
pub struct HealthReport {
    /// Number of joined, live WebSocket connections
    pub connected_users: usize,
    pub backend_kind: BackendKind,
    pub backend: Result<(), BackendError>,
}

/// Upper bound on the backend probe, independent of the call timeout
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// ヘルスチェックのユースケース
pub struct CheckHealthUseCase {
    repository: Arc<dyn SessionRepository>,
    backend: Arc<dyn Backend>,
    probe_timeout: Duration,
}

impl CheckHealthUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>, backend: Arc<dyn Backend>) -> Self {
        Self {
            repository,
            backend,
            probe_timeout: PROBE_TIMEOUT,
        }
    }

    pub fn with_probe_timeout(mut self, probe_timeout: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self
    }

    pub async fn execute(&self) -> HealthReport {
        let backend = tokio::time::timeout(self.probe_timeout, self.backend.probe())
            .await
            .unwrap_or(Err(BackendError::Timeout(self.probe_timeout)));
        if let Err(error) = &backend {
            tracing::warn!(kind = error.kind(), "Backend probe failed: {}", error);
        }

        HealthReport {
            connected_users: self.repository.count().await,
            backend_kind: self.backend.kind(),
            backend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConnectionId, MockBackend, UserId},
        infrastructure::repository::InMemorySessionRepository,
    };

    #[tokio::test]
    async fn test_health_reports_connected_users_and_backend() {
        // テスト項目: 接続中ユーザー数とバックエンドの状態が報告される
        // given (前提条件):
        let repository = Arc::new(InMemorySessionRepository::new());
        repository
            .add(
                ConnectionId::new("c1".to_string()).unwrap(),
                UserId::new("alice".to_string()).unwrap(),
            )
            .await;
        let mut backend = MockBackend::new();
        backend.expect_probe().times(1).returning(|| Ok(()));
        backend.expect_kind().return_const(BackendKind::Http);
        let usecase = CheckHealthUseCase::new(repository, Arc::new(backend));

        // when (操作):
        let report = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(report.connected_users, 1);
        assert_eq!(report.backend_kind, BackendKind::Http);
        assert_eq!(report.backend, Ok(()));
    }

    #[tokio::test]
    async fn test_health_reports_unreachable_backend() {
        // テスト項目: バックエンドに到達できない場合もレポートは返される
        let repository = Arc::new(InMemorySessionRepository::new());
        let mut backend = MockBackend::new();
        backend
            .expect_probe()
            .times(1)
            .returning(|| Err(BackendError::Unreachable("refused".to_string())));
        backend.expect_kind().return_const(BackendKind::Process);
        let usecase = CheckHealthUseCase::new(repository, Arc::new(backend));

        let report = usecase.execute().await;

        assert_eq!(report.connected_users, 0);
        assert_eq!(report.backend_kind, BackendKind::Process);
        assert!(report.backend.is_err());
    }

    struct HangingBackend;

    #[async_trait::async_trait]
    impl Backend for HangingBackend {
        fn kind(&self) -> BackendKind {
            BackendKind::Process
        }

        async fn invoke(
            &self,
            _operation: crate::domain::BackendOperation,
            _payload: crate::domain::BackendPayload,
        ) -> Result<crate::domain::BackendReply, BackendError> {
            std::future::pending().await
        }

        async fn probe(&self) -> Result<(), BackendError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_hanging_probe_is_cut_off() {
        // テスト項目: 応答しないバックエンドでもヘルスチェックはすぐに返る
        // given (前提条件):
        let usecase = CheckHealthUseCase::new(
            Arc::new(InMemorySessionRepository::new()),
            Arc::new(HangingBackend),
        )
        .with_probe_timeout(Duration::from_millis(50));

        // when (操作):
        let report = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(
            report.backend,
            Err(BackendError::Timeout(Duration::from_millis(50)))
        );
        assert_eq!(report.backend_kind, BackendKind::Process);
    }
}

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::application::usercases::entitlements::SharedEntitlements;
use crate::domain::{
    clock::Clock,
    repositories::{entitlement_slots::EntitlementSlotRepository, readings::ReadingGateway},
    value_objects::readings::{ReadingOutcome, ReadingRequest},
};

#[derive(Debug, Error)]
pub enum ReadingError {
    #[error("reading generation failed")]
    Generation(#[source] anyhow::Error),
    #[error("reading generation returned no content")]
    EmptyResult,
}

pub type UseCaseResult<T> = std::result::Result<T, ReadingError>;

/// Runs a privileged feature behind the entitlement gate.
///
/// Access is checked before the gateway is called, and quota is consumed only once the
/// gateway has returned usable content. The store is not locked while generation runs.
///
/// This crate ships no `ReadingGateway`; a feature service supplies its model client and builds
/// this use case over the same `SharedEntitlements` that `lib::run` serves.
pub struct ReadingUseCase<T, C, G>
where
    T: EntitlementSlotRepository + Send + Sync + 'static,
    C: Clock + 'static,
    G: ReadingGateway + Send + Sync + 'static,
{
    entitlements: SharedEntitlements<T, C>,
    reading_gateway: Arc<G>,
}

impl<T, C, G> ReadingUseCase<T, C, G>
where
    T: EntitlementSlotRepository + Send + Sync + 'static,
    C: Clock + 'static,
    G: ReadingGateway + Send + Sync + 'static,
{
    pub fn new(entitlements: SharedEntitlements<T, C>, reading_gateway: Arc<G>) -> Self {
        Self {
            entitlements,
            reading_gateway,
        }
    }

    pub async fn run(&self, request: ReadingRequest) -> UseCaseResult<ReadingOutcome> {
        let kind = request.kind;

        if !self.entitlements.lock().await.check_access() {
            info!(%kind, "readings: access denied; paywall raised");
            return Ok(ReadingOutcome::Denied);
        }

        info!(%kind, vision = kind.is_vision(), "readings: generating");
        let result = self
            .reading_gateway
            .generate(request)
            .await
            .map_err(|err| {
                error!(%kind, gateway_error = ?err, "readings: generation failed");
                ReadingError::Generation(err)
            })?;

        if !result.is_usable() {
            warn!(%kind, "readings: empty result; quota not consumed");
            return Err(ReadingError::EmptyResult);
        }

        self.entitlements.lock().await.consume_quota();
        info!(%kind, "readings: completed");

        Ok(ReadingOutcome::Completed(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::usercases::entitlements::EntitlementUseCase;
    use crate::domain::{
        clock::testing::ManualClock,
        repositories::readings::MockReadingGateway,
        value_objects::{enums::reading_kinds::ReadingKind, readings::ReadingResult},
    };
    use crate::infrastructure::local_storage::memory_slots::MemorySlotStorage;
    use anyhow::anyhow;

    const NOW: i64 = 1_700_000_000_000;

    fn shared_store() -> SharedEntitlements<MemorySlotStorage, ManualClock> {
        EntitlementUseCase::new(
            Arc::new(MemorySlotStorage::new()),
            Arc::new(ManualClock::at(NOW)),
        )
        .into_shared()
    }

    fn tarot_request() -> ReadingRequest {
        ReadingRequest {
            kind: ReadingKind::Tarot,
            query: "这次面试结果如何？".to_string(),
        }
    }

    fn reading(markdown: &str) -> ReadingResult {
        ReadingResult {
            kind: ReadingKind::Tarot,
            markdown: markdown.to_string(),
            suggested_actions: Vec::new(),
        }
    }

    #[tokio::test]
    async fn successful_reading_consumes_exactly_once() {
        let entitlements = shared_store();
        let mut gateway = MockReadingGateway::new();
        gateway
            .expect_generate()
            .times(1)
            .returning(|_| Ok(reading("## 过去 · 现在 · 未来")));

        let usecase = ReadingUseCase::new(Arc::clone(&entitlements), Arc::new(gateway));
        let outcome = usecase.run(tarot_request()).await.unwrap();

        assert!(matches!(outcome, ReadingOutcome::Completed(_)));
        assert_eq!(entitlements.lock().await.state().usage_count, 1);
    }

    #[tokio::test]
    async fn failed_generation_does_not_consume() {
        let entitlements = shared_store();
        let mut gateway = MockReadingGateway::new();
        gateway
            .expect_generate()
            .returning(|_| Err(anyhow!("upstream timed out")));

        let usecase = ReadingUseCase::new(Arc::clone(&entitlements), Arc::new(gateway));
        let result = usecase.run(tarot_request()).await;

        assert!(matches!(result, Err(ReadingError::Generation(_))));
        assert_eq!(entitlements.lock().await.state().usage_count, 0);
    }

    #[tokio::test]
    async fn blank_result_does_not_consume() {
        let entitlements = shared_store();
        let mut gateway = MockReadingGateway::new();
        gateway.expect_generate().returning(|_| Ok(reading("  \n")));

        let usecase = ReadingUseCase::new(Arc::clone(&entitlements), Arc::new(gateway));
        let result = usecase.run(tarot_request()).await;

        assert!(matches!(result, Err(ReadingError::EmptyResult)));
        assert_eq!(entitlements.lock().await.state().usage_count, 0);
    }

    #[tokio::test]
    async fn exhausted_quota_skips_the_gateway() {
        let entitlements = shared_store();
        {
            let mut store = entitlements.lock().await;
            for _ in 0..3 {
                store.consume_quota();
            }
        }
        let mut gateway = MockReadingGateway::new();
        gateway.expect_generate().never();

        let usecase = ReadingUseCase::new(Arc::clone(&entitlements), Arc::new(gateway));
        let outcome = usecase.run(tarot_request()).await.unwrap();

        assert_eq!(outcome, ReadingOutcome::Denied);
        let store = entitlements.lock().await;
        assert!(store.show_paywall());
        assert_eq!(store.state().usage_count, 3);
    }

    #[tokio::test]
    async fn readings_stop_once_the_free_allowance_is_spent() {
        let entitlements = shared_store();
        let mut gateway = MockReadingGateway::new();
        gateway
            .expect_generate()
            .times(3)
            .returning(|_| Ok(reading("今日宜出行")));

        let usecase = ReadingUseCase::new(Arc::clone(&entitlements), Arc::new(gateway));
        for _ in 0..3 {
            let outcome = usecase.run(tarot_request()).await.unwrap();
            assert!(matches!(outcome, ReadingOutcome::Completed(_)));
        }

        let outcome = usecase.run(tarot_request()).await.unwrap();
        assert_eq!(outcome, ReadingOutcome::Denied);
    }
}

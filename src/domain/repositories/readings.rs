use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::value_objects::readings::{ReadingRequest, ReadingResult};

/// External content generation behind a privileged feature.
#[automock]
#[async_trait]
pub trait ReadingGateway {
    async fn generate(&self, request: ReadingRequest) -> Result<ReadingResult>;
}

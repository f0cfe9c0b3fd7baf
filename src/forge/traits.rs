//! Traits related to remote release providers
use async_trait::async_trait;

use crate::{
    forge::{config::ClientType, types::CreateReleaseRequest},
    result::Result,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReleaseClient: Send + Sync {
    fn client_type(&self) -> ClientType;
    async fn create_release(&self, req: CreateReleaseRequest) -> Result<()>;
}

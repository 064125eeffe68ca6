//! Status mutation gateway
//!
//! Sends one PUT per request. Nothing is batched or retried, and nothing is
//! applied to displayed data optimistically: callers re-run their list query
//! after a confirmed success to observe the change.

use log::{error, info};
use std::sync::Arc;

use super::operation::MutationRequest;
use crate::api::client::RemoteDataSource;
use crate::api::error::ApiError;
use crate::api::models::Credential;
use crate::api::resilience::TimeoutConfig;

#[derive(Clone)]
pub struct MutationGateway {
    source: Arc<dyn RemoteDataSource>,
    timeouts: TimeoutConfig,
}

impl MutationGateway {
    pub fn new(source: Arc<dyn RemoteDataSource>, timeouts: TimeoutConfig) -> Self {
        Self { source, timeouts }
    }

    pub async fn mutate(
        &self,
        request: &MutationRequest,
        credential: &Credential,
    ) -> Result<(), ApiError> {
        let path = request.path();
        let timeout = self.timeouts.for_resource(&request.resource);

        match self
            .source
            .send_update(&path, &request.body(), credential, timeout)
            .await
        {
            Ok(()) => {
                info!(
                    "Set {} on {}/{} to {}",
                    request.field, request.resource, request.record_id, request.new_value
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "Updating {} on {}/{} failed: {}",
                    request.field, request.resource, request.record_id, err
                );
                Err(err)
            }
        }
    }
}

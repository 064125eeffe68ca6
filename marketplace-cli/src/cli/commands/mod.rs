//! Command handlers

pub mod fallback;
pub mod list;
pub mod set;

pub use fallback::handle_fallback_command;
pub use list::handle_list_command;
pub use set::handle_set_command;

use anyhow::Result;
use log::debug;
use std::sync::Arc;

use crate::api::{
    ClientConfig, Credential, HttpDataSource, ListEndpoint, ListStateManager, MutationGateway,
    RemoteDataSource, SortFields,
};
use crate::config::AppConfig;

/// Backend connection shared by the handlers of one invocation
pub struct Session {
    client_config: ClientConfig,
    source: Arc<dyn RemoteDataSource>,
    credential: Credential,
}

impl Session {
    pub fn connect(config: &AppConfig) -> Result<Self> {
        let client_config = config.client_config();
        let source = HttpDataSource::new(config.api.base_url.as_str(), &client_config)?;
        debug!("Using API at {}", source.base_url());

        Ok(Self {
            credential: config.credential()?,
            source: Arc::new(source),
            client_config,
        })
    }

    /// List manager for a resource, with its configured deadline
    pub fn list(&self, resource: &str) -> ListStateManager {
        let mut endpoint = ListEndpoint::for_entity(resource, self.client_config.timeouts.default);
        endpoint.timeout = self.client_config.timeouts.for_resource(&endpoint.path);

        let sort_fields = match endpoint.resource() {
            "orders" => SortFields::orders(),
            _ => SortFields::default(),
        };
        ListStateManager::new(self.source.clone(), endpoint, self.credential.clone())
            .with_sort_fields(sort_fields)
    }

    pub fn gateway(&self) -> MutationGateway {
        MutationGateway::new(self.source.clone(), self.client_config.timeouts.clone())
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }
}

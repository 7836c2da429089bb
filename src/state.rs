use crate::middleware::{ErrorRouter, Navigator, Notifier, TracingNavigator, TracingNotifier};
use crate::services::{AccountService, MembersService};
use shared::{ApiClient, Config};
use std::sync::Arc;
use tracing::info;

/// Shared state for one browsing session.
/// Holds the configured API client, the account session and the error router.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub client: ApiClient,
    pub account: Arc<AccountService>,
}

impl AppState {
    pub fn new(
        config: Config,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> anyhow::Result<Self> {
        let router = ErrorRouter::new(notifier, navigator);
        let client = ApiClient::new(&config.api)?.with_failure_handler(Arc::new(router));
        let account = Arc::new(AccountService::new(client.clone()));

        info!("🌐 API client ready for {}", client.base_url());

        Ok(Self {
            config,
            client,
            account,
        })
    }

    /// Session state that only logs notifications and navigation.
    pub fn headless(config: Config) -> anyhow::Result<Self> {
        Self::new(config, Arc::new(TracingNotifier), Arc::new(TracingNavigator))
    }

    /// Members service seeded from the user signed in at call time.
    pub fn members_service(&self) -> MembersService {
        MembersService::for_account(
            self.client.clone(),
            &self.account,
            self.config.cache.member_pages_capacity,
        )
    }
}

use std::sync::Arc;

use cheers_core::messaging::MemberDirectory;
use cheers_db::DbPool;
use cheers_slack::SlackClients;
use cheers_worker::inbound::InboundEventHandler;
use cheers_worker::onboarding::OnboardingService;
use cheers_worker::CelebrationDispatcher;

use crate::config::ServerConfig;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything inside is an `Arc` or a pool handle.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<ServerConfig>,
    pub directory: Arc<dyn MemberDirectory>,
    pub dispatcher: CelebrationDispatcher,
    pub inbound: InboundEventHandler,
    pub onboarding: OnboardingService,
}

impl AppState {
    /// Wire the worker services to one set of Slack clients.
    pub fn new(pool: DbPool, config: ServerConfig, clients: SlackClients) -> Self {
        let SlackClients {
            messenger,
            directory,
        } = clients;

        Self {
            dispatcher: CelebrationDispatcher::new(pool.clone(), Arc::clone(&messenger)),
            inbound: InboundEventHandler::new(
                pool.clone(),
                Arc::clone(&messenger),
                Arc::clone(&directory),
            ),
            onboarding: OnboardingService::new(pool.clone(), messenger, Arc::clone(&directory)),
            directory,
            config: Arc::new(config),
            pool,
        }
    }
}

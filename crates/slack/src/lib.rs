//! Outbound Slack integration: the real Web API messenger, a no-op
//! stand-in and the configuration that picks between them.

pub mod config;
pub mod messenger;
pub mod noop;
pub mod web_api;

use std::sync::Arc;

use cheers_core::messaging::{MemberDirectory, Messenger};
use sqlx::PgPool;

use crate::config::{ClientMode, SlackConfig};
use crate::messenger::SlackMessenger;
use crate::noop::NoopMessenger;
use crate::web_api::SlackWebApi;

/// The messaging and directory halves of one Slack client.
#[derive(Clone)]
pub struct SlackClients {
    pub messenger: Arc<dyn Messenger>,
    pub directory: Arc<dyn MemberDirectory>,
}

/// Build the client selected by `config.mode`.
pub fn build_clients(config: &SlackConfig, pool: PgPool) -> Result<SlackClients, reqwest::Error> {
    match config.mode {
        ClientMode::Noop => {
            let client = Arc::new(NoopMessenger);
            Ok(SlackClients {
                messenger: client.clone(),
                directory: client,
            })
        }
        ClientMode::Api => {
            let api = SlackWebApi::new(&config.api_base_url, config.http_timeout())?;
            let client = Arc::new(SlackMessenger::new(api, pool, config.bot_token.clone()));
            Ok(SlackClients {
                messenger: client.clone(),
                directory: client,
            })
        }
    }
}

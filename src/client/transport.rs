//! HTTP transport for the client: synchronous wrappers over `reqwest`
//! running on a private runtime.

use crate::error::ClientError;
use crate::proto::{CommandInfo, CommandRequest, CommandResponse, NavigationRequest, NavigationResponse};
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::trace;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Wire operations the session needs. Error bodies decode like success
/// bodies; the `error` field inside carries the failure.
pub trait Transport {
    /// Reachability check before a URL is treated as connected. Any HTTP
    /// answer counts; only a transport failure is an error.
    fn probe(&self, base_url: &str) -> Result<(), ClientError>;

    fn navigate(
        &self,
        base_url: &str,
        req: &NavigationRequest,
    ) -> Result<NavigationResponse, ClientError>;

    fn exec(&self, base_url: &str, req: &CommandRequest) -> Result<CommandResponse, ClientError>;

    /// Command descriptors for a node. Failures degrade to an empty list;
    /// the session then binds nothing rather than refusing the context.
    fn fetch_commands(&self, base_url: &str, node_type: &str, node_name: &str)
        -> Vec<CommandInfo>;
}

pub struct HttpTransport {
    client: reqwest::Client,
    runtime: Runtime,
}

impl HttpTransport {
    pub fn new() -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .no_proxy()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let runtime = Runtime::new().map_err(ClientError::Runtime)?;
        Ok(Self { client, runtime })
    }
}

impl Transport for HttpTransport {
    fn probe(&self, base_url: &str) -> Result<(), ClientError> {
        let url = format!("{base_url}/api/context");
        self.runtime.block_on(async {
            self.client.get(&url).send().await?;
            Ok(())
        })
    }

    fn navigate(
        &self,
        base_url: &str,
        req: &NavigationRequest,
    ) -> Result<NavigationResponse, ClientError> {
        let url = format!("{base_url}/api/context/navigate");
        self.runtime.block_on(async {
            let resp = self.client.post(&url).json(req).send().await?;
            Ok(resp.json().await?)
        })
    }

    fn exec(&self, base_url: &str, req: &CommandRequest) -> Result<CommandResponse, ClientError> {
        let url = format!("{base_url}/api/exec");
        self.runtime.block_on(async {
            let resp = self.client.post(&url).json(req).send().await?;
            Ok(resp.json().await?)
        })
    }

    fn fetch_commands(
        &self,
        base_url: &str,
        node_type: &str,
        node_name: &str,
    ) -> Vec<CommandInfo> {
        let url = format!("{base_url}/api/context/node/{node_type}/{node_name}/commands");
        let fetched: Result<Vec<CommandInfo>, reqwest::Error> = self.runtime.block_on(async {
            let resp = self.client.get(&url).send().await?;
            if !resp.status().is_success() {
                return Ok(Vec::new());
            }
            resp.json().await
        });
        match fetched {
            Ok(commands) => commands,
            Err(e) => {
                trace!(error = %e, "command fetch failed");
                Vec::new()
            }
        }
    }
}

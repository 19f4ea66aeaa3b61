//! Notification Dispatcher
//!
//! Sends one authenticated CRUD notification per call to the manage API and
//! classifies the outcome. Expected failures (missing configuration,
//! transport problems, remote rejections) come back as an unsuccessful
//! [`NotificationResult`]; only caller misuse is an `Err`.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use nexx_core::config::{ApiConfig, HttpConfig};
use nexx_core::types::{
    Command, EntityKind, NotificationRequest, NotificationResult, RawPayload, Values,
};
use nexx_core::{Error, Result, API_VERSION, HEADER_REQUEST_CID, HEADER_REQUEST_TOKEN};

use crate::notice::{NoticeSink, SilentNotices};
use crate::token::request_token;
use crate::transport::{HttpTransport, OutboundRequest, Transport, TransportResponse};

const MISSING_CONFIG_LOG: &str =
    "Missing configuration for API Url and/or Installation Code (API Key)";

const MISSING_CONFIG_NOTICE: &str = "Item wasn't exported to Nexx due to missing configuration for API Url and/or Installation Code (API Key).";

/// Inbound CRUD interface for code reacting to entity changes
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn insert(
        &self,
        kind: EntityKind,
        reference_id: &str,
        values: Values,
    ) -> Result<NotificationResult>;

    async fn update(
        &self,
        kind: EntityKind,
        reference_id: &str,
        values: Values,
    ) -> Result<NotificationResult>;

    async fn delete(
        &self,
        kind: EntityKind,
        reference_id: &str,
        values: Values,
    ) -> Result<NotificationResult>;
}

/// Notification dispatcher handle
///
/// Holds no mutable state, so clones can be used from concurrent tasks.
#[derive(Clone)]
pub struct NotificationDispatcher {
    config: Arc<ApiConfig>,
    transport: Arc<dyn Transport>,
    notices: Arc<dyn NoticeSink>,
}

impl NotificationDispatcher {
    /// Create a dispatcher talking HTTP with the given timeouts
    pub fn new(config: ApiConfig, http: &HttpConfig) -> Result<Self> {
        let transport = HttpTransport::new(http)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: ApiConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            notices: Arc::new(SilentNotices),
        }
    }

    pub fn with_notices(mut self, notices: Arc<dyn NoticeSink>) -> Self {
        self.notices = notices;
        self
    }

    /// Notify the creation of an entity. Videos are rejected.
    pub async fn insert(
        &self,
        kind: EntityKind,
        reference_id: impl Into<String>,
        values: Values,
    ) -> Result<NotificationResult> {
        self.notify(kind, reference_id, Command::Insert, values).await
    }

    pub async fn update(
        &self,
        kind: EntityKind,
        reference_id: impl Into<String>,
        values: Values,
    ) -> Result<NotificationResult> {
        self.notify(kind, reference_id, Command::Update, values).await
    }

    /// Notify the removal of an entity. Videos are rejected.
    pub async fn delete(
        &self,
        kind: EntityKind,
        reference_id: impl Into<String>,
        values: Values,
    ) -> Result<NotificationResult> {
        self.notify(kind, reference_id, Command::Delete, values).await
    }

    async fn notify(
        &self,
        kind: EntityKind,
        reference_id: impl Into<String>,
        command: Command,
        values: Values,
    ) -> Result<NotificationResult> {
        let request = NotificationRequest::new(kind, command, reference_id, values)?;
        Ok(self.dispatch(&request).await)
    }

    /// Dispatch a validated request
    pub async fn dispatch(&self, request: &NotificationRequest) -> NotificationResult {
        self.dispatch_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Dispatch a validated request, giving up when `cancel` fires.
    ///
    /// A cancelled dispatch is reported as a transport failure.
    pub async fn dispatch_with_cancel(
        &self,
        request: &NotificationRequest,
        cancel: &CancellationToken,
    ) -> NotificationResult {
        if !self.config.is_complete() {
            error!(
                entity_kind = %request.entity_kind,
                command = %request.command,
                reference_id = %request.reference_id,
                "{}",
                MISSING_CONFIG_LOG
            );
            self.notices.notice(MISSING_CONFIG_NOTICE);
            return NotificationResult::failed(Error::Configuration(MISSING_CONFIG_LOG.into()));
        }

        let outbound = self.build_request(request);
        debug!(
            url = %outbound.url,
            headers = outbound.headers.len(),
            "Sending notification"
        );

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Transport("request cancelled".into())),
            response = self.transport.post(&outbound) => response,
        };

        let payload = match response.and_then(decode_response) {
            Ok(payload) => payload,
            Err(e) => {
                error!(
                    entity_kind = %request.entity_kind,
                    command = %request.command,
                    reference_id = %request.reference_id,
                    error = %e,
                    "HTTP request failed"
                );
                return NotificationResult::failed(e);
            }
        };

        let result = NotificationResult::from_payload(payload);

        if result.success {
            info!(
                entity_kind = %request.entity_kind,
                command = %request.command,
                reference_id = %request.reference_id,
                values = ?request.values,
                "Successful notification"
            );
        } else {
            error!(
                entity_kind = %request.entity_kind,
                command = %request.command,
                reference_id = %request.reference_id,
                state = result.remote_state.as_deref().unwrap_or(""),
                info = result.remote_info.as_deref().unwrap_or(""),
                "Omnia request failed"
            );
        }

        result
    }

    /// Manage endpoint for an entity kind.
    ///
    /// The path always ends in `add/`, whatever the command; the remote
    /// service routes on the headers.
    pub fn target_url(&self, kind: EntityKind) -> String {
        format!(
            "{}{}/{}/manage/{}/add/",
            self.config.base_url, API_VERSION, self.config.installation_id, kind
        )
    }

    /// Build the outbound request: auth headers first, then the caller's
    /// values as extra headers. Values never override the auth headers.
    pub fn build_request(&self, request: &NotificationRequest) -> OutboundRequest {
        let token = request_token(
            request.entity_kind,
            &self.config.installation_id,
            &self.config.shared_secret,
        );

        let mut headers = Vec::with_capacity(request.values.len() + 2);
        headers.push((HEADER_REQUEST_TOKEN.to_string(), token));
        headers.push((HEADER_REQUEST_CID.to_string(), self.config.auth_key.clone()));

        for (name, value) in &request.values {
            if name.eq_ignore_ascii_case(HEADER_REQUEST_TOKEN)
                || name.eq_ignore_ascii_case(HEADER_REQUEST_CID)
            {
                debug!(header = %name, "Skipping value that collides with an auth header");
                continue;
            }
            headers.push((name.clone(), value.clone()));
        }

        OutboundRequest {
            url: self.target_url(request.entity_kind),
            headers,
        }
    }
}

#[async_trait]
impl Notifier for NotificationDispatcher {
    async fn insert(
        &self,
        kind: EntityKind,
        reference_id: &str,
        values: Values,
    ) -> Result<NotificationResult> {
        NotificationDispatcher::insert(self, kind, reference_id, values).await
    }

    async fn update(
        &self,
        kind: EntityKind,
        reference_id: &str,
        values: Values,
    ) -> Result<NotificationResult> {
        NotificationDispatcher::update(self, kind, reference_id, values).await
    }

    async fn delete(
        &self,
        kind: EntityKind,
        reference_id: &str,
        values: Values,
    ) -> Result<NotificationResult> {
        NotificationDispatcher::delete(self, kind, reference_id, values).await
    }
}

fn decode_response(response: TransportResponse) -> Result<RawPayload> {
    if !response.is_success() {
        return Err(Error::Transport(format!(
            "Manage API returned error status: {}",
            response.status
        )));
    }

    match serde_json::from_slice::<Value>(&response.body) {
        Ok(Value::Object(payload)) => Ok(payload),
        Ok(_) => Err(Error::Transport(
            "Manage API response is not a JSON object".into(),
        )),
        Err(e) => Err(Error::Transport(format!(
            "Invalid manage API response: {}",
            e
        ))),
    }
}

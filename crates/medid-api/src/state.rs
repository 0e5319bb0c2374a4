//! # Application State
//!
//! Cloned into every handler. All fields are cheap handles.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use medid_service::{
    ChannelNotifier, MedidService, NotificationInbox, Notifier, ServiceConfig,
};

use crate::auth::AuthConfig;

#[derive(Clone)]
pub struct AppState {
    pub service: MedidService,
    pub inbox: NotificationInbox,
    pub auth: AuthConfig,
    /// Renders `/metrics`. Absent when no recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(service: MedidService, inbox: NotificationInbox, auth: AuthConfig) -> Self {
        Self {
            service,
            inbox,
            auth,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// In-memory service whose notifications land in the returned state's
    /// inbox through a dispatcher task. Must be called inside a Tokio runtime.
    pub fn in_memory(config: ServiceConfig, auth: AuthConfig, notification_buffer: usize) -> Self {
        let (notifier, events) = ChannelNotifier::channel(notification_buffer);
        let inbox = NotificationInbox::new();
        inbox.spawn_dispatcher(events);
        let notifier: Arc<dyn Notifier> = Arc::new(notifier);
        Self::new(MedidService::in_memory(config, notifier), inbox, auth)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service", &self.service)
            .field("auth", &self.auth)
            .field("metrics", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}

//! The flash briefing responder.
//!
//! Authenticates a request, looks up the briefing, and renders each item into
//! a [`BriefingOutput`]. Everything it reads is injected at construction and
//! never mutated afterwards, so one responder serves any number of concurrent
//! requests without locking.

use std::sync::Arc;

use briefcast_config::{AppConfig, ConfigError};
use briefcast_core::{
    BriefingConfig, BriefingEntry, BriefingError, BriefingItem, BriefingOutput, Clock,
    DATE_FORMAT, FieldValue, RenderContext, SystemClock, TemplateError, TemplateRenderer,
};
use briefcast_security::{AuditEvent, AuditLogger, AuditOutcome, SharedSecret};
use briefcast_template::TemplateEngine;
use tracing::debug;

pub struct FlashBriefingResponder {
    briefings: BriefingConfig,
    secret: SharedSecret,
    variables: RenderContext,
    renderer: Arc<dyn TemplateRenderer>,
    clock: Arc<dyn Clock>,
    audit: AuditLogger,
}

impl std::fmt::Debug for FlashBriefingResponder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlashBriefingResponder")
            .field("briefings", &self.briefing_ids())
            .field("secret", &self.secret)
            .field("variables", &self.variables.len())
            .field("audit", &self.audit)
            .finish()
    }
}

impl FlashBriefingResponder {
    /// Create a responder with the built-in template engine, the system
    /// clock and tracing-backed audit logging.
    pub fn new(briefings: BriefingConfig, secret: SharedSecret) -> Self {
        Self {
            briefings,
            secret,
            variables: RenderContext::new(),
            renderer: Arc::new(TemplateEngine::new()),
            clock: Arc::new(SystemClock),
            audit: AuditLogger::default(),
        }
    }

    /// Build a responder from loaded configuration.
    ///
    /// Fails when no flash briefing password is configured.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let password = config.password().ok_or_else(|| {
            ConfigError::ValidationError(
                "flash_briefings.password is required to serve briefings".into(),
            )
        })?;

        let variables = RenderContext::from_values(
            config
                .templates
                .variables
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );

        Ok(Self::new(config.briefings(), SharedSecret::new(password)).with_variables(variables))
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn TemplateRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_audit(mut self, audit: AuditLogger) -> Self {
        self.audit = audit;
        self
    }

    /// Variables every template sees, next to `briefing_id` and `now`.
    pub fn with_variables(mut self, variables: RenderContext) -> Self {
        self.variables = variables;
        self
    }

    /// Configured briefing ids, sorted.
    pub fn briefing_ids(&self) -> Vec<&str> {
        self.briefings.keys().map(String::as_str).collect()
    }

    /// Serve one briefing request.
    ///
    /// The credential is checked before the lookup, so an unauthenticated
    /// caller cannot probe which briefing ids exist.
    pub fn handle(
        &self,
        briefing_id: &str,
        credential: Option<&str>,
    ) -> Result<Vec<BriefingOutput>, BriefingError> {
        debug!(briefing_id = %briefing_id, "Received flash briefing request");

        let Some(credential) = credential else {
            return Err(self.deny(AuditEvent::CredentialMissing, briefing_id));
        };
        if !self.secret.verify(credential) {
            return Err(self.deny(AuditEvent::CredentialRejected, briefing_id));
        }

        let outputs = self.render(briefing_id)?;
        self.audit.log(
            AuditEvent::BriefingServed {
                items: outputs.len(),
            },
            briefing_id,
            AuditOutcome::Success,
            None,
        );
        Ok(outputs)
    }

    /// Render a briefing without checking credentials.
    pub fn render(&self, briefing_id: &str) -> Result<Vec<BriefingOutput>, BriefingError> {
        let Some(items) = self.briefings.get(briefing_id).and_then(BriefingEntry::items) else {
            self.audit.log(
                AuditEvent::BriefingNotFound,
                briefing_id,
                AuditOutcome::Failure,
                None,
            );
            return Err(BriefingError::NotFound {
                briefing_id: briefing_id.to_string(),
            });
        };

        items
            .iter()
            .map(|item| self.render_item(briefing_id, item))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                self.audit.log(
                    AuditEvent::RenderFailed,
                    briefing_id,
                    AuditOutcome::Failure,
                    Some(e.to_string()),
                );
                BriefingError::Render(e)
            })
    }

    fn deny(&self, event: AuditEvent, briefing_id: &str) -> BriefingError {
        let audit = &self.audit;
        audit.log(event, briefing_id, AuditOutcome::Denied, None);
        BriefingError::Unauthorized {
            briefing_id: briefing_id.to_string(),
        }
    }

    fn render_item(
        &self,
        briefing_id: &str,
        item: &BriefingItem,
    ) -> Result<BriefingOutput, TemplateError> {
        let now = self.clock.now_utc();
        let context = self
            .variables
            .clone()
            .with("briefing_id", briefing_id)
            .with("now", now.to_rfc3339());

        Ok(BriefingOutput {
            title_text: self.render_field(item.title.as_ref(), &context)?,
            main_text: self.render_field(item.text.as_ref(), &context)?,
            uid: item
                .uid
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            stream_url: self.render_field(item.audio.as_ref(), &context)?,
            redirection_url: self.render_field(item.display_url.as_ref(), &context)?,
            update_date: now.format(DATE_FORMAT).to_string(),
        })
    }

    fn render_field(
        &self,
        field: Option<&FieldValue>,
        context: &RenderContext,
    ) -> Result<Option<String>, TemplateError> {
        match field {
            Some(FieldValue::Template(source)) => self.renderer.render(source, context).map(Some),
            Some(FieldValue::Literal(text)) => Ok(Some(text.clone())),
            None => Ok(None),
        }
    }
}

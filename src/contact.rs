//! Contact form submission through a transactional email relay.

use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_RELAY_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("relay is not configured: missing {0}")]
    MissingToken(&'static str),

    #[error("relay unavailable: {0}")]
    Unavailable(String),

    #[error("invalid form: {0}")]
    Invalid(String),

    #[error("relay request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("relay rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    pub fn new(name: impl Into<String>, email: impl Into<String>, message: impl Into<String>) -> Self {
        ContactForm {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    pub fn validate(&self) -> Result<(), RelayError> {
        if self.name.trim().is_empty() {
            return Err(RelayError::Invalid("name is required".into()));
        }
        if self.message.trim().is_empty() {
            return Err(RelayError::Invalid("message is required".into()));
        }
        if !is_plausible_email(self.email.trim()) {
            return Err(RelayError::Invalid(format!("{:?} is not an email address", self.email)));
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        *self = ContactForm::default();
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Message => &self.message,
        }
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Message => &mut self.message,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Name,
    Email,
    Message,
}

impl FormField {
    pub const ALL: [FormField; 3] = [FormField::Name, FormField::Email, FormField::Message];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Email => "Email",
            FormField::Message => "Message",
        }
    }

    pub fn next(self) -> FormField {
        match self {
            FormField::Name => FormField::Email,
            FormField::Email => FormField::Message,
            FormField::Message => FormField::Name,
        }
    }
}

fn is_plausible_email(email: &str) -> bool {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty()
        && !email.chars().any(char::is_whitespace)
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty())
}

/// What the user sees after pressing send
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    /// A background send is in flight
    Sending,
    Success,
    Error(String),
}

pub trait EmailRelay {
    fn send(&self, form: &ContactForm) -> Result<(), RelayError>;
}

impl<T: EmailRelay + ?Sized> EmailRelay for Box<T> {
    fn send(&self, form: &ContactForm) -> Result<(), RelayError> {
        (**self).send(form)
    }
}

/// Stands in for a relay that could not be built; every send fails with the reason
#[derive(Debug, Clone)]
pub struct DisabledRelay(pub String);

impl EmailRelay for DisabledRelay {
    fn send(&self, _form: &ContactForm) -> Result<(), RelayError> {
        Err(RelayError::Unavailable(self.0.clone()))
    }
}

/// Opaque tokens identifying the relay account and template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RelayConfig {
    pub service_id: Option<String>,
    pub template_id: Option<String>,
    pub public_key: Option<String>,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        RelayConfig {
            service_id: None,
            template_id: None,
            public_key: None,
            endpoint: DEFAULT_RELAY_ENDPOINT.to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Serialize)]
struct TemplateParams<'a> {
    from_name: &'a str,
    from_email: &'a str,
    message: &'a str,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: TemplateParams<'a>,
}

/// EmailJS-compatible HTTP relay
#[derive(Debug)]
pub struct EmailJsRelay {
    service_id: String,
    template_id: String,
    public_key: String,
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl EmailJsRelay {
    pub fn from_config(config: &RelayConfig) -> Result<Self, RelayError> {
        let token = |value: &Option<String>, name: &'static str| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or(RelayError::MissingToken(name))
        };
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(EmailJsRelay {
            service_id: token(&config.service_id, "service_id")?,
            template_id: token(&config.template_id, "template_id")?,
            public_key: token(&config.public_key, "public_key")?,
            endpoint: config.endpoint.clone(),
            client,
        })
    }

    fn request_body<'a>(&'a self, form: &'a ContactForm) -> SendRequest<'a> {
        SendRequest {
            service_id: &self.service_id,
            template_id: &self.template_id,
            user_id: &self.public_key,
            template_params: TemplateParams {
                from_name: form.name.trim(),
                from_email: form.email.trim(),
                message: form.message.trim(),
            },
        }
    }
}

impl EmailRelay for EmailJsRelay {
    fn send(&self, form: &ContactForm) -> Result<(), RelayError> {
        tracing::debug!("posting contact form to {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&self.request_body(form))
            .send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().unwrap_or_default();
        Err(RelayError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

/// Form state plus the outcome of the last submission
pub struct ContactController<R> {
    relay: Arc<R>,
    form: ContactForm,
    status: SubmissionStatus,
    pending: Option<Receiver<Result<(), RelayError>>>,
}

impl<R: EmailRelay> ContactController<R> {
    pub fn new(relay: R) -> Self {
        ContactController {
            relay: Arc::new(relay),
            form: ContactForm::default(),
            status: SubmissionStatus::Idle,
            pending: None,
        }
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ContactForm {
        &mut self.form
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn is_sending(&self) -> bool {
        self.pending.is_some()
    }

    /// One attempt; a failure leaves the form intact for a manual resubmit
    pub fn submit(&mut self) -> &SubmissionStatus {
        if self.is_sending() {
            return &self.status;
        }
        let outcome = self.form.validate().and_then(|_| self.relay.send(&self.form));
        self.finish(outcome);
        &self.status
    }

    /// Leaves a sent status behind; an in-flight send keeps `Sending`
    pub fn reset_status(&mut self) {
        if !self.is_sending() {
            self.status = SubmissionStatus::Idle;
        }
    }

    /// Collects the result of a background send if it has arrived
    pub fn poll(&mut self) -> &SubmissionStatus {
        let Some(rx) = &self.pending else {
            return &self.status;
        };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return &self.status,
            Err(TryRecvError::Disconnected) => Err(RelayError::Unavailable("send worker exited".into())),
        };
        self.pending = None;
        self.finish(outcome);
        &self.status
    }

    fn finish(&mut self, outcome: Result<(), RelayError>) {
        self.status = match outcome {
            Ok(()) => {
                tracing::info!("contact message sent");
                self.form.clear();
                SubmissionStatus::Success
            }
            Err(e) => {
                tracing::warn!("contact submission failed: {}", e);
                SubmissionStatus::Error(e.to_string())
            }
        };
    }
}

impl<R: EmailRelay + Send + Sync + 'static> ContactController<R> {
    /// Validates now and sends on a worker thread; [`poll`](Self::poll)
    /// picks up the outcome
    pub fn submit_in_background(&mut self) -> &SubmissionStatus {
        if self.is_sending() {
            return &self.status;
        }
        if let Err(e) = self.form.validate() {
            self.finish(Err(e));
            return &self.status;
        }

        let (tx, rx) = mpsc::channel();
        let relay = Arc::clone(&self.relay);
        let form = self.form.clone();
        thread::spawn(move || {
            // the receiver may be gone if the page quit mid-send
            let _ = tx.send(relay.send(&form));
        });
        tracing::debug!("contact message queued");
        self.pending = Some(rx);
        self.status = SubmissionStatus::Sending;
        &self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    struct FakeRelay {
        fail: bool,
        calls: Cell<usize>,
    }

    impl EmailRelay for FakeRelay {
        fn send(&self, _form: &ContactForm) -> Result<(), RelayError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                Err(RelayError::Rejected {
                    status: 400,
                    body: "bad template".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn controller(fail: bool) -> ContactController<FakeRelay> {
        let mut c = ContactController::new(FakeRelay {
            fail,
            calls: Cell::new(0),
        });
        *c.form_mut() = ContactForm::new("Ada", "ada@example.com", "Hello there");
        c
    }

    #[test]
    fn validation() {
        assert!(ContactForm::new("Ada", "ada@example.com", "hi").validate().is_ok());
        assert!(ContactForm::new(" ", "ada@example.com", "hi").validate().is_err());
        assert!(ContactForm::new("Ada", "ada@example.com", "").validate().is_err());
        for bad in ["ada", "@example.com", "ada@", "ada@localhost", "a@b@c.d", "ada @x.io", "ada@x..io"] {
            assert!(ContactForm::new("Ada", bad, "hi").validate().is_err(), "{bad}");
        }
    }

    #[test]
    fn success_clears_form() {
        let mut c = controller(false);
        assert_eq!(c.status(), &SubmissionStatus::Idle);
        assert_eq!(c.submit(), &SubmissionStatus::Success);
        assert_eq!(c.form(), &ContactForm::default());
        c.reset_status();
        assert_eq!(c.status(), &SubmissionStatus::Idle);
    }

    #[test]
    fn failure_keeps_form_and_does_not_retry() {
        let mut c = controller(true);
        assert!(matches!(c.submit(), SubmissionStatus::Error(_)));
        assert_eq!(c.relay.calls.get(), 1);
        assert_eq!(c.form().name, "Ada");
    }

    #[test]
    fn invalid_form_never_reaches_relay() {
        let mut c = controller(false);
        c.form_mut().email = "nope".into();
        assert!(matches!(c.submit(), SubmissionStatus::Error(_)));
        assert_eq!(c.relay.calls.get(), 0);
    }

    #[test]
    fn disabled_relay_reports_reason() {
        let mut c = ContactController::new(DisabledRelay("missing service_id".into()));
        *c.form_mut() = ContactForm::new("Ada", "ada@example.com", "Hello");
        match c.submit() {
            SubmissionStatus::Error(reason) => assert!(reason.contains("missing service_id")),
            other => panic!("unexpected {other:?}"),
        }
    }

    struct ThreadedRelay {
        calls: AtomicUsize,
    }

    impl EmailRelay for ThreadedRelay {
        fn send(&self, _form: &ContactForm) -> Result<(), RelayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn wait_for_outcome<R: EmailRelay>(c: &mut ContactController<R>) -> SubmissionStatus {
        let deadline = Instant::now() + Duration::from_secs(5);
        while c.poll() == &SubmissionStatus::Sending {
            assert!(Instant::now() < deadline, "send never finished");
            thread::sleep(Duration::from_millis(5));
        }
        c.status().clone()
    }

    #[test]
    fn background_send_reports_through_poll() {
        let mut c = ContactController::new(ThreadedRelay { calls: AtomicUsize::new(0) });
        *c.form_mut() = ContactForm::new("Ada", "ada@example.com", "Hello there");
        assert_eq!(c.submit_in_background(), &SubmissionStatus::Sending);
        assert!(c.is_sending());

        // a second press while in flight is ignored, as is a status reset
        c.submit_in_background();
        c.reset_status();
        assert_eq!(c.status(), &SubmissionStatus::Sending);

        assert_eq!(wait_for_outcome(&mut c), SubmissionStatus::Success);
        assert_eq!(c.relay.calls.load(Ordering::SeqCst), 1);
        assert_eq!(c.form(), &ContactForm::default());
        assert!(!c.is_sending());
    }

    #[test]
    fn background_send_validates_up_front() {
        let mut c = ContactController::new(ThreadedRelay { calls: AtomicUsize::new(0) });
        *c.form_mut() = ContactForm::new("Ada", "nope", "Hello");
        assert!(matches!(c.submit_in_background(), SubmissionStatus::Error(_)));
        assert!(!c.is_sending());
        assert_eq!(c.relay.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn field_access() {
        let mut form = ContactForm::default();
        form.field_mut(FormField::Email).push_str("a@b.co");
        assert_eq!(form.field(FormField::Email), "a@b.co");
        assert_eq!(FormField::Message.next(), FormField::Name);
    }

    #[test]
    fn missing_tokens_are_reported() {
        let config = RelayConfig {
            service_id: Some("svc".into()),
            template_id: Some("  ".into()),
            ..RelayConfig::default()
        };
        assert!(matches!(
            EmailJsRelay::from_config(&config),
            Err(RelayError::MissingToken("template_id"))
        ));
    }

    #[test]
    fn request_body_shape() {
        let relay = EmailJsRelay::from_config(&RelayConfig {
            service_id: Some("svc".into()),
            template_id: Some("tpl".into()),
            public_key: Some("key".into()),
            ..RelayConfig::default()
        })
        .unwrap();
        let form = ContactForm::new(" Ada ", "ada@example.com", "Hi");
        let json = serde_json::to_value(relay.request_body(&form)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "service_id": "svc",
                "template_id": "tpl",
                "user_id": "key",
                "template_params": {
                    "from_name": "Ada",
                    "from_email": "ada@example.com",
                    "message": "Hi"
                }
            })
        );
    }
}

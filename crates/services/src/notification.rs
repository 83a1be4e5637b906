use aireach_config::EmailSettings;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("SendGrid API error: {0}")]
    Api(String),
    #[error("Mail provider rejected message: status {0}")]
    Rejected(u16),
}

/// What the email is about; selects subject and body templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailKind {
    Registration,
    Reminder,
}

/// Template context shared by both email kinds.
#[derive(Debug, Clone)]
pub struct EmailContext {
    pub webinar_title: String,
    pub webinar_date: String,
    pub webinar_time: String,
    pub join_link: String,
}

#[derive(Serialize)]
struct MailSendBody<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Serialize)]
struct Address<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    content_type: &'a str,
    value: &'a str,
}

/// Transactional email over the SendGrid v3 mail-send API.
///
/// Delivery is strictly best-effort: callers on the registration/join path
/// must use [`Notifier::dispatch`], which detaches the send so provider
/// latency or failure can never abort the operation that triggered it.
#[derive(Clone)]
pub struct Notifier {
    settings: EmailSettings,
    client: reqwest::Client,
}

impl Notifier {
    pub fn new(settings: &EmailSettings) -> Self {
        Self {
            settings: settings.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// Fire-and-forget send. Failures are logged and swallowed.
    pub fn dispatch(&self, kind: EmailKind, to: String, context: EmailContext) {
        let notifier = self.clone();
        tokio::spawn(async move {
            if let Err(e) = notifier.send(kind, &to, &context).await {
                warn!(?kind, to = %to, error = %e, "Email dispatch failed");
            }
        });
    }

    pub async fn send(
        &self,
        kind: EmailKind,
        to: &str,
        context: &EmailContext,
    ) -> Result<(), NotifyError> {
        let Some(ref api_key) = self.settings.api_key else {
            warn!("email.api_key is not set; email will not be sent");
            return Ok(());
        };

        let (subject, text, html) = match kind {
            EmailKind::Registration => registration_message(context),
            EmailKind::Reminder => reminder_message(context),
        };

        let body = MailSendBody {
            personalizations: vec![Personalization {
                to: vec![Address { email: to, name: None }],
            }],
            from: Address {
                email: &self.settings.from_address,
                name: Some(&self.settings.from_name),
            },
            subject: &subject,
            content: vec![
                Content {
                    content_type: "text/plain",
                    value: &text,
                },
                Content {
                    content_type: "text/html",
                    value: &html,
                },
            ],
        };

        let resp = self
            .client
            .post("https://api.sendgrid.com/v3/mail/send")
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| NotifyError::Api(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(NotifyError::Rejected(resp.status().as_u16()));
        }

        info!(?kind, to = %to, "Email sent");
        Ok(())
    }
}

fn registration_message(ctx: &EmailContext) -> (String, String, String) {
    let subject = format!("You're Registered: {}", ctx.webinar_title);
    let text = format!(
        "Thank you for registering for \"{}\" on {} at {}.\n\n\
         Please use this link to join the webinar: {}\n\n\
         We look forward to seeing you there!",
        ctx.webinar_title, ctx.webinar_date, ctx.webinar_time, ctx.join_link
    );
    let html = format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
           <h2>You're Registered!</h2>\
           <p>Thank you for registering for <strong>{}</strong> on <strong>{} at {}</strong>.</p>\
           <p><strong>Join Link:</strong> <a href=\"{}\">{}</a></p>\
           <p>We look forward to seeing you there!</p>\
         </div>",
        ctx.webinar_title, ctx.webinar_date, ctx.webinar_time, ctx.join_link, ctx.join_link
    );
    (subject, text, html)
}

fn reminder_message(ctx: &EmailContext) -> (String, String, String) {
    let subject = format!("Starting Soon: {}", ctx.webinar_title);
    let text = format!(
        "\"{}\" starts on {} at {}.\n\n\
         Join here: {}",
        ctx.webinar_title, ctx.webinar_date, ctx.webinar_time, ctx.join_link
    );
    let html = format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
           <h2>Your webinar is starting soon</h2>\
           <p><strong>{}</strong> starts on <strong>{} at {}</strong>.</p>\
           <p><strong>Join Link:</strong> <a href=\"{}\">{}</a></p>\
         </div>",
        ctx.webinar_title, ctx.webinar_date, ctx.webinar_time, ctx.join_link, ctx.join_link
    );
    (subject, text, html)
}

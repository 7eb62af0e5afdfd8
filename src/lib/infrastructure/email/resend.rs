//! Resend HTTP API mailer

use std::{fmt, time::Duration};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::domain::communication::mailer::{Mailer, MailerError, Message, SendOutcome};

/// Production Resend endpoint
pub const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com";

/// Tag value used when a message has no campaign; never sent.
const NO_CAMPAIGN: &str = "manual";

/// Tag value used when a message has no contact; never sent.
const NO_CONTACT: &str = "unknown";

/// Request body of `POST /emails`
#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: String,
    to: [&'a str; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    tags: Vec<Tag<'a>>,
}

#[derive(Debug, Serialize)]
struct Tag<'a> {
    name: &'static str,
    value: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: Option<String>,
}

impl<'a> From<&'a Message> for SendEmailRequest<'a> {
    fn from(message: &'a Message) -> Self {
        Self {
            from: message.formatted_sender(),
            to: [message.to.as_str()],
            reply_to: message.reply_to.as_ref().map(|address| address.as_str()),
            subject: &message.subject,
            html: &message.html_body,
            text: message.plain_body.as_deref(),
            tags: tags(message),
        }
    }
}

/// Correlation tags for a message, minus the "no campaign"/"no contact" placeholders.
fn tags(message: &Message) -> Vec<Tag<'_>> {
    let campaign_id = non_empty(&message.campaign_id).unwrap_or(NO_CAMPAIGN);
    let contact_id = non_empty(&message.contact_id).unwrap_or(NO_CONTACT);

    [("campaign_id", campaign_id), ("contact_id", contact_id)]
        .into_iter()
        .filter(|(_, value)| *value != NO_CAMPAIGN && *value != NO_CONTACT)
        .map(|(name, value)| Tag { name, value })
        .collect()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Mailer backed by the Resend HTTP API, one request per message
#[derive(Clone)]
pub struct ResendMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl ResendMailer {
    /// Create a new Resend mailer
    ///
    /// # Arguments
    /// * `base_url` - The API base URL, e.g. [`DEFAULT_RESEND_API_URL`].
    /// * `api_key` - The bearer token.
    /// * `timeout` - Upper bound for a single API call.
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, MailerError> {
        if api_key.trim().is_empty() {
            return Err(MailerError::MissingApiKey("Resend"));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/emails", base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
        })
    }
}

impl fmt::Debug for ResendMailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResendMailer")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    #[mutants::skip]
    async fn send_email(&self, message: &Message) -> SendOutcome {
        debug!(to = %message.to, subject = %message.subject, "sending email via Resend");

        let response = match self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&SendEmailRequest::from(message))
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                error!(to = %message.to, "Resend request failed: {}", err);
                return SendOutcome::failed(err.to_string());
            }
        };

        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|err| format!("{status}: {err}"));
            warn!(to = %message.to, %status, "Resend rejected email: {}", body);

            return SendOutcome::failed(body);
        }

        match response.json::<SendEmailResponse>().await {
            Ok(body) => SendOutcome::Sent {
                message_id: body.id,
            },
            Err(err) => {
                error!(to = %message.to, "could not parse Resend response: {}", err);
                SendOutcome::failed(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };
    use wiremock::{
        matchers::{body_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use crate::domain::communication::email_addresses::EmailAddress;

    use super::*;

    fn message() -> Message {
        Message::new(
            EmailAddress::new("a@b.com").expect("valid recipient"),
            EmailAddress::new("news@example.com").expect("valid sender"),
            "Hi",
            "<p>hi</p>",
        )
    }

    fn mailer(server: &MockServer) -> ResendMailer {
        ResendMailer::new(&server.uri(), "re_test", Duration::from_secs(5))
            .expect("valid mailer config")
    }

    #[tokio::test]
    async fn test_successful_send_returns_message_id() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(header("Authorization", "Bearer re_test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "msg_123" })))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = mailer(&server).send_email(&message()).await;

        assert_eq!(outcome, SendOutcome::sent("msg_123"));

        Ok(())
    }

    #[tokio::test]
    async fn test_payload_shape() -> TestResult {
        let server = MockServer::start().await;

        let message = message()
            .with_from_name("Example News")
            .with_reply_to(EmailAddress::new("support@example.com")?)
            .with_plain_body("hi")
            .with_campaign_id("cmp_1")
            .with_contact_id("ct_9");

        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(body_json(json!({
                "from": "Example News <news@example.com>",
                "to": ["a@b.com"],
                "reply_to": "support@example.com",
                "subject": "Hi",
                "html": "<p>hi</p>",
                "text": "hi",
                "tags": [
                    { "name": "campaign_id", "value": "cmp_1" },
                    { "name": "contact_id", "value": "ct_9" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "msg_1" })))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = mailer(&server).send_email(&message).await;

        assert!(outcome.is_success());

        Ok(())
    }

    #[tokio::test]
    async fn test_payload_omits_missing_fields_and_placeholder_tags() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(body_json(json!({
                "from": "news@example.com",
                "to": ["a@b.com"],
                "subject": "Hi",
                "html": "<p>hi</p>",
                "tags": []
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "msg_1" })))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = mailer(&server)
            .send_email(&message().with_campaign_id("manual"))
            .await;

        assert!(outcome.is_success());

        Ok(())
    }

    #[test]
    fn test_tags_skip_empty_and_placeholder_values() -> TestResult {
        let message = message().with_campaign_id("").with_contact_id("unknown");

        assert!(tags(&message).is_empty());

        let message = message.with_campaign_id("cmp_1");
        let tags = tags(&message);

        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "campaign_id");
        assert_eq!(tags[0].value, "cmp_1");

        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_send_carries_response_body() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(
                ResponseTemplate::new(422).set_body_string(r#"{"message":"Invalid `to` field"}"#),
            )
            .mount(&server)
            .await;

        let outcome = mailer(&server).send_email(&message()).await;

        assert_eq!(
            outcome,
            SendOutcome::failed(r#"{"message":"Invalid `to` field"}"#)
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_unreadable_rejection_body_keeps_status() -> TestResult {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let address = listener.local_addr()?;

        tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };

            let mut request = Vec::new();
            let mut buffer = [0u8; 4096];

            while !request_complete(&request) {
                match socket.read(&mut buffer).await {
                    Ok(0) | Err(_) => return,
                    Ok(read) => request.extend_from_slice(&buffer[..read]),
                }
            }

            let _ = socket
                .write_all(b"HTTP/1.1 500 Internal Server Error\r\ncontent-length: 100\r\n\r\ncut")
                .await;
        });

        let mailer = ResendMailer::new(&format!("http://{address}"), "re_test", Duration::from_secs(5))?;
        let outcome = mailer.send_email(&message()).await;

        assert!(!outcome.is_success());
        assert!(outcome
            .error()
            .is_some_and(|error| error.starts_with("500 Internal Server Error: ")));

        Ok(())
    }

    /// Whether `request` holds the full headers and `content-length` bytes of body.
    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);

        let Some(end) = text.find("\r\n\r\n") else {
            return false;
        };

        let length = text[..end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);

        request.len() >= end + 4 + length
    }

    #[tokio::test]
    async fn test_unparseable_success_response_is_a_failure() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let outcome = mailer(&server).send_email(&message()).await;

        assert!(!outcome.is_success());
        assert!(outcome.error().is_some_and(|error| !error.is_empty()));

        Ok(())
    }

    #[tokio::test]
    async fn test_success_without_id() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let outcome = mailer(&server).send_email(&message()).await;

        assert_eq!(outcome, SendOutcome::Sent { message_id: None });

        Ok(())
    }

    #[tokio::test]
    async fn test_timeout_is_a_failure() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "id": "late" }))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let mailer = ResendMailer::new(&server.uri(), "re_test", Duration::from_millis(50))?;
        let outcome = mailer.send_email(&message()).await;

        assert!(!outcome.is_success());

        Ok(())
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_failure() -> TestResult {
        let mailer = ResendMailer::new("http://127.0.0.1:1", "re_test", Duration::from_secs(1))?;
        let outcome = mailer.send_email(&message()).await;

        assert!(!outcome.is_success());

        Ok(())
    }

    #[test]
    fn test_blank_api_key_is_rejected() {
        let result = ResendMailer::new(DEFAULT_RESEND_API_URL, " ", Duration::from_secs(1));

        assert!(matches!(result, Err(MailerError::MissingApiKey(_))));
    }

    #[test]
    fn test_debug_redacts_api_key() -> TestResult {
        let mailer = ResendMailer::new("https://api.example.com/", "re_secret", Duration::from_secs(1))?;
        let debug = format!("{:?}", mailer);

        assert!(debug.contains("https://api.example.com/emails"));
        assert!(!debug.contains("re_secret"));

        Ok(())
    }
}

use keyforge_core::{Email, EmailClient};
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, Secret};

/// Sends password-reset mail through the Postmark HTTP API. The reset link
/// is composed here; the flow only supplies the recipient and the token.
#[derive(Clone)]
pub struct PostmarkEmailClient {
    http_client: Client,
    base_url: String,
    sender: Email,
    authorization_token: Secret<String>,
    reset_base_url: String,
}

impl PostmarkEmailClient {
    pub fn new(
        base_url: String,
        sender: Email,
        authorization_token: Secret<String>,
        reset_base_url: String,
        http_client: Client,
    ) -> Self {
        Self {
            http_client,
            base_url,
            sender,
            authorization_token,
            reset_base_url,
        }
    }
}

#[async_trait::async_trait]
impl EmailClient for PostmarkEmailClient {
    #[tracing::instrument(name = "Sending password reset email", skip_all, fields(recipient = %recipient))]
    async fn send_password_reset(
        &self,
        recipient: &Email,
        reset_token: &str,
    ) -> Result<(), String> {
        let base = Url::parse(&self.base_url).map_err(|e| e.to_string())?;
        let url = base.join("/email").map_err(|e| e.to_string())?;

        let reset_link = format!("{}{}", self.reset_base_url, reset_token);
        let body = RESET_BODY.replace(RESET_LINK_PLACEHOLDER, &reset_link);

        let request_body = SendEmailRequest {
            from: self.sender.as_str(),
            to: recipient.as_str(),
            subject: RESET_SUBJECT,
            html_body: &body,
            text_body: &body,
            message_stream: MESSAGE_STREAM,
        };

        let request = self
            .http_client
            .post(url)
            .header(
                POSTMARK_AUTH_HEADER,
                self.authorization_token.expose_secret(),
            )
            .json(&request_body);

        request
            .send()
            .await
            .map_err(|e| e.to_string())?
            .error_for_status()
            .map_err(|e| e.to_string())?;

        tracing::info!(recipient = %recipient, "password reset email sent");
        Ok(())
    }
}

const MESSAGE_STREAM: &str = "outbound";
const POSTMARK_AUTH_HEADER: &str = "X-Postmark-Server-Token";

const RESET_SUBJECT: &str = "Reset Your Password";
const RESET_LINK_PLACEHOLDER: &str = "#RESET_LINK";
const RESET_BODY: &str = "Hello,\n\n\
    We received a request to reset your password. Please click the link below to reset your password:\n\n\
    #RESET_LINK\n\n\
    If you didn't request this, please ignore this email.\n\n\
    Thanks,\n\
    The Keyforge Team\n";

#[derive(serde::Serialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html_body: &'a str,
    text_body: &'a str,
    message_stream: &'a str,
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    use super::*;

    fn client(base_url: String) -> PostmarkEmailClient {
        PostmarkEmailClient::new(
            base_url,
            Email::parse("noreply@example.com").unwrap(),
            Secret::from("server-token".to_owned()),
            "http://localhost:8080/reset-password?token=".to_owned(),
            Client::new(),
        )
    }

    #[tokio::test]
    async fn sends_the_expected_postmark_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/email"))
            .and(header_exists("X-Postmark-Server-Token"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client(server.uri())
            .send_password_reset(&Email::parse("user@example.com").unwrap(), "reset-token-123")
            .await
            .unwrap();

        let request: &Request = &server.received_requests().await.unwrap()[0];
        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(body["To"], "user@example.com");
        assert_eq!(body["Subject"], "Reset Your Password");
        assert!(
            body["TextBody"]
                .as_str()
                .unwrap()
                .contains("reset-password?token=reset-token-123")
        );
    }

    #[tokio::test]
    async fn a_server_error_surfaces_as_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/email"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = client(server.uri())
            .send_password_reset(&Email::parse("user@example.com").unwrap(), "reset-token-123")
            .await;
        assert!(result.is_err());
    }
}

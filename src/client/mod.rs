//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::domain::{
    AccountSid, AuthToken, CreateMessage, ErrorCode, MessageResource, ValidationError,
};

const DEFAULT_BASE_URL: &str = "https://api.twilio.com";
const API_VERSION: &str = "2010-04-01";

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        auth: &'a Auth,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        auth: &'a Auth,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self
                .client
                .post(url)
                .basic_auth(auth.account_sid.as_str(), Some(auth.auth_token.as_str()))
                .form(&params)
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, Clone)]
/// Twilio account credentials, sent as HTTP basic auth.
pub struct Auth {
    account_sid: AccountSid,
    auth_token: AuthToken,
}

impl Auth {
    /// Validate both parts and build [`Auth`].
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            account_sid: AccountSid::new(account_sid)?,
            auth_token: AuthToken::new(auth_token)?,
        })
    }

    pub fn account_sid(&self) -> &AccountSid {
        &self.account_sid
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`TwilioClient`].
///
/// This error preserves:
/// - HTTP-level failures (non-2xx status or transport failures),
/// - API-level failures (Twilio error documents),
/// - validation/parse failures.
pub enum TwilioError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {}", error_chain(.0.as_ref()))]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code without a Twilio error document.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// Twilio rejected the request. Displays Twilio's own message verbatim.
    #[error("{message}")]
    Api {
        status: u16,
        code: Option<ErrorCode>,
        message: String,
        more_info: Option<String>,
    },

    /// Response body could not be parsed as the expected format.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// The configured base URL is not a valid URL.
    #[error("invalid base URL: {0}")]
    Url(#[from] url::ParseError),

    /// The configured base URL cannot carry a path (e.g. `mailto:`).
    #[error("base URL cannot be used for API requests: {0}")]
    InvalidBaseUrl(String),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl TwilioError {
    /// Twilio error code, when the failure came with one.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Api { code, .. } => *code,
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
/// Builder for [`TwilioClient`].
///
/// Use this when you need to customize the base URL, timeout, or user-agent.
pub struct TwilioClientBuilder {
    auth: Auth,
    base_url: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl TwilioClientBuilder {
    /// Create a builder with the default base URL and no timeout/user-agent override.
    pub fn new(auth: Auth) -> Self {
        Self {
            auth,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Override the API base URL (scheme, host and optional path prefix).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`TwilioClient`].
    ///
    /// Fails if the base URL does not parse or the HTTP client cannot be created.
    pub fn build(self) -> Result<TwilioClient, TwilioError> {
        let messages_url = messages_url(&self.base_url, &self.auth.account_sid)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| TwilioError::Transport(Box::new(err)))?;

        Ok(TwilioClient {
            auth: self.auth,
            messages_url,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// High-level Twilio Messages API client.
///
/// Sends form-encoded requests to
/// `{base}/2010-04-01/Accounts/{AccountSid}/Messages.json` authenticated with
/// HTTP basic auth, and decodes the JSON reply.
pub struct TwilioClient {
    auth: Auth,
    messages_url: Url,
    http: Arc<dyn HttpTransport>,
}

impl TwilioClient {
    /// Create a client against `https://api.twilio.com`.
    ///
    /// For more customization, use [`TwilioClient::builder`].
    pub fn new(auth: Auth) -> Result<Self, TwilioError> {
        TwilioClientBuilder::new(auth).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(auth: Auth) -> TwilioClientBuilder {
        TwilioClientBuilder::new(auth)
    }

    /// Endpoint used by [`TwilioClient::create_message`].
    pub fn messages_url(&self) -> &Url {
        &self.messages_url
    }

    /// Send one SMS through Twilio.
    ///
    /// Errors:
    /// - [`TwilioError::Transport`] when the request could not be sent,
    /// - [`TwilioError::Api`] when Twilio answers with an error document,
    /// - [`TwilioError::HttpStatus`] for other non-2xx responses,
    /// - [`TwilioError::Parse`] when a 2xx body is not a message resource.
    pub async fn create_message(
        &self,
        request: CreateMessage,
    ) -> Result<MessageResource, TwilioError> {
        let params = crate::transport::encode_create_message_form(&request);
        tracing::debug!(to = request.to().as_str(), "creating Twilio message");

        let response = self
            .http
            .post_form(self.messages_url.as_str(), &self.auth, params)
            .await
            .map_err(TwilioError::Transport)?;

        if !(200..=299).contains(&response.status) {
            if let Some(api_error) = crate::transport::decode_api_error_json(&response.body) {
                return Err(TwilioError::Api {
                    status: response.status,
                    code: api_error.code.map(ErrorCode::new),
                    message: api_error.message,
                    more_info: api_error.more_info,
                });
            }
            let body = if response.body.trim().is_empty() {
                None
            } else {
                Some(response.body)
            };
            return Err(TwilioError::HttpStatus {
                status: response.status,
                body,
            });
        }

        let resource = crate::transport::decode_message_json_response(&response.body)
            .map_err(|err| TwilioError::Parse(Box::new(err)))?;

        if let Some(status) = resource.status.as_ref().filter(|status| status.is_failure()) {
            tracing::warn!(
                sid = resource.sid.as_str(),
                status = status.as_str(),
                error_code = resource.error_code.map(ErrorCode::as_i64),
                "Twilio accepted the message but reports it as failed"
            );
        }

        Ok(resource)
    }
}

/// Render an error followed by each of its sources, `outer: inner: root`.
fn error_chain(err: &(dyn StdError + Send + Sync + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

fn messages_url(base_url: &str, account_sid: &AccountSid) -> Result<Url, TwilioError> {
    let mut url = Url::parse(base_url)?;
    url.path_segments_mut()
        .map_err(|()| TwilioError::InvalidBaseUrl(base_url.to_owned()))?
        .pop_if_empty()
        .extend([
            API_VERSION,
            "Accounts",
            account_sid.as_str(),
            "Messages.json",
        ]);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use crate::domain::{KnownErrorCode, MessageBody, Recipient, Sender};

    use super::*;

    #[derive(Debug, Clone)]
    struct FakeTransport {
        state: Arc<Mutex<FakeTransportState>>,
    }

    #[derive(Debug)]
    struct FakeTransportState {
        last_url: Option<String>,
        last_credentials: Option<(String, String)>,
        last_params: Vec<(String, String)>,
        response_status: u16,
        response_body: String,
    }

    impl FakeTransport {
        fn new(response_status: u16, response_body: impl Into<String>) -> Self {
            Self {
                state: Arc::new(Mutex::new(FakeTransportState {
                    last_url: None,
                    last_credentials: None,
                    last_params: Vec::new(),
                    response_status,
                    response_body: response_body.into(),
                })),
            }
        }

        fn last_request(&self) -> (Option<String>, Vec<(String, String)>) {
            let state = self.state.lock().unwrap();
            (state.last_url.clone(), state.last_params.clone())
        }

        fn last_credentials(&self) -> Option<(String, String)> {
            self.state.lock().unwrap().last_credentials.clone()
        }
    }

    impl HttpTransport for FakeTransport {
        fn post_form<'a>(
            &'a self,
            url: &'a str,
            auth: &'a Auth,
            params: Vec<(String, String)>,
        ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
            Box::pin(async move {
                let (status, body) = {
                    let mut state = self.state.lock().unwrap();
                    state.last_url = Some(url.to_owned());
                    state.last_credentials = Some((
                        auth.account_sid.as_str().to_owned(),
                        auth.auth_token.as_str().to_owned(),
                    ));
                    state.last_params = params;
                    (state.response_status, state.response_body.clone())
                };
                Ok(HttpResponse { status, body })
            })
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("error sending request")]
    struct SendFailure(#[source] std::io::Error);

    struct NestedFailingTransport;

    impl HttpTransport for NestedFailingTransport {
        fn post_form<'a>(
            &'a self,
            _url: &'a str,
            _auth: &'a Auth,
            _params: Vec<(String, String)>,
        ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
            Box::pin(async move {
                let cause = std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "connection refused",
                );
                Err(Box::new(SendFailure(cause)) as Box<dyn StdError + Send + Sync>)
            })
        }
    }

    struct FailingTransport;

    impl HttpTransport for FailingTransport {
        fn post_form<'a>(
            &'a self,
            _url: &'a str,
            _auth: &'a Auth,
            _params: Vec<(String, String)>,
        ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
            Box::pin(async move { Err("connection refused".into()) })
        }
    }

    fn assert_param(params: &[(String, String)], key: &str, value: &str) {
        assert!(
            params.iter().any(|(k, v)| k == key && v == value),
            "missing param {key}={value}; got: {params:?}"
        );
    }

    fn make_client(http: Arc<dyn HttpTransport>) -> TwilioClient {
        let auth = Auth::new("AC123", "token").unwrap();
        let messages_url = messages_url("https://example.invalid", &auth.account_sid).unwrap();
        TwilioClient {
            auth,
            messages_url,
            http,
        }
    }

    fn request() -> CreateMessage {
        CreateMessage::new(
            Recipient::new("+15551234567").unwrap(),
            Sender::new("+15557654321").unwrap(),
            MessageBody::new("help").unwrap(),
        )
    }

    #[tokio::test]
    async fn create_message_posts_form_with_basic_auth() {
        let json = r#"{"sid": "SM123", "status": "queued", "to": "+15551234567"}"#;
        let transport = FakeTransport::new(201, json);
        let client = make_client(Arc::new(transport.clone()));

        let resource = client.create_message(request()).await.unwrap();
        assert_eq!(resource.sid.as_str(), "SM123");

        let (url, params) = transport.last_request();
        assert_eq!(
            url.as_deref(),
            Some("https://example.invalid/2010-04-01/Accounts/AC123/Messages.json")
        );
        assert_param(&params, "To", "+15551234567");
        assert_param(&params, "From", "+15557654321");
        assert_param(&params, "Body", "help");
        assert_eq!(
            transport.last_credentials(),
            Some(("AC123".to_owned(), "token".to_owned()))
        );
    }

    #[tokio::test]
    async fn create_message_forwards_recipient_verbatim() {
        let transport = FakeTransport::new(201, r#"{"sid": "SM123"}"#);
        let client = make_client(Arc::new(transport.clone()));
        let request = CreateMessage::new(
            Recipient::new(" +15551234567\n").unwrap(),
            Sender::new("+15557654321").unwrap(),
            MessageBody::new("help").unwrap(),
        );

        client.create_message(request).await.unwrap();

        let (_, params) = transport.last_request();
        assert_param(&params, "To", " +15551234567\n");
    }

    #[tokio::test]
    async fn create_message_returns_sid_even_when_reported_failed() {
        let json = r#"{"sid": "SM123", "status": "failed", "error_code": 30008}"#;
        let client = make_client(Arc::new(FakeTransport::new(201, json)));

        let resource = client.create_message(request()).await.unwrap();
        assert_eq!(resource.sid.as_str(), "SM123");
        assert!(resource.status.unwrap().is_failure());
        assert_eq!(resource.error_code, Some(ErrorCode::new(30008)));
    }

    #[tokio::test]
    async fn create_message_maps_error_document_to_api_error() {
        let json = r#"
        {
          "code": 21211,
          "message": "Invalid 'To' Phone Number",
          "more_info": "https://www.twilio.com/docs/errors/21211",
          "status": 400
        }
        "#;
        let client = make_client(Arc::new(FakeTransport::new(400, json)));

        let err = client.create_message(request()).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid 'To' Phone Number");
        assert_eq!(
            err.code().and_then(ErrorCode::known_kind),
            Some(KnownErrorCode::InvalidToNumber)
        );
        match err {
            TwilioError::Api { status, .. } => assert_eq!(status, 400),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_message_maps_non_success_http_status() {
        let client = make_client(Arc::new(FakeTransport::new(502, "Bad Gateway")));

        let err = client.create_message(request()).await.unwrap_err();
        assert!(matches!(
            err,
            TwilioError::HttpStatus {
                status: 502,
                body: Some(_)
            }
        ));
        assert!(err.code().is_none());
    }

    #[tokio::test]
    async fn create_message_maps_empty_http_body_to_none() {
        let client = make_client(Arc::new(FakeTransport::new(503, "   ")));

        let err = client.create_message(request()).await.unwrap_err();
        assert!(matches!(
            err,
            TwilioError::HttpStatus {
                status: 503,
                body: None
            }
        ));
    }

    #[tokio::test]
    async fn create_message_maps_invalid_json_to_parse_error() {
        let client = make_client(Arc::new(FakeTransport::new(201, "{ not json }")));

        let err = client.create_message(request()).await.unwrap_err();
        assert!(matches!(err, TwilioError::Parse(_)));
    }

    #[tokio::test]
    async fn create_message_maps_transport_failure() {
        let client = make_client(Arc::new(FailingTransport));

        let err = client.create_message(request()).await.unwrap_err();
        assert!(matches!(err, TwilioError::Transport(_)));
        assert_eq!(err.to_string(), "transport error: connection refused");
    }

    #[tokio::test]
    async fn transport_error_display_includes_source_chain() {
        let client = make_client(Arc::new(NestedFailingTransport));

        let err = client.create_message(request()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "transport error: error sending request: connection refused"
        );
    }

    #[test]
    fn auth_constructor_validates_inputs() {
        assert!(Auth::new("   ", "token").is_err());
        assert!(Auth::new("AC123", "").is_err());
        assert_eq!(
            Auth::new(" AC123 ", "t").unwrap().account_sid().as_str(),
            "AC123"
        );
    }

    #[test]
    fn builder_base_url_override_is_applied() {
        let client = TwilioClient::builder(Auth::new("AC123", "token").unwrap())
            .base_url("http://127.0.0.1:8080/mock/")
            .timeout(Duration::from_secs(5))
            .user_agent("sos-relay-test")
            .build()
            .unwrap();
        assert_eq!(
            client.messages_url().as_str(),
            "http://127.0.0.1:8080/mock/2010-04-01/Accounts/AC123/Messages.json"
        );

        let client = TwilioClient::new(Auth::new("AC123", "token").unwrap()).unwrap();
        assert_eq!(
            client.messages_url().as_str(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }

    #[test]
    fn builder_rejects_unusable_base_url() {
        let auth = Auth::new("AC123", "token").unwrap();
        let err = TwilioClient::builder(auth.clone())
            .base_url("not a url")
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, TwilioError::Url(_)));

        let err = TwilioClient::builder(auth)
            .base_url("mailto:ops@example.com")
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, TwilioError::InvalidBaseUrl(_)));
    }
}

use std::{future::Future, sync::Arc, time::Duration};

use parking_lot::RwLock;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use url::Url;

use crate::{
    error::{BcardApiError, Result},
    headers::add_auth_token_header,
    request::{
        CreateCardRequestBody, LoginRequestBody, RegisterRequestBody, UpdateCardRequestBody,
        UpdateUserRequestBody,
    },
    response::{extract_token, normalize_error_body},
    routes,
    types::{Card, User},
};

pub const DEFAULT_API_URL: &str = "https://bcard-ojqa.onrender.com";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Call surface of the bcard directory service.
///
/// The session manager and the card store are generic over this trait so
/// that tests can drive them against an in-memory double.
#[allow(async_fn_in_trait)]
pub trait BcardApi {
    /// Install or clear the bearer token attached to subsequent calls.
    fn set_bearer_token(&self, token: Option<String>);

    async fn login(&self, request: &LoginRequestBody) -> Result<String>;
    async fn register(&self, request: &RegisterRequestBody) -> Result<User>;

    async fn get_user(&self, user_id: &str) -> Result<User>;
    async fn update_user(&self, user_id: &str, request: &UpdateUserRequestBody) -> Result<User>;
    async fn delete_user(&self, user_id: &str) -> Result<()>;
    async fn list_users(&self) -> Result<Vec<User>>;
    async fn change_user_status(&self, user_id: &str) -> Result<User>;

    async fn list_cards(&self) -> Result<Vec<Card>>;
    async fn get_card(&self, card_id: &str) -> Result<Card>;
    async fn create_card(&self, request: &CreateCardRequestBody) -> Result<Card>;
    async fn update_card(&self, card_id: &str, request: &UpdateCardRequestBody) -> Result<Card>;
    async fn delete_card(&self, card_id: &str) -> Result<()>;

    /// Direction-less like toggle. The effect (like vs. unlike) is inferred
    /// by the server from current membership; the response carries the
    /// updated card.
    async fn toggle_like(&self, card_id: &str) -> Result<Card>;
}

#[derive(Clone)]
pub struct BcardApiClient {
    inner: reqwest::Client,
    base_url: Url,
    // Shared across clones so the session manager and the card store see
    // the same credential.
    auth_token: Arc<RwLock<Option<String>>>,
    register_paths: Vec<Vec<String>>,
}

impl BcardApiClient {
    pub fn new(base_url: Url) -> Result<Self> {
        if base_url.cannot_be_a_base() {
            return Err(BcardApiError::InvalidBaseUrl);
        }
        let inner = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()?;
        Ok(BcardApiClient {
            inner,
            base_url,
            auth_token: Arc::new(RwLock::new(None)),
            register_paths: vec![
                vec![routes::USERS.to_string(), routes::REGISTER.to_string()],
                vec![routes::USERS.to_string()],
            ],
        })
    }

    pub fn new_default() -> Result<Self> {
        let base_url = DEFAULT_API_URL
            .parse()
            .map_err(|_| BcardApiError::InvalidBaseUrl)?;
        Self::new(base_url)
    }

    /// Override the ordered list of registration endpoints. Each path is
    /// tried in turn; the next one is attempted only on a not-found
    /// response.
    pub fn with_register_paths(mut self, paths: Vec<Vec<String>>) -> Self {
        self.register_paths = paths;
        self
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BcardApiError::InvalidBaseUrl)?
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let mut builder = self.inner.request(method, self.endpoint(segments)?);
        if let Some(token) = self.auth_token.read().as_deref() {
            builder = add_auth_token_header(builder, token);
        }
        Ok(builder)
    }

    async fn get_json<T>(&self, segments: &[&str]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.request(Method::GET, segments)?.send().await?;
        parse_response(response).await
    }

    async fn send_json<T, B>(&self, method: Method, segments: &[&str], body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let response = self
            .request(method, segments)?
            .json(body)
            .send()
            .await?;
        parse_response(response).await
    }

    async fn patch_json<T>(&self, segments: &[&str]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.request(Method::PATCH, segments)?.send().await?;
        parse_response(response).await
    }

    async fn delete(&self, segments: &[&str]) -> Result<()> {
        let response = self.request(Method::DELETE, segments)?.send().await?;
        parse_empty_response(response).await
    }
}

impl BcardApi for BcardApiClient {
    fn set_bearer_token(&self, token: Option<String>) {
        *self.auth_token.write() = token;
    }

    async fn login(&self, request: &LoginRequestBody) -> Result<String> {
        debug!("Logging in as {}", request.email);
        let body: serde_json::Value = self
            .send_json(Method::POST, &[routes::USERS, routes::LOGIN], request)
            .await?;
        extract_token(&body)
    }

    async fn register(&self, request: &RegisterRequestBody) -> Result<User> {
        debug!("Registering {}", request.email);
        send_with_fallback(&self.register_paths, |path| async move {
            let segments: Vec<&str> = path.iter().map(String::as_str).collect();
            self.send_json(Method::POST, &segments, request).await
        })
        .await
    }

    async fn get_user(&self, user_id: &str) -> Result<User> {
        debug!("Fetching user {user_id}");
        self.get_json(&[routes::USERS, user_id]).await
    }

    async fn update_user(&self, user_id: &str, request: &UpdateUserRequestBody) -> Result<User> {
        debug!("Updating user {user_id}");
        self.send_json(Method::PUT, &[routes::USERS, user_id], request)
            .await
    }

    async fn delete_user(&self, user_id: &str) -> Result<()> {
        debug!("Deleting user {user_id}");
        self.delete(&[routes::USERS, user_id]).await
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        debug!("Fetching all users");
        self.get_json(&[routes::USERS]).await
    }

    async fn change_user_status(&self, user_id: &str) -> Result<User> {
        debug!("Toggling business status for user {user_id}");
        self.patch_json(&[routes::USERS, user_id]).await
    }

    async fn list_cards(&self) -> Result<Vec<Card>> {
        debug!("Fetching cards");
        self.get_json(&[routes::CARDS]).await
    }

    async fn get_card(&self, card_id: &str) -> Result<Card> {
        debug!("Fetching card {card_id}");
        self.get_json(&[routes::CARDS, card_id]).await
    }

    async fn create_card(&self, request: &CreateCardRequestBody) -> Result<Card> {
        debug!("Creating card");
        self.send_json(Method::POST, &[routes::CARDS], request).await
    }

    async fn update_card(&self, card_id: &str, request: &UpdateCardRequestBody) -> Result<Card> {
        debug!("Updating card {card_id}");
        self.send_json(Method::PUT, &[routes::CARDS, card_id], request)
            .await
    }

    async fn delete_card(&self, card_id: &str) -> Result<()> {
        debug!("Deleting card {card_id}");
        self.delete(&[routes::CARDS, card_id]).await
    }

    async fn toggle_like(&self, card_id: &str) -> Result<Card> {
        debug!("Toggling like on card {card_id}");
        self.patch_json(&[routes::CARDS, card_id]).await
    }
}

/// Try the same request against an ordered list of paths, advancing to the
/// next one only when the current path does not exist. Any other outcome,
/// success or failure alike, is final.
async fn send_with_fallback<T, F, Fut>(paths: &[Vec<String>], mut send: F) -> Result<T>
where
    F: FnMut(Vec<String>) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    for path in paths {
        match send(path.clone()).await {
            Err(BcardApiError::NotFound) => {
                debug!("Path {path:?} not found, trying next");
            }
            other => return other,
        }
    }
    Err(BcardApiError::NotFound)
}

async fn parse_response<T>(response: Response) -> Result<T>
where
    T: DeserializeOwned,
{
    let status = response.status();
    if status.is_success() {
        return response.json().await.map_err(BcardApiError::Request);
    }
    Err(error_for_status(status, response).await)
}

async fn parse_empty_response(response: Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    Err(error_for_status(status, response).await)
}

async fn error_for_status(status: StatusCode, response: Response) -> BcardApiError {
    match status {
        StatusCode::UNAUTHORIZED => BcardApiError::Unauthorized,
        StatusCode::NOT_FOUND => BcardApiError::NotFound,
        _ => {
            let body = response.text().await.unwrap_or_default();
            BcardApiError::Endpoint {
                status,
                message: normalize_error_body(&body),
            }
        }
    }
}

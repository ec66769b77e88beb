use std::sync::Arc;

use secrecy::SecretString;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::builder::RequestBuilder;
use crate::config::ServiceConfig;
use crate::credentials::{Consumer, Token};
use crate::error::{Error, Result, TransportError};
use crate::parameters::{ParamValue, Params};
use crate::provider::{Actor, OAuthUser, Provider};
use crate::response::{string_field, Response, ResponseMap};
use crate::session::{HandshakeContext, SESSION_KEY_TOKEN_SECRET};
use crate::transport::{HttpMethod, HttpRequest, HttpTransport};
use crate::util;
use crate::v1::values::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandshakeState {
    NoToken,
    HasRequestToken,
    HasAccessToken,
}

/// Three-legged OAuth 1.0/1.0a client for one provider and one identity.
///
/// Handshake steps take `&mut self`; the per-user secret that links the
/// request token step to the access token step lives in the caller's
/// [`HandshakeContext`].
pub struct OAuthClient {
    config: ServiceConfig,
    consumer: Consumer,
    token: Option<Token>,
    state: HandshakeState,
    transport: Arc<dyn HttpTransport>,
    provider: Option<Arc<dyn Provider>>,
    user: Option<OAuthUser>,
}

impl OAuthClient {
    pub fn new(
        config: ServiceConfig,
        consumer: Option<Consumer>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        OAuthClient {
            config,
            consumer: consumer.unwrap_or_default(),
            token: None,
            state: HandshakeState::NoToken,
            transport,
            provider: None,
            user: None,
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn Provider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Restores a previously obtained access token.
    pub fn with_token(mut self, token: Option<Token>) -> Self {
        self.set_token(token);
        self
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn state(&self) -> HandshakeState {
        self.state
    }

    pub fn is_read_only(&self) -> bool {
        self.config.readonly
    }

    pub fn enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn version(&self) -> &str {
        &self.config.version
    }

    /// Service name; falls back to the provider's name when the config has none.
    pub fn name(&self) -> &str {
        match (&self.provider, self.config.name.is_empty()) {
            (Some(provider), true) => provider.name(),
            _ => &self.config.name,
        }
    }

    pub fn consumer(&self) -> &Consumer {
        &self.consumer
    }

    /// `None` installs the empty consumer: the client always has one to sign with.
    pub fn set_consumer(&mut self, consumer: Option<Consumer>) -> &mut Self {
        self.consumer = consumer.unwrap_or_default();
        self
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub fn set_token(&mut self, token: Option<Token>) -> &mut Self {
        self.state = match token {
            Some(_) => HandshakeState::HasAccessToken,
            None => HandshakeState::NoToken,
        };
        self.token = token;
        self.user = None;
        self
    }

    pub fn set_token_parts(&mut self, key: Option<&str>, secret: Option<&str>) -> &mut Self {
        self.set_token(Token::from_parts(key, secret))
    }

    pub fn set_token_map(&mut self, map: &ResponseMap) -> &mut Self {
        self.set_token(Token::from_map(map))
    }

    /// Request factory: `url` signed with the consumer, the current token and
    /// the configured version.
    pub fn request<'a>(
        &'a self,
        url: &'a str,
        method: HttpMethod,
        data: &Params,
    ) -> RequestBuilder<'a> {
        let mut builder = self.unsigned_request(url, method, data);
        builder.token(self.token.as_ref());
        builder
    }

    fn unsigned_request<'a>(
        &'a self,
        url: &'a str,
        method: HttpMethod,
        data: &Params,
    ) -> RequestBuilder<'a> {
        let mut builder = RequestBuilder::new(url, &self.consumer);
        builder
            .method(method)
            .params(data)
            .version(OAuthVersion::from_config(&self.config.version))
            .signature_method(self.config.signature_method);
        builder
    }

    async fn send(&self, request: HttpRequest) -> Result<Response> {
        let method = request.method;
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            warn!(
                service = %self.config.name,
                %method,
                status = response.status,
                "provider rejected request"
            );
            return Err(TransportError::Status {
                status: response.status,
                body: response.body,
            }
            .into());
        }
        Ok(response)
    }

    /// Obtains a request token and stashes its secret in `ctx`.
    ///
    /// `oauth_callback` defaults to the consumer's callback URL; `extra`
    /// may override it.
    #[instrument(skip_all, fields(service = %self.config.name, session = %ctx.session_id()))]
    pub async fn request_request_token(
        &mut self,
        ctx: &HandshakeContext,
        extra: &Params,
    ) -> Result<ResponseMap> {
        let url = self
            .config
            .endpoint("request_token_url", &self.config.request_token_url)?;
        let mut data = extra.clone();
        if let Some(callback) = &self.consumer.callback_url {
            data.set_default(OAUTH_PARAM_KEY_CALLBACK, callback.as_str());
        }
        let request = self
            .unsigned_request(url, HttpMethod::Post, &data)
            .build()?;

        let result = self.send(request).await?.parse_query()?;
        let token = string_field(&result, OAUTH_PARAM_KEY_TOKEN)
            .ok_or(Error::MissingField(OAUTH_PARAM_KEY_TOKEN))?;
        let secret = string_field(&result, OAUTH_PARAM_KEY_TOKEN_SECRET)
            .ok_or(Error::MissingField(OAUTH_PARAM_KEY_TOKEN_SECRET))?;

        let secret = SecretString::new(secret);
        ctx.stash_token_secret(secret.clone());
        self.token = Some(Token::with_secret(token, secret));
        self.state = HandshakeState::HasRequestToken;
        debug!("request token obtained");
        Ok(result)
    }

    /// URL of the provider's authorization page. Does not redirect.
    ///
    /// With version `"1.0"` a request token is fetched first and passed as
    /// `oauth_token`. List values are comma-joined.
    pub async fn get_authorization_url(
        &mut self,
        ctx: &HandshakeContext,
        extra: &Params,
    ) -> Result<String> {
        let base = self.config.authorize_url.clone();
        self.redirect_url(ctx, "authorize_url", base, extra).await
    }

    /// Same as [`OAuthClient::get_authorization_url`] against the
    /// authenticate ("sign in with") endpoint.
    pub async fn get_authenticate_url(
        &mut self,
        ctx: &HandshakeContext,
        extra: &Params,
    ) -> Result<String> {
        let base = self.config.authenticate_url.clone();
        self.redirect_url(ctx, "authenticate_url", base, extra).await
    }

    async fn redirect_url(
        &mut self,
        ctx: &HandshakeContext,
        field: &'static str,
        base: String,
        extra: &Params,
    ) -> Result<String> {
        self.config.endpoint(field, &base)?;
        let mut query = extra.clone();
        if self.config.version == OAUTH_VALUE_VERSION {
            let result = self.request_request_token(ctx, &Params::new()).await?;
            if let Some(token) = string_field(&result, OAUTH_PARAM_KEY_TOKEN) {
                query.set(OAUTH_PARAM_KEY_TOKEN, token);
            }
        }
        let pairs = query.flatten();
        let query = util::build_query(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        Ok(util::append_query(&base, &query))
    }

    /// Exchanges the authorized request token for an access token.
    ///
    /// `params` are the callback parameters; both `oauth_token` and
    /// `oauth_verifier` are required. The stashed secret is removed from `ctx`
    /// whether or not the exchange succeeds; a missing parameter or secret
    /// fails before anything is sent.
    ///
    /// If the provider rejects the exchange, the client is left holding the
    /// request token in [`HandshakeState::HasRequestToken`]; a previously set
    /// access token is not restored.
    #[instrument(skip_all, fields(service = %self.config.name, session = %ctx.session_id()))]
    pub async fn request_access_token(
        &mut self,
        ctx: &HandshakeContext,
        params: &Params,
    ) -> Result<Token> {
        let secret = ctx.take_token_secret();

        let callback_field = |key: &'static str| {
            params
                .get(key)
                .map(ParamValue::flatten)
                .filter(|v| !v.is_empty())
                .ok_or(Error::MissingField(key))
        };
        let request_token = callback_field(OAUTH_PARAM_KEY_TOKEN)?;
        let verifier = callback_field(OAUTH_PARAM_KEY_VERIFIER)?;
        let secret = secret.ok_or_else(|| {
            warn!("no request token secret for session");
            Error::MissingSessionState {
                session_id: ctx.session_id().to_string(),
                key: SESSION_KEY_TOKEN_SECRET.to_string(),
            }
        })?;
        self.token = Some(Token::with_secret(request_token, secret));
        self.state = HandshakeState::HasRequestToken;

        let url = self
            .config
            .endpoint("access_token_url", &self.config.access_token_url)?;
        let data = Params::new().with(OAUTH_PARAM_KEY_VERIFIER, verifier);
        let request = self.request(url, HttpMethod::Post, &data).build()?;

        let result = self.send(request).await?.parse_query()?;
        let key = string_field(&result, OAUTH_PARAM_KEY_TOKEN)
            .ok_or(Error::MissingField(OAUTH_PARAM_KEY_TOKEN))?;
        let secret = string_field(&result, OAUTH_PARAM_KEY_TOKEN_SECRET)
            .ok_or(Error::MissingField(OAUTH_PARAM_KEY_TOKEN_SECRET))?;
        let token = Token::new(key, secret);

        self.set_token(Some(token.clone()));
        info!("access token obtained");
        Ok(token)
    }

    /// Signed call to `api_url/resource`.
    ///
    /// An empty body yields `Ok(None)`; otherwise the body is decoded with the
    /// configured response format.
    #[instrument(skip(self, data), fields(service = %self.config.name))]
    pub async fn call(
        &self,
        resource: &str,
        method: HttpMethod,
        data: &Params,
    ) -> Result<Option<Value>> {
        let api_url = self.config.endpoint("api_url", &self.config.api_url)?;
        let url = format!("{}/{}", api_url, resource);
        let request = self.request(&url, method, data).build()?;

        let response = self.send(request).await?;
        if response.is_empty() {
            debug!("empty response body");
            return Ok(None);
        }
        response.parse(self.config.response_format).map(Some)
    }

    pub async fn get(&self, resource: &str, data: &Params) -> Result<Option<Value>> {
        self.call(resource, HttpMethod::Get, data).await
    }

    pub async fn post(&self, resource: &str, data: &Params) -> Result<Option<Value>> {
        self.call(resource, HttpMethod::Post, data).await
    }

    pub async fn put(&self, resource: &str, data: &Params) -> Result<Option<Value>> {
        self.call(resource, HttpMethod::Put, data).await
    }

    pub async fn delete(&self, resource: &str, data: &Params) -> Result<Option<Value>> {
        self.call(resource, HttpMethod::Delete, data).await
    }

    fn provider(&self) -> Result<Arc<dyn Provider>> {
        self.provider
            .clone()
            .ok_or_else(|| Error::NoProvider(self.config.name.clone()))
    }

    /// The logged-in user. Fetched from the provider once, then cached
    /// until the token changes.
    pub async fn get_user(&mut self) -> Result<&OAuthUser> {
        let user = match self.user.take() {
            Some(user) => user,
            None => {
                let provider = self.provider()?;
                let data = provider.fetch_user_profile(&*self).await?;
                let mut user = OAuthUser::default();
                for (key, value) in data {
                    user.set(key, value);
                }
                user
            }
        };
        let user: &OAuthUser = self.user.insert(user);
        Ok(user)
    }

    /// Posts a status update as the logged-in user.
    pub async fn post_update(&self, message: &str) -> Result<Option<Value>> {
        if self.config.readonly {
            return Err(Error::ReadOnly(self.config.name.clone()));
        }
        self.provider()?.post_status(self, message).await
    }

    pub fn can_add_service(&self, actor: &Actor) -> Result<bool> {
        self.provider()?.check_eligibility(actor)
    }
}

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::response::ResponseFormat;
use crate::v1::values::{SignatureMethod, OAUTH_VALUE_VERSION};

/// Static description of a provider. Drives all endpoint addressing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub api_url: String,
    pub request_token_url: String,
    pub access_token_url: String,
    pub authenticate_url: String,
    pub authorize_url: String,
    /// `"1.0"` fetches the request token while building the authorization URL.
    pub version: String,
    pub enabled: bool,
    pub readonly: bool,
    pub response_format: ResponseFormat,
    pub signature_method: SignatureMethod,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            name: String::new(),
            api_url: String::new(),
            request_token_url: String::new(),
            access_token_url: String::new(),
            authenticate_url: String::new(),
            authorize_url: String::new(),
            version: OAUTH_VALUE_VERSION.to_string(),
            enabled: true,
            readonly: false,
            response_format: ResponseFormat::Json,
            signature_method: SignatureMethod::HmacSha1,
        }
    }
}

impl ServiceConfig {
    pub fn new(name: impl Into<String>) -> Self {
        ServiceConfig {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Twitter's REST API v1.1 endpoints.
    pub fn twitter() -> Self {
        ServiceConfig::new("twitter")
            .api_url("https://api.twitter.com/1.1")
            .request_token_url("https://api.twitter.com/oauth/request_token")
            .access_token_url("https://api.twitter.com/oauth/access_token")
            .authenticate_url("https://api.twitter.com/oauth/authenticate")
            .authorize_url("https://api.twitter.com/oauth/authorize")
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn request_token_url(mut self, url: impl Into<String>) -> Self {
        self.request_token_url = url.into();
        self
    }

    pub fn access_token_url(mut self, url: impl Into<String>) -> Self {
        self.access_token_url = url.into();
        self
    }

    pub fn authenticate_url(mut self, url: impl Into<String>) -> Self {
        self.authenticate_url = url.into();
        self
    }

    pub fn authorize_url(mut self, url: impl Into<String>) -> Self {
        self.authorize_url = url.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    pub fn response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = format;
        self
    }

    pub fn signature_method(mut self, method: SignatureMethod) -> Self {
        self.signature_method = method;
        self
    }

    /// Returns `url` or a configuration error naming the unset field.
    pub(crate) fn endpoint<'a>(&self, field: &'static str, url: &'a str) -> Result<&'a str> {
        if url.is_empty() {
            Err(Error::Config(format!(
                "`{}` is not configured for service `{}`",
                field, self.name
            )))
        } else {
            Ok(url)
        }
    }
}

/// Timeouts applied by the HTTP transport.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            connect_timeout_secs: 10,
            timeout_secs: 30,
        }
    }
}

impl TransportConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Credentials of the application registered with the provider.
#[derive(Clone, Debug, Deserialize)]
pub struct Consumer {
    pub key: String,
    pub secret: SecretString,
    #[serde(default)]
    pub callback_url: Option<String>,
}

impl Consumer {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Consumer {
            key: key.into(),
            secret: SecretString::new(secret.into()),
            callback_url: None,
        }
    }

    pub fn with_callback_url(mut self, callback_url: impl Into<String>) -> Self {
        self.callback_url = Some(callback_url.into());
        self
    }
}

impl Default for Consumer {
    fn default() -> Self {
        Consumer::new("", "")
    }
}

impl PartialEq for Consumer {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && self.secret.expose_secret() == other.secret.expose_secret()
            && self.callback_url == other.callback_url
    }
}

impl Eq for Consumer {}

/// A request or access token pair.
#[derive(Clone, Debug)]
pub struct Token {
    pub key: String,
    pub secret: Option<SecretString>,
}

impl Token {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Token::with_secret(key, SecretString::new(secret.into()))
    }

    pub fn with_secret(key: impl Into<String>, secret: SecretString) -> Self {
        Token {
            key: key.into(),
            secret: Some(secret),
        }
    }

    /// Builds a token from loose parts. A missing or empty key means "no token".
    pub fn from_parts(key: Option<&str>, secret: Option<&str>) -> Option<Token> {
        match key {
            Some(k) if !k.is_empty() => Some(Token {
                key: k.to_string(),
                secret: secret.map(|s| SecretString::new(s.to_string())),
            }),
            _ => None,
        }
    }

    /// Reads `key`/`secret`, falling back to the `oauth_token`/`oauth_token_secret`
    /// names providers use on the wire.
    pub fn from_map(map: &Map<String, Value>) -> Option<Token> {
        let field = |names: [&str; 2]| {
            names
                .iter()
                .find_map(|n| map.get(*n).and_then(value_as_str))
        };
        Token::from_parts(
            field(["key", "oauth_token"]),
            field(["secret", "oauth_token_secret"]),
        )
    }

    pub fn secret(&self) -> Option<&SecretString> {
        self.secret.as_ref()
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && self.secret().map(|s| s.expose_secret())
                == other.secret().map(|s| s.expose_secret())
    }
}

impl Eq for Token {}

fn value_as_str(v: &Value) -> Option<&str> {
    match v {
        Value::String(s) => Some(s),
        _ => None,
    }
}

use std::borrow::Cow;

use secrecy::ExposeSecret;

use crate::credentials::{Consumer, Token};
use crate::error::Result;
use crate::parameters::{ParamValue, Params};
use crate::transport::{HttpMethod, HttpRequest};
use crate::util;
use crate::v1::{OAuthVersion, Secrets, SignatureMethod, SignedContent, Signer};

const HEADER_AUTHORIZATION: &str = "Authorization";
const HEADER_CONTENT_TYPE: &str = "Content-Type";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Builds a signed outbound request from a URL, a method and form data.
///
/// `oauth_*` data (e.g. `oauth_callback`, `oauth_verifier`) is sent in the
/// `Authorization` header; everything else goes into the query string for
/// GET/DELETE or a form body for POST/PUT. All of it is signed.
pub struct RequestBuilder<'a> {
    url: Cow<'a, str>,
    method: HttpMethod,
    params: Params,
    consumer: &'a Consumer,
    token: Option<&'a Token>,
    version: OAuthVersion<'a>,
    signature_method: SignatureMethod,
    nonce: Option<Cow<'a, str>>,
    timestamp: Option<i64>,
    realm: Option<Cow<'a, str>>,
}

impl<'a> RequestBuilder<'a> {
    pub fn new<T: Into<Cow<'a, str>>>(url: T, consumer: &'a Consumer) -> Self {
        RequestBuilder {
            url: url.into(),
            method: HttpMethod::Post,
            params: Params::new(),
            consumer,
            token: None,
            version: OAuthVersion::Default,
            signature_method: SignatureMethod::HmacSha1,
            nonce: None,
            timestamp: None,
            realm: None,
        }
    }

    pub fn method(&mut self, method: HttpMethod) -> &mut Self {
        self.method = method;
        self
    }

    pub fn param<K: Into<String>, V: Into<ParamValue>>(&mut self, key: K, value: V) -> &mut Self {
        self.params.set(key, value);
        self
    }

    /// Merges `params`, overriding keys already set.
    pub fn params(&mut self, params: &Params) -> &mut Self {
        for (k, v) in params.iter() {
            self.params.set(k, v.clone());
        }
        self
    }

    pub fn token(&mut self, token: Option<&'a Token>) -> &mut Self {
        self.token = token;
        self
    }

    pub fn version(&mut self, version: OAuthVersion<'a>) -> &mut Self {
        self.version = version;
        self
    }

    pub fn signature_method(&mut self, method: SignatureMethod) -> &mut Self {
        self.signature_method = method;
        self
    }

    pub fn nonce<T: Into<Cow<'a, str>>>(&mut self, nonce: T) -> &mut Self {
        self.nonce = Some(nonce.into());
        self
    }

    pub fn timestamp(&mut self, timestamp: i64) -> &mut Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn realm<T: Into<Cow<'a, str>>>(&mut self, realm: T) -> &mut Self {
        self.realm = Some(realm.into());
        self
    }

    /// Signs the collected data. Returns the request and the signed content.
    pub fn sign(&self) -> Result<(HttpRequest, SignedContent)> {
        let url = url::Url::parse(&self.url)?;
        let data = self.params.flatten();

        let mut signer = Signer::new(self.consumer.key.as_str());
        signer
            .version(self.version.clone())
            .signature_method(self.signature_method);
        if let Some(nonce) = &self.nonce {
            signer.nonce(nonce.as_ref());
        }
        if let Some(timestamp) = self.timestamp {
            signer.timestamp(timestamp);
        }
        let mut secrets = Secrets::new(self.consumer.secret.expose_secret().as_str());
        if let Some(token) = self.token {
            signer.token(token.key.as_str());
            if let Some(secret) = token.secret() {
                secrets = secrets.with_token_secret(secret.expose_secret().as_str());
            }
        }
        let signed = signer.sign(self.method.as_str(), &url, &data, &secrets)?;

        let query = util::build_query(
            data.iter()
                .filter(|(k, _)| !k.starts_with("oauth_"))
                .map(|(k, v)| (k.as_str(), v.as_str())),
        );
        let mut headers = vec![(
            HEADER_AUTHORIZATION.to_string(),
            signed.authorization_header(self.realm.as_deref()),
        )];
        let (target, body) = if self.method.has_body() {
            if !query.is_empty() {
                headers.push((HEADER_CONTENT_TYPE.to_string(), FORM_CONTENT_TYPE.to_string()));
            }
            (self.url.to_string(), Some(query).filter(|q| !q.is_empty()))
        } else {
            (util::append_query(&self.url, &query), None)
        };

        let request = HttpRequest {
            method: self.method,
            url: target,
            headers,
            body,
        };
        Ok((request, signed))
    }

    pub fn build(&self) -> Result<HttpRequest> {
        self.sign().map(|(request, _)| request)
    }
}

/// Reads the `key="value"` pairs of an `Authorization: OAuth ...` header, decoded.
pub fn parse_authorization_header(header: &str) -> Vec<(String, String)> {
    header
        .trim_start_matches("OAuth")
        .split(',')
        .filter_map(|field| {
            let (k, v) = field.trim().split_once('=')?;
            let v = v.trim_matches('"');
            let decode = |s: &str| {
                percent_encoding::percent_decode_str(s)
                    .decode_utf8_lossy()
                    .into_owned()
            };
            Some((decode(k), decode(v)))
        })
        .collect()
}

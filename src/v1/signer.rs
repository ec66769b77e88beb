use crate::error::{Error, Result};
use crate::util;
use crate::v1::values::*;
use crate::v1::percent_encode;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use std::borrow::Cow;
use uuid::Uuid;

type HmacSha1 = Hmac<Sha1>;

/// Secrets used to build the signing key. Never sent on the wire.
pub struct Secrets<'a> {
    consumer_secret: Cow<'a, str>,
    token_secret: Option<Cow<'a, str>>,
}

impl<'a> Secrets<'a> {
    pub fn new<T: Into<Cow<'a, str>>>(consumer_secret: T) -> Self {
        Secrets {
            consumer_secret: consumer_secret.into(),
            token_secret: None,
        }
    }

    pub fn with_token_secret<T: Into<Cow<'a, str>>>(mut self, token_secret: T) -> Self {
        self.token_secret = Some(token_secret.into());
        self
    }
}

/// Contents signed with OAuth 1.0.
#[derive(Clone, Debug)]
pub struct SignedContent {
    pub signature: String,
    pub nonce: String,
    pub timestamp: i64,
    /// Protocol parameters (decoded), `oauth_signature` included.
    pub oauth_params: Vec<(String, String)>,
}

impl SignedContent {
    /// Value of the `Authorization` header.
    pub fn authorization_header(&self, realm: Option<&str>) -> String {
        let mut fields = Vec::with_capacity(self.oauth_params.len() + 1);
        if let Some(realm) = realm {
            fields.push(format!("realm=\"{}\"", percent_encode(realm)));
        }
        fields.extend(
            self.oauth_params
                .iter()
                .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v))),
        );
        format!("OAuth {}", fields.join(", "))
    }
}

pub struct Signer<'a> {
    consumer_key: Cow<'a, str>,
    token: Option<Cow<'a, str>>,
    signature_method: SignatureMethod,
    nonce: Option<Cow<'a, str>>,
    timestamp: Option<i64>,
    version: OAuthVersion<'a>,
}

impl<'a> Signer<'a> {
    pub fn new<T: Into<Cow<'a, str>>>(consumer_key: T) -> Self {
        Signer {
            consumer_key: consumer_key.into(),
            token: None,
            signature_method: SignatureMethod::HmacSha1,
            nonce: None,
            timestamp: None,
            version: OAuthVersion::Default,
        }
    }

    pub fn token<T: Into<Cow<'a, str>>>(&mut self, token: T) -> &mut Self {
        self.token = Some(token.into());
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

    pub fn version(&mut self, version: OAuthVersion<'a>) -> &mut Self {
        self.version = version;
        self
    }

    pub fn signature_method(&mut self, method: SignatureMethod) -> &mut Self {
        self.signature_method = method;
        self
    }

    /// Sign a request.
    ///
    /// # Parameters
    /// - http_method: HTTP method, ex)"GET", "POST", ...
    /// - url: target URL; its query is part of the signed parameters.
    /// - params: request parameters, not encoded. `oauth_*` keys are treated
    ///   as protocol parameters and copied into the result.
    /// - secrets: consumer and token secrets.
    pub fn sign(
        &self,
        http_method: &str,
        url: &url::Url,
        params: &[(String, String)],
        secrets: &Secrets<'_>,
    ) -> Result<SignedContent> {
        let timestamp = self.timestamp.unwrap_or_else(|| Utc::now().timestamp());
        let nonce = self
            .nonce
            .as_ref()
            .map(|n| n.to_string())
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string());

        let basic = build_basic_params(
            &self.consumer_key,
            self.token.as_deref(),
            self.signature_method,
            &nonce,
            timestamp,
            self.version.wire_value(),
        );

        let token_secret = secrets.token_secret.as_deref();
        let signature = match self.signature_method {
            SignatureMethod::PlainText => {
                generate_signature_plaintext(&secrets.consumer_secret, token_secret)
            }
            SignatureMethod::HmacSha1 => {
                let (endpoint, query) = util::url_to_endpoint_and_queries(url)?;
                let all = basic
                    .iter()
                    .chain(params.iter())
                    .chain(query.iter())
                    .filter(|(k, _)| k != "realm" && k != OAUTH_PARAM_KEY_SIGNATURE);
                generate_signature_hmacsha1(
                    &secrets.consumer_secret,
                    token_secret,
                    http_method,
                    &endpoint,
                    all,
                )?
            }
        };

        let mut oauth_params = basic;
        oauth_params.extend(
            params
                .iter()
                .filter(|(k, _)| k.starts_with("oauth_") && k != OAUTH_PARAM_KEY_SIGNATURE)
                .cloned(),
        );
        oauth_params.push((OAUTH_PARAM_KEY_SIGNATURE.to_string(), signature.clone()));

        Ok(SignedContent {
            signature,
            nonce,
            timestamp,
            oauth_params,
        })
    }
}

fn build_basic_params(
    consumer_key: &str,
    token: Option<&str>,
    signature_method: SignatureMethod,
    nonce: &str,
    timestamp: i64,
    version: Option<&str>,
) -> Vec<(String, String)> {
    let params = vec![
        (OAUTH_PARAM_KEY_CONSUMER_KEY, Some(consumer_key.to_string())),
        (OAUTH_PARAM_KEY_NONCE, Some(nonce.to_string())),
        (
            OAUTH_PARAM_KEY_SIGNATURE_METHOD,
            Some(signature_method.as_str().to_string()),
        ),
        (OAUTH_PARAM_KEY_TIMESTAMP, Some(timestamp.to_string())),
        (OAUTH_PARAM_KEY_TOKEN, token.map(|t| t.to_string())),
        (OAUTH_PARAM_KEY_VERSION, version.map(|v| v.to_string())),
    ];
    params
        .into_iter()
        // trim None value
        .filter_map(|(k, v)| v.map(|v| (k.to_string(), v)))
        .collect()
}

fn signing_key(consumer_secret: &str, token_secret: Option<&str>) -> String {
    format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret.unwrap_or(""))
    )
}

fn generate_signature_plaintext(consumer_secret: &str, token_secret: Option<&str>) -> String {
    signing_key(consumer_secret, token_secret)
}

fn generate_signature_hmacsha1<'p, I>(
    consumer_secret: &str,
    token_secret: Option<&str>,
    http_method: &str,
    endpoint: &str,
    params: I,
) -> Result<String>
where
    I: Iterator<Item = &'p (String, String)>,
{
    // parameters are encoded first, then sorted by encoded key and value
    let mut encoded = params
        .map(|(k, v)| (percent_encode(k).to_string(), percent_encode(v).to_string()))
        .collect::<Vec<(String, String)>>();
    encoded.sort();
    let param_str = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<String>>()
        .join("&");

    let base_str = format!(
        "{}&{}&{}",
        percent_encode(&http_method.to_ascii_uppercase()),
        percent_encode(endpoint),
        percent_encode(&param_str)
    );

    let mut mac = HmacSha1::new_from_slice(signing_key(consumer_secret, token_secret).as_bytes())
        .map_err(|e| Error::Signing(e.to_string()))?;
    mac.update(base_str.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod test {
    use super::*;

    fn find<'a>(content: &'a SignedContent, key: &str) -> Option<&'a str> {
        content
            .oauth_params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_sign_rfc5849() {
        // https://tools.ietf.org/html/rfc5849#section-1.2
        let url = url::Url::parse("https://photos.example.net/initiate").unwrap();
        let params = vec![
            ("realm".to_string(), "photos".to_string()),
            (
                "oauth_callback".to_string(),
                "http://printer.example.com/ready".to_string(),
            ),
        ];
        let sign = Signer::new("dpf43f3p2l4k3l03")
            .nonce("wIjqoS")
            .timestamp(137_131_200)
            .version(OAuthVersion::None)
            .sign("post", &url, &params, &Secrets::new("kd94hf93k423kf44"))
            .unwrap();
        assert_eq!(sign.signature, "74KNZJeDHnMBp0EMJ9ZHt/XKycU=");
        assert_eq!(
            find(&sign, "oauth_callback"),
            Some("http://printer.example.com/ready")
        );
        assert_eq!(find(&sign, "oauth_version"), None);
    }

    #[test]
    fn test_sign_twitter_with_url_query() {
        // https://developer.twitter.com/en/docs/authentication/oauth-1-0a/creating-a-signature
        let url = url::Url::parse(
            "https://api.twitter.com/1.1/statuses/update.json?include_entities=true",
        )
        .unwrap();
        let params = vec![(
            "status".to_string(),
            "Hello Ladies + Gentlemen, a signed OAuth request!".to_string(),
        )];
        let secrets = Secrets::new("kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw")
            .with_token_secret("LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE");
        let sign = Signer::new("xvz1evFS4wEEPTGEFPHBog")
            .token("370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb")
            .nonce("kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg")
            .timestamp(1_318_622_958)
            .sign("POST", &url, &params, &secrets)
            .unwrap();
        assert_eq!(sign.signature, "hCtSmYh+iHYCEqBWrE7C7hYmtUk=");
        // request parameters stay out of the protocol parameters
        assert_eq!(find(&sign, "status"), None);
        assert_eq!(find(&sign, "oauth_version"), Some("1.0"));
    }

    #[test]
    fn test_sign_get_with_token() {
        // OAuth Core 1.0, Appendix A.5
        let url =
            url::Url::parse("http://photos.example.net/photos?file=vacation.jpg&size=original")
                .unwrap();
        let secrets = Secrets::new("kd94hf93k423kf44").with_token_secret("pfkkdhi9sl3r4s00");
        let sign = Signer::new("dpf43f3p2l4k3l03")
            .token("nnch734d00sl2jdk")
            .nonce("kllo9940pd9333jh")
            .timestamp(1_191_242_096)
            .sign("GET", &url, &[], &secrets)
            .unwrap();
        assert_eq!(sign.signature, "tR3+Ty81lMeYAr/Fid0kMTYa/WM=");
    }

    #[test]
    fn test_sign_plaintext() {
        let url = url::Url::parse("https://photos.example.net/initiate").unwrap();
        let sign = Signer::new("ck")
            .signature_method(SignatureMethod::PlainText)
            .sign(
                "POST",
                &url,
                &[],
                &Secrets::new("cs&1").with_token_secret("ts"),
            )
            .unwrap();
        assert_eq!(sign.signature, "cs%261&ts");
        assert_eq!(find(&sign, "oauth_signature_method"), Some("PLAINTEXT"));
    }

    #[test]
    fn test_generated_nonce_and_timestamp() {
        let url = url::Url::parse("https://example.com/").unwrap();
        let a = Signer::new("ck")
            .sign("GET", &url, &[], &Secrets::new("cs"))
            .unwrap();
        let b = Signer::new("ck")
            .sign("GET", &url, &[], &Secrets::new("cs"))
            .unwrap();
        assert_ne!(a.nonce, b.nonce);
        assert!(a.timestamp > 0);
        assert_eq!(find(&a, "oauth_nonce"), Some(a.nonce.as_str()));
    }

    #[test]
    fn test_authorization_header() {
        let content = SignedContent {
            signature: "sig/+=".into(),
            nonce: "n".into(),
            timestamp: 1,
            oauth_params: vec![
                ("oauth_consumer_key".into(), "ck".into()),
                ("oauth_signature".into(), "sig/+=".into()),
            ],
        };
        assert_eq!(
            content.authorization_header(Some("Photos")),
            "OAuth realm=\"Photos\", oauth_consumer_key=\"ck\", oauth_signature=\"sig%2F%2B%3D\""
        );
        assert_eq!(
            content.authorization_header(None),
            "OAuth oauth_consumer_key=\"ck\", oauth_signature=\"sig%2F%2B%3D\""
        );
    }
}

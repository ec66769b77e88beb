use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::parameters::Params;
use crate::provider::{Actor, Provider};
use crate::response::{string_field, ResponseMap};
use crate::v1::OAuthClient;

const RESOURCE_VERIFY_CREDENTIALS: &str = "account/verify_credentials.json";
const RESOURCE_STATUS_UPDATE: &str = "statuses/update.json";
const PROFILE_BASE_URL: &str = "https://twitter.com/";

/// Twitter (REST API v1.1). Pair with [`crate::ServiceConfig::twitter`].
#[derive(Clone, Debug, Default)]
pub struct Twitter;

impl Twitter {
    pub fn new() -> Self {
        Twitter
    }

    fn user_from_profile(profile: &ResponseMap) -> ResponseMap {
        let mut user = ResponseMap::new();
        let mut put = |key: &str, value: Option<String>| {
            user.insert(key.to_string(), value.map(Value::String).unwrap_or(Value::Null));
        };
        let screen_name = string_field(profile, "screen_name");
        let avatar = string_field(profile, "profile_image_url_https")
            .or_else(|| string_field(profile, "profile_image_url"));

        put("id", string_field(profile, "id_str").or_else(|| string_field(profile, "id")));
        put("name", string_field(profile, "name"));
        put(
            "profile_url",
            screen_name.as_ref().map(|s| format!("{}{}", PROFILE_BASE_URL, s)),
        );
        put("username", screen_name);
        // `_normal` is the 48px variant; without the suffix Twitter serves the original
        put("large_avatar", avatar.as_ref().map(|a| a.replace("_normal", "")));
        put("thumb_avatar", avatar);
        user
    }
}

#[async_trait]
impl Provider for Twitter {
    fn name(&self) -> &str {
        "twitter"
    }

    async fn fetch_user_profile(&self, client: &OAuthClient) -> Result<ResponseMap> {
        match client.get(RESOURCE_VERIFY_CREDENTIALS, &Params::new()).await? {
            Some(Value::Object(profile)) => {
                debug!("fetched twitter profile");
                Ok(Twitter::user_from_profile(&profile))
            }
            _ => Err(Error::Provider(
                "twitter returned no account credentials".into(),
            )),
        }
    }

    async fn post_status(&self, client: &OAuthClient, message: &str) -> Result<Option<Value>> {
        client
            .post(RESOURCE_STATUS_UPDATE, &Params::new().with("status", message))
            .await
    }

    fn check_eligibility(&self, _actor: &Actor) -> Result<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use crate::credentials::{Consumer, Token};
    use crate::transport::{HttpMethod, MockTransport};
    use serde_json::json;
    use std::sync::Arc;

    fn client() -> (OAuthClient, Arc<MockTransport>) {
        let transport = Arc::new(MockTransport::new());
        let client = OAuthClient::new(
            ServiceConfig::twitter(),
            Some(Consumer::new("ck", "cs")),
            transport.clone(),
        )
        .with_token(Some(Token::new("AT", "AS")))
        .with_provider(Arc::new(Twitter::new()));
        (client, transport)
    }

    #[tokio::test]
    async fn test_get_user_maps_profile() {
        let (mut client, transport) = client();
        transport.respond(
            200,
            json!({
                "id": 6253282,
                "id_str": "6253282",
                "name": "Twitter API",
                "screen_name": "TwitterAPI",
                "profile_image_url_https": "https://pbs.twimg.com/profile_images/1/x_normal.png"
            })
            .to_string(),
        );

        let user = client.get_user().await.unwrap();
        assert_eq!(user.id(), Some("6253282"));
        assert_eq!(user.name(), Some("Twitter API"));
        assert_eq!(user.username(), Some("TwitterAPI"));
        assert_eq!(
            user.get_str("profile_url"),
            Some("https://twitter.com/TwitterAPI")
        );
        assert_eq!(
            user.get_str("thumb_avatar"),
            Some("https://pbs.twimg.com/profile_images/1/x_normal.png")
        );
        assert_eq!(
            user.get_str("large_avatar"),
            Some("https://pbs.twimg.com/profile_images/1/x.png")
        );

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(
            request.url,
            "https://api.twitter.com/1.1/account/verify_credentials.json"
        );
    }

    #[tokio::test]
    async fn test_get_user_rejects_non_object() {
        let (mut client, transport) = client();
        transport.respond(200, "[]");
        let err = client.get_user().await.unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
    }

    #[tokio::test]
    async fn test_post_update() {
        let (client, transport) = client();
        transport.respond(200, "{\"id_str\": \"1\", \"text\": \"Hello Ladies + Gentlemen\"}");
        let result = client
            .post_update("Hello Ladies + Gentlemen")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result["id_str"], json!("1"));

        let request = transport.last_request().unwrap();
        assert_eq!(request.url, "https://api.twitter.com/1.1/statuses/update.json");
        assert_eq!(
            request.body.as_deref(),
            Some("status=Hello+Ladies+%2B+Gentlemen")
        );
    }

    #[test]
    fn test_everyone_is_eligible() {
        let (client, _) = client();
        assert!(client.can_add_service(&Actor::person("1")).unwrap());
        assert!(client.can_add_service(&Actor::group("2")).unwrap());
        assert_eq!(client.name(), "twitter");
    }
}

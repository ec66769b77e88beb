//! Provider-specific capabilities composed into the client.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::response::ResponseMap;
use crate::v1::OAuthClient;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActorKind {
    Person,
    Group,
}

/// The framework entity that wants to connect a service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub kind: ActorKind,
}

impl Actor {
    pub fn person(id: impl Into<String>) -> Self {
        Actor {
            id: id.into(),
            kind: ActorKind::Person,
        }
    }

    pub fn group(id: impl Into<String>) -> Self {
        Actor {
            id: id.into(),
            kind: ActorKind::Group,
        }
    }
}

/// The logged-in user as reported by the provider.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OAuthUser {
    attributes: ResponseMap,
}

impl OAuthUser {
    pub fn from_map(attributes: ResponseMap) -> Self {
        OAuthUser { attributes }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.attributes.insert(key.into(), value);
    }

    pub fn id(&self) -> Option<&str> {
        self.get_str("id")
    }

    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    pub fn username(&self) -> Option<&str> {
        self.get_str("username")
    }

    pub fn attributes(&self) -> &ResponseMap {
        &self.attributes
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;

    /// Profile of the user the client's access token belongs to.
    async fn fetch_user_profile(&self, client: &OAuthClient) -> Result<ResponseMap>;

    /// Posts a status update as the logged-in user.
    async fn post_status(&self, client: &OAuthClient, message: &str) -> Result<Option<Value>>;

    /// Whether `actor` may connect this service. Domain errors are returned as-is.
    fn check_eligibility(&self, actor: &Actor) -> Result<bool>;
}

#[test]
fn test_user_accessors() {
    let mut user = OAuthUser::default();
    assert!(user.is_empty());
    user.set("id", Value::String("12".into()));
    user.set("name", Value::String("Jack".into()));
    user.set("followers", Value::from(3));
    assert_eq!(user.id(), Some("12"));
    assert_eq!(user.name(), Some("Jack"));
    assert_eq!(user.username(), None);
    assert_eq!(user.get_str("followers"), None);
    assert_eq!(user.get("followers"), Some(&Value::from(3)));
    assert_eq!(user.attributes().len(), 3);
}

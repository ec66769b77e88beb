//! # oauth-connect
//!
//! Three-legged OAuth 1.0/1.0a client for social service providers:
//! request token, user authorization, access token, then signed API calls.
//!
//! ```no_run
//! # async fn connect() -> oauth_connect::Result<()> {
//! use std::sync::Arc;
//! use oauth_connect::providers::Twitter;
//! use oauth_connect::*;
//!
//! let transport = Arc::new(ReqwestTransport::new(&TransportConfig::default())?);
//! let consumer = Consumer::new("key", "secret").with_callback_url("https://example.com/cb");
//! let mut client = OAuthClient::new(ServiceConfig::twitter(), Some(consumer), transport)
//!     .with_provider(Arc::new(Twitter::new()));
//!
//! let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
//! let ctx = HandshakeContext::new("user-session-id", sessions);
//! let redirect = client.get_authorization_url(&ctx, &Params::new()).await?;
//! # let _ = redirect;
//! // ... the provider redirects back with oauth_token and oauth_verifier
//! let callback = Params::new().with("oauth_token", "T").with("oauth_verifier", "V");
//! client.request_access_token(&ctx, &callback).await?;
//! client.post_update("hello").await?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod credentials;
pub mod error;
pub mod parameters;
pub mod provider;
pub mod providers;
pub mod response;
pub mod session;
pub mod transport;
pub mod v1;

mod util;

pub use builder::RequestBuilder;
pub use config::{ServiceConfig, TransportConfig};
pub use credentials::{Consumer, Token};
pub use error::{Error, Result, TransportError};
pub use parameters::{ParamValue, Params};
pub use provider::{Actor, ActorKind, OAuthUser, Provider};
pub use response::{Response, ResponseFormat, ResponseMap};
pub use session::{HandshakeContext, InMemorySessionStore, SessionStore};
pub use transport::{HttpMethod, HttpRequest, HttpTransport};
#[cfg(any(test, feature = "test-util"))]
pub use transport::MockTransport;
#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;
pub use v1::{HandshakeState, OAuthClient};

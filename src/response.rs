use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::util;

/// Decoded key/value pairs of a provider response.
pub type ResponseMap = Map<String, Value>;

/// How provider responses are decoded. Chosen by configuration, never by content type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// `application/x-www-form-urlencoded` body.
    Query,
    #[default]
    Json,
}

impl ResponseFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseFormat::Query => "query",
            ResponseFormat::Json => "json",
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "query" => Ok(ResponseFormat::Query),
            "json" => Ok(ResponseFormat::Json),
            other => Err(Error::Config(format!("unknown response format `{}`", other))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Response {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }

    pub fn parse(&self, format: ResponseFormat) -> Result<Value> {
        match format {
            ResponseFormat::Query => self.parse_query().map(Value::Object),
            ResponseFormat::Json => self.parse_json(),
        }
    }

    /// Decodes a form-encoded body. A body with no `key=value` pair is a parse error.
    pub fn parse_query(&self) -> Result<ResponseMap> {
        let body = self.body.trim();
        if !body.contains('=') {
            return Err(Error::parse(
                ResponseFormat::Query,
                "body has no key=value pairs",
            ));
        }
        Ok(util::parse_query(body)
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect())
    }

    pub fn parse_json(&self) -> Result<Value> {
        serde_json::from_str(&self.body).map_err(|e| Error::parse(ResponseFormat::Json, e.to_string()))
    }
}

/// Reads a string field, accepting numbers as providers are loose about ids.
pub(crate) fn string_field(map: &ResponseMap, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_round_trip() {
        let body = util::build_query(vec![("oauth_token", "T"), ("oauth_token_secret", "S")]);
        let map = Response::new(200, body).parse_query().unwrap();
        assert_eq!(
            Value::Object(map),
            json!({"oauth_token": "T", "oauth_token_secret": "S"})
        );
    }

    #[test]
    fn test_parse_dispatch() {
        let r = Response::new(200, "{\"id\": 42, \"name\": \"jack\"}");
        assert_eq!(
            r.parse(ResponseFormat::Json).unwrap(),
            json!({"id": 42, "name": "jack"})
        );
        let r = Response::new(200, "a=1&b=two+words");
        assert_eq!(
            r.parse(ResponseFormat::Query).unwrap(),
            json!({"a": "1", "b": "two words"})
        );
    }

    #[test]
    fn test_parse_errors_name_format() {
        let err = Response::new(200, "<html>oops</html>")
            .parse_json()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Parse {
                format: ResponseFormat::Json,
                ..
            }
        ));
        let err = Response::new(200, "<html>oops</html>")
            .parse_query()
            .unwrap_err();
        assert!(err.to_string().starts_with("failed to parse query response"));
    }

    #[test]
    fn test_status_and_emptiness() {
        assert!(Response::new(204, "").is_success());
        assert!(Response::new(204, " \n").is_empty());
        assert!(!Response::new(404, "x").is_success());
    }

    #[test]
    fn test_format_from_str_and_serde() {
        assert_eq!("JSON".parse::<ResponseFormat>().unwrap(), ResponseFormat::Json);
        assert_eq!("query".parse::<ResponseFormat>().unwrap(), ResponseFormat::Query);
        assert!("xml".parse::<ResponseFormat>().is_err());
        let f: ResponseFormat = serde_json::from_str("\"query\"").unwrap();
        assert_eq!(f, ResponseFormat::Query);
    }

    #[test]
    fn test_string_field() {
        let map = json!({"id": 12, "name": "n", "empty": "", "flag": true});
        let map = map.as_object().unwrap();
        assert_eq!(string_field(map, "id"), Some("12".to_string()));
        assert_eq!(string_field(map, "name"), Some("n".to_string()));
        assert_eq!(string_field(map, "empty"), None);
        assert_eq!(string_field(map, "flag"), None);
        assert_eq!(string_field(map, "missing"), None);
    }
}

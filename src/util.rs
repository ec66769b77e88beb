use url::form_urlencoded;

use crate::error::{Error, Result};

/// Splits a URL into the base string URI used for signing and its decoded query pairs.
///
/// Scheme and host come out lower-cased and default ports are dropped.
pub fn url_to_endpoint_and_queries(url: &url::Url) -> Result<(String, Vec<(String, String)>)> {
    let host = url
        .host_str()
        .ok_or_else(|| Error::Signing(format!("url `{}` has no host", url)))?;
    let mut endpoint = format!("{}://{}", url.scheme(), host);
    if let Some(port) = url.port() {
        endpoint.push_str(&format!(":{}", port));
    }
    endpoint.push_str(url.path());
    let queries = url.query().map(parse_query).unwrap_or_default();
    Ok((endpoint, queries))
}

/// Decodes an `application/x-www-form-urlencoded` string, keeping pair order.
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .filter(|(k, _)| !k.is_empty())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

pub fn build_query<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// Appends a query to `url`, with `?` or `&` as needed. An empty query leaves it untouched.
pub fn append_query(url: &str, query: &str) -> String {
    if query.is_empty() {
        url.to_string()
    } else if url.contains('?') {
        format!("{}&{}", url, query)
    } else {
        format!("{}?{}", url, query)
    }
}

#[test]
fn test_url_to_endpoint_and_queries() {
    let u = url::Url::parse("HTTP://Example.com:80/r%20v/X?id=123&a=b+c").unwrap();
    let (core, queries) = url_to_endpoint_and_queries(&u).unwrap();
    assert_eq!(core, "http://example.com/r%20v/X");
    assert_eq!(
        queries,
        vec![
            ("id".to_string(), "123".to_string()),
            ("a".to_string(), "b c".to_string())
        ]
    );

    let u = url::Url::parse("https://www.example.net:8080/?q=1").unwrap();
    let (core, _) = url_to_endpoint_and_queries(&u).unwrap();
    assert_eq!(core, "https://www.example.net:8080/");

    let n = "https://example.com/";
    let (core, queries) = url_to_endpoint_and_queries(&url::Url::parse(n).unwrap()).unwrap();
    assert_eq!(core, n);
    assert_eq!(queries.len(), 0);
}

#[test]
fn test_parse_query() {
    let pairs = parse_query("oauth_token=T&oauth_token_secret=S%2B1&&=x&flag=");
    assert_eq!(
        pairs,
        vec![
            ("oauth_token".to_string(), "T".to_string()),
            ("oauth_token_secret".to_string(), "S+1".to_string()),
            ("flag".to_string(), "".to_string()),
        ]
    );
    assert_eq!(parse_query("").len(), 0);
    assert_eq!(parse_query("?a=1").len(), 1);
}

#[test]
fn test_build_and_append_query() {
    let q = build_query(vec![("tags", "a,b"), ("scope", "read write")]);
    assert_eq!(q, "tags=a%2Cb&scope=read+write");
    assert_eq!(append_query("https://x.test/auth", &q), format!("https://x.test/auth?{}", q));
    assert_eq!(append_query("https://x.test/auth?force=1", "a=1"), "https://x.test/auth?force=1&a=1");
    assert_eq!(append_query("https://x.test/auth", ""), "https://x.test/auth");
}

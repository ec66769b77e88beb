/// Value of a request or query parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    /// Serialized as a comma-joined string.
    List(Vec<String>),
}

impl ParamValue {
    pub fn flatten(&self) -> String {
        match self {
            ParamValue::Text(s) => s.clone(),
            ParamValue::List(items) => items.join(","),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.into())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl From<&String> for ParamValue {
    fn from(s: &String) -> Self {
        ParamValue::Text(s.clone())
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Text(n.to_string())
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Text(if b { "true" } else { "false" }.into())
    }
}

impl<T: Into<String>> From<Vec<T>> for ParamValue {
    fn from(v: Vec<T>) -> Self {
        ParamValue::List(v.into_iter().map(Into::into).collect())
    }
}

/// Ordered parameter set. Setting an existing key replaces its value in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    pub fn new() -> Self {
        Params::default()
    }

    pub fn set<K: Into<String>, V: Into<ParamValue>>(&mut self, key: K, value: V) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    /// Chained form of [`Params::set`].
    pub fn with<K: Into<String>, V: Into<ParamValue>>(mut self, key: K, value: V) -> Self {
        self.set(key, value);
        self
    }

    /// Sets `key` only when it is not present yet.
    pub fn set_default<K: Into<String>, V: Into<ParamValue>>(&mut self, key: K, value: V) -> &mut Self {
        let key = key.into();
        if self.get(&key).is_none() {
            self.entries.push((key, value.into()));
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Pairs with list values comma-joined.
    pub fn flatten(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.flatten()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.set(k, v);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_in_place() {
        let mut p = Params::new();
        p.set("a", "1").set("b", "2").set("a", "3");
        assert_eq!(
            p.flatten(),
            vec![
                ("a".to_string(), "3".to_string()),
                ("b".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn test_set_default_keeps_caller_value() {
        let mut p = Params::new().with("oauth_callback", "https://mine.test/cb");
        p.set_default("oauth_callback", "https://default.test/cb");
        p.set_default("x", "y");
        assert_eq!(
            p.get("oauth_callback"),
            Some(&ParamValue::from("https://mine.test/cb"))
        );
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn test_list_values_are_comma_joined() {
        let p = Params::new()
            .with("tags", vec!["a", "b"])
            .with("count", 20i64)
            .with("trim", true);
        assert_eq!(p.get("tags").unwrap().flatten(), "a,b");
        assert_eq!(p.get("count").unwrap().flatten(), "20");
        assert_eq!(p.get("trim").unwrap().flatten(), "true");
    }

    #[test]
    fn test_remove_and_collect() {
        let mut p: Params = vec![("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(p.remove("a"), Some(ParamValue::from("1")));
        assert_eq!(p.remove("a"), None);
        assert!(!p.is_empty());
    }
}

use indexmap::IndexMap;
use serde::Serialize;

use super::query::Separator;

/// Records keyed by their first field, in getent output order.
///
/// A `None` value is a key getent reported as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    entries: IndexMap<String, Option<Vec<String>>>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse getent stdout, one record per line.
    ///
    /// Lines end at `\n` or `\r\n` only; other vertical whitespace stays inside a record.
    pub fn parse(output: &str, separator: Separator) -> Self {
        let mut set = Self::new();
        for line in output.lines() {
            let mut fields = separator.split(line).into_iter();
            let Some(key) = fields.next() else {
                continue;
            };
            set.insert(key, Some(fields.map(str::to_string).collect()));
        }
        set
    }

    /// Insert a record. A repeated key keeps its first position and takes the new value.
    pub fn insert(&mut self, key: &str, values: Option<Vec<String>>) {
        self.entries.insert(key.to_string(), values);
    }

    pub fn get(&self, key: &str) -> Option<&Option<Vec<String>>> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&[String]>)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_passwd_line() {
        let set = ResultSet::parse("root:x:0:0:root:/root:/bin/bash\n", Separator::Char(':'));
        assert_eq!(set.len(), 1);
        assert_eq!(
            set.get("root"),
            Some(&Some(vec![
                "x".to_string(),
                "0".to_string(),
                "0".to_string(),
                "root".to_string(),
                "/root".to_string(),
                "/bin/bash".to_string(),
            ]))
        );
    }

    #[test]
    fn test_parse_keeps_output_order() {
        let out = "zeta:x:3:\nalpha:x:1:\nmid:x:2:\n";
        let set = ResultSet::parse(out, Separator::Char(':'));
        assert_eq!(set.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_duplicate_key_last_wins_in_first_position() {
        let out = "dup:x:1\nother:x:2\ndup:y:3\n";
        let set = ResultSet::parse(out, Separator::Char(':'));
        assert_eq!(set.keys().collect::<Vec<_>>(), vec!["dup", "other"]);
        assert_eq!(
            set.get("dup"),
            Some(&Some(vec!["y".to_string(), "3".to_string()]))
        );
    }

    #[test]
    fn test_parse_hosts_whitespace() {
        let out = "127.0.0.1       localhost\n::1             localhost ip6-localhost\n";
        let set = ResultSet::parse(out, Separator::Whitespace);
        assert_eq!(
            set.get("::1"),
            Some(&Some(vec![
                "localhost".to_string(),
                "ip6-localhost".to_string()
            ]))
        );
        assert_eq!(
            set.get("127.0.0.1"),
            Some(&Some(vec!["localhost".to_string()]))
        );
    }

    #[test]
    fn test_blank_lines_skipped_under_whitespace() {
        let set = ResultSet::parse("\n   \nhttp 80/tcp www\n", Separator::Whitespace);
        assert_eq!(set.len(), 1);
        assert!(set.contains_key("http"));
    }

    #[test]
    fn test_empty_output() {
        assert!(ResultSet::parse("", Separator::Char(':')).is_empty());
    }

    #[test]
    fn test_serialize_as_ordered_object() {
        let mut set = ResultSet::parse("b:1\na:2\n", Separator::Char(':'));
        set.insert("missing", None);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"b":["1"],"a":["2"],"missing":null}"#);
    }

    #[test]
    fn test_only_newline_ends_a_record() {
        let set = ResultSet::parse("a:1\x0cb:2\r\nc:3\n", Separator::Char(':'));
        assert_eq!(set.keys().collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(
            set.get("a"),
            Some(&Some(vec!["1\x0cb".to_string(), "2".to_string()]))
        );
    }

    #[test]
    fn test_large_enumeration() {
        let out: String = (0..60_000)
            .map(|i| format!("user{i}:x:{i}:{i}::/home/user{i}:/bin/sh\n"))
            .collect();
        let set = ResultSet::parse(&out, Separator::Char(':'));
        assert_eq!(set.len(), 60_000);
        assert_eq!(set.keys().next(), Some("user0"));
        assert_eq!(set.keys().last(), Some("user59999"));
    }
}

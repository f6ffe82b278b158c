/// Databases whose records are colon-separated by convention.
pub const COLON_DATABASES: &[&str] = &["passwd", "shadow", "group", "gshadow"];

/// How an output line is cut into fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// Split on every occurrence of the character, keeping empty fields.
    Char(char),
    /// Split on runs of whitespace, ignoring leading and trailing whitespace.
    Whitespace,
}

impl Separator {
    pub fn split<'a>(&self, line: &'a str) -> Vec<&'a str> {
        match self {
            Separator::Char(c) => line.split(*c).collect(),
            Separator::Whitespace => line.split_whitespace().collect(),
        }
    }
}

/// A single getent lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    database: String,
    key: Option<String>,
    split: Option<char>,
    fail_on_missing_key: bool,
}

impl Query {
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            key: None,
            split: None,
            fail_on_missing_key: true,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_split(mut self, split: char) -> Self {
        self.split = Some(split);
        self
    }

    pub fn fail_on_missing_key(mut self, fail: bool) -> Self {
        self.fail_on_missing_key = fail;
        self
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn split(&self) -> Option<char> {
        self.split
    }

    pub fn fails_on_missing_key(&self) -> bool {
        self.fail_on_missing_key
    }

    /// Explicit split wins, then the colon convention, then whitespace.
    pub fn separator(&self) -> Separator {
        match self.split {
            Some(c) => Separator::Char(c),
            None if COLON_DATABASES.contains(&self.database.as_str()) => Separator::Char(':'),
            None => Separator::Whitespace,
        }
    }

    /// Arguments passed to getent, without the program itself.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![self.database.clone()];
        if let Some(key) = &self.key {
            args.push(key.clone());
        }
        args
    }

    /// Name the result set is published under, e.g. `getent_passwd`.
    pub fn result_name(&self) -> String {
        format!("getent_{}", self.database)
    }
}

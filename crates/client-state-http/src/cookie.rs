//! Request and response cookies.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cookie as received from the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A cookie to be set on the response.
///
/// `Display` renders the `Set-Cookie` header value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCookie {
    pub name: String,
    pub value: String,
    pub path: String,
    /// Lifetime in seconds, rendered as `Max-Age`.
    pub max_age: Option<u64>,
    /// Only sent over encrypted transport.
    pub secure: bool,
    /// Hidden from client-side scripts.
    pub http_only: bool,
}

impl NewCookie {
    /// A secure, non-http-only cookie without `Max-Age`.
    pub fn new(name: impl Into<String>, value: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: path.into(),
            max_age: None,
            secure: true,
            http_only: false,
        }
    }

    /// A cookie that makes the client drop `name` at `path`.
    pub fn removal(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name, "", path).with_max_age(0)
    }

    pub fn with_max_age(mut self, seconds: u64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Whether this cookie clears the client's copy.
    pub fn is_removal(&self) -> bool {
        self.max_age == Some(0)
    }

    /// The cookie the client will send back.
    pub fn to_cookie(&self) -> Cookie {
        Cookie::new(self.name.clone(), self.value.clone())
    }
}

impl fmt::Display for NewCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)?;
        if !self.path.is_empty() {
            write!(f, "; Path={}", self.path)?;
        }
        if let Some(max_age) = self.max_age {
            write!(f, "; Max-Age={max_age}")?;
        }
        if self.secure {
            f.write_str("; Secure")?;
        }
        if self.http_only {
            f.write_str("; HttpOnly")?;
        }
        Ok(())
    }
}

impl From<&NewCookie> for Cookie {
    fn from(c: &NewCookie) -> Self {
        c.to_cookie()
    }
}

/// Parse a `Cookie:` request header.
///
/// Pairs are separated by `;`. Surrounding whitespace is trimmed and pairs
/// without `=` or with an empty name are skipped. Order is preserved and
/// repeated names are kept, since a client may hold several cookies of the
/// same name under different paths.
pub fn parse_cookie_header(header: &str) -> Vec<Cookie> {
    header
        .split(';')
        .filter_map(|pair| {
            let pair = pair.trim();
            if pair.is_empty() {
                return None;
            }
            match pair.split_once('=') {
                Some((name, value)) if !name.trim().is_empty() => {
                    Some(Cookie::new(name.trim(), value.trim()))
                }
                _ => {
                    tracing::trace!("skipping malformed cookie pair");
                    None
                }
            }
        })
        .collect()
}

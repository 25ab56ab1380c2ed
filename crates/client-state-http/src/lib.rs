//! # Client State HTTP
//!
//! Minimal cookie types for carrying client-side state tokens.
//!
//! - [`Cookie`] - A name/value pair as sent back by the client
//! - [`NewCookie`] - A cookie to set on the response, rendered as a
//!   `Set-Cookie` header value through `Display`
//! - [`parse_cookie_header`] - Split a `Cookie:` request header into cookies

pub mod cookie;

pub use cookie::{parse_cookie_header, Cookie, NewCookie};

use std::fmt::Display;

/// Abstraction allowing to help with the handling of URLs
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Url {
    inner: String,
}

impl Url {
    /// Build an URL by appending path `segments` to `base`, each segment being
    /// percent-encoded.
    ///
    /// Exactly one `/` separates each part, whether or not `base` ends with one.
    pub fn from_segments(base: &str, segments: &[&str]) -> Self {
        let mut inner = base.trim_end_matches('/').to_owned();
        segments.iter().for_each(|s| {
            inner.push('/');
            inner.push_str(&encode_component(s));
        });
        Url { inner }
    }

    /// Append a query parameter, adding the `?` or `&` separator as needed.
    pub fn with_query_param(mut self, name: &str, value: &str) -> Self {
        let separator = if self.inner.contains('?') { '&' } else { '?' };
        self.inner.push(separator);
        self.inner.push_str(&encode_component(name));
        self.inner.push('=');
        self.inner.push_str(&encode_component(value));
        self
    }

    pub fn get_ref(&self) -> &str {
        self.inner.as_str()
    }
}

impl Display for Url {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

/// Percent-encode every byte of `input` that is not an URL "unreserved" character.
pub fn encode_component(input: &str) -> String {
    let mut ret = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                ret.push(byte as char)
            }
            _ => ret.push_str(&format!("%{:02X}", byte)),
        }
    }
    ret
}

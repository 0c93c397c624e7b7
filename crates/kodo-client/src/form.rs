//! `application/x-www-form-urlencoded` bodies

/// Percent-encode a form value.
///
/// Leaves `A-Z a-z 0-9 - _ . ! ~ * ' ( )` unchanged and escapes everything
/// else byte-wise, matching the service's own query-string encoder.
pub fn form_encode(s: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(b as char),
            _ => {
                out.push('%');
                out.push(HEX[usize::from(b >> 4)] as char);
                out.push(HEX[usize::from(b & 0xf)] as char);
            }
        }
    }
    out
}

/// Ordered form body builder
#[derive(Debug, Clone, Default)]
pub struct FormBody {
    pairs: Vec<String>,
}

impl FormBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `name=value`; repeated names are kept in order
    #[must_use]
    pub fn append(mut self, name: &str, value: &str) -> Self {
        self.pairs
            .push(format!("{}={}", form_encode(name), form_encode(value)));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn finish(self) -> String {
        self.pairs.join("&")
    }
}

//! Recorded signal values

use std::fmt;

/// A value recorded for a signal at some time step.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Four-state bit string, most significant bit first, lowercase
    /// (`0`, `1`, `x`, `z`, plus the rarer nine-value characters).
    Bits(String),
    /// `real` variable value
    Real(f64),
}

impl Value {
    /// The value of a signal before its first recorded change.
    pub fn unknown() -> Self {
        Self::Bits("x".to_string())
    }

    /// Build a bit value, lowercasing and fitting it to `width` bits.
    ///
    /// Shorter values are left-extended following IEEE 1364: `0` and `1`
    /// extend with `0`, any other leading character extends with itself.
    /// Longer values keep their least significant `width` bits.
    pub fn bits(raw: &str, width: u32) -> Self {
        let raw = raw.to_ascii_lowercase();
        let width = width.max(1) as usize;
        let len = raw.len();
        if len == width || len == 0 {
            return Self::Bits(if raw.is_empty() { "x".into() } else { raw });
        }
        if len > width {
            return Self::Bits(raw[len - width..].to_string());
        }
        let pad = match raw.as_bytes()[0] {
            b'0' | b'1' => '0',
            other => other as char,
        };
        let mut extended = String::with_capacity(width);
        extended.extend(std::iter::repeat_n(pad, width - len));
        extended.push_str(&raw);
        Self::Bits(extended)
    }

    /// True when every bit is `0` or `1`.
    pub fn is_binary(&self) -> bool {
        match self {
            Self::Bits(bits) => !bits.is_empty() && bits.bytes().all(|b| b == b'0' || b == b'1'),
            Self::Real(_) => false,
        }
    }

    /// Numeric value of a binary bit string that fits in 64 bits.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Bits(bits) if self.is_binary() && bits.len() <= 64 => {
                u64::from_str_radix(bits, 2).ok()
            }
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Real(v) => Some(*v),
            Self::Bits(_) => self.as_u64().map(|v| v as f64),
        }
    }
}

impl fmt::Display for Value {
    /// Binary values print as decimal numbers, anything carrying `x`/`z`
    /// (or wider than 64 bits) prints as the raw bit string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real(v) => write!(f, "{v}"),
            Self::Bits(bits) => match self.as_u64() {
                Some(n) => write!(f, "{n}"),
                None => f.write_str(bits),
            },
        }
    }
}

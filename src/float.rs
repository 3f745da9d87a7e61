use std::cmp::min;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Significant digits used when rendering floats in flag values
pub(crate) const FLOAT_PRECISION: usize = 10;

/// An `f64` that can be stored in a `HashSet`.
///
/// Equality and hashing are by value, with `0.0 == -0.0`, and with all NaNs
/// considered equal to each other, so that a set holds at most one of each.
#[derive(Debug, Default, Copy, Clone)]
pub struct Float(pub f64);

impl Float {
    fn key(&self) -> u64 {
        if self.0 == 0.0 {
            0.0f64.to_bits()
        } else if self.0.is_nan() {
            f64::NAN.to_bits()
        } else {
            self.0.to_bits()
        }
    }
}

impl PartialEq for Float {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Float {}

impl Hash for Float {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state)
    }
}

impl From<f64> for Float {
    fn from(src: f64) -> Self {
        Self(src)
    }
}

impl From<Float> for f64 {
    fn from(src: Float) -> Self {
        src.0
    }
}

impl fmt::Display for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_general(self.0, FLOAT_PRECISION))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Float {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Float {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Self)
    }
}

/// Render a float with at most `precision` significant digits, choosing
/// between plain and exponent notation like C's `%g`: exponent notation when
/// the decimal exponent is below -4 or at least the number of digits kept.
/// Trailing zeros are dropped, and exponents have at least two digits.
///
/// `1` → "1", `2e20` → "2e+20", `-4.20` → "-4.2", `1e-5` → "1e-05".
pub(crate) fn format_general(v: f64, precision: usize) -> String {
    if v.is_nan() {
        return "NaN".to_owned();
    }
    if v.is_infinite() {
        return if v > 0.0 { "+Inf" } else { "-Inf" }.to_owned();
    }
    if v == 0.0 {
        return if v.is_sign_negative() { "-0" } else { "0" }.to_owned();
    }

    let precision = precision.max(1);
    let sci = format!("{:.*e}", precision - 1, v.abs());
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let Ok(exp) = exp.parse::<i64>() else {
        return sci;
    };

    let mut digits: Vec<u8> = mantissa.bytes().filter(u8::is_ascii_digit).collect();
    while digits.len() > 1 && digits.last() == Some(&b'0') {
        digits.pop();
    }

    let nd = digits.len() as i64;
    let dp = exp + 1;
    let prec = precision as i64;

    let mut out = String::with_capacity(24);
    if v < 0.0 {
        out.push('-');
    }

    let mut eprec = prec;
    if eprec > nd && nd >= dp {
        eprec = nd;
    }
    if exp < -4 || exp >= eprec {
        let kept = min(prec, nd) as usize;
        out.push(char::from(digits[0]));
        if kept > 1 {
            out.push('.');
            out.extend(digits[1..kept].iter().map(|d| char::from(*d)));
        }
        out.push('e');
        out.push(if exp < 0 { '-' } else { '+' });
        let exp = exp.unsigned_abs();
        if exp < 10 {
            out.push('0');
        }
        out.push_str(&exp.to_string());
        return out;
    }

    let digit_at = |i: i64| -> char {
        usize::try_from(i)
            .ok()
            .and_then(|i| digits.get(i))
            .map_or('0', |d| char::from(*d))
    };

    // integer part
    if dp > 0 {
        out.extend((0..dp).map(digit_at));
    } else {
        out.push('0');
    }

    // fraction
    let shown = if prec > dp { nd } else { prec };
    let decimals = (shown - dp).max(0);
    if decimals > 0 {
        out.push('.');
        out.extend((0..decimals).map(|i| digit_at(dp + i)));
    }
    out
}

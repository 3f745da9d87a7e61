//! Signed spans of time with a unit-suffixed text form.

use std::fmt;
use std::str;
use std::time;

/// A signed span of time, stored as a count of nanoseconds.
///
/// The text form is a sequence of decimal numbers, each with a unit suffix,
/// such as "300ms", "-1.5h" or "2h45m". Valid units are "ns", "us" (or "µs"),
/// "ms", "s", "m", "h". Formatting always produces the canonical form, e.g.
/// "72h3m0.5s". Durations under one second use a smaller unit (milli-, micro-,
/// or nanoseconds) so that the leading digit is non-zero, and the zero
/// duration formats as "0s".
///
/// ```
/// use flagkit::Duration;
///
/// let d: Duration = "1h1m10.987654321s".parse().unwrap();
/// assert_eq!(d.as_nanos(), 3_670_987_654_321);
/// assert_eq!(d.to_string(), "1h1m10.987654321s");
///
/// let d: Duration = "-90m".parse().unwrap();
/// assert_eq!(d.to_string(), "-1h30m0s");
/// ```
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration(i64);

/// Errors that can occur when parsing a [`Duration`].
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum DurationError {
    /// The text does not follow the `[-+]?([0-9]*(\.[0-9]*)?[a-z]+)+` shape
    #[error("invalid duration {0:?}")]
    Invalid(String),
    /// A number was not followed by a unit
    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),
    /// A unit suffix that is not one of ns, us, µs, ms, s, m, h
    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit {
        /// The unit as it appeared
        unit: String,
        /// The full text being parsed
        input: String,
    },
    /// The value does not fit in 64 bits of nanoseconds
    #[error("duration {0:?} out of range")]
    Overflow(String),
}

impl Duration {
    /// One nanosecond
    pub const NANOSECOND: Self = Self(1);
    /// One microsecond
    pub const MICROSECOND: Self = Self(1_000);
    /// One millisecond
    pub const MILLISECOND: Self = Self(1_000_000);
    /// One second
    pub const SECOND: Self = Self(1_000_000_000);
    /// One minute
    pub const MINUTE: Self = Self(60 * 1_000_000_000);
    /// One hour
    pub const HOUR: Self = Self(3600 * 1_000_000_000);
    /// The zero duration
    pub const ZERO: Self = Self(0);

    /// Make a duration from a count of nanoseconds
    pub const fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    /// Make a duration from a count of whole seconds, saturating on overflow
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs.saturating_mul(Self::SECOND.0))
    }

    /// Make a duration from a count of milliseconds, saturating on overflow
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis.saturating_mul(Self::MILLISECOND.0))
    }

    /// The duration as a count of nanoseconds
    pub const fn as_nanos(&self) -> i64 {
        self.0
    }

    /// True if this duration is less than zero
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl std::ops::Neg for Duration {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.wrapping_neg())
    }
}

impl TryFrom<time::Duration> for Duration {
    type Error = std::num::TryFromIntError;

    fn try_from(src: time::Duration) -> Result<Self, Self::Error> {
        Ok(Self(i64::try_from(src.as_nanos())?))
    }
}

impl TryFrom<Duration> for time::Duration {
    type Error = std::num::TryFromIntError;

    fn try_from(src: Duration) -> Result<Self, Self::Error> {
        Ok(time::Duration::from_nanos(u64::try_from(src.0)?))
    }
}

fn unit_nanos(unit: &str) -> Option<u64> {
    Some(match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => 1_000,
        "ms" => 1_000_000,
        "s" => 1_000_000_000,
        "m" => 60 * 1_000_000_000,
        "h" => 3600 * 1_000_000_000,
        _ => return None,
    })
}

// Consume leading digits, returning the value and the rest.
// None on overflow.
fn leading_int(s: &str) -> Option<(u64, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (digits, rest) = s.split_at(end);
    let mut v: u64 = 0;
    for c in digits.bytes() {
        v = v.checked_mul(10)?.checked_add(u64::from(c - b'0'))?;
        if v > 1 << 63 {
            return None;
        }
    }
    Some((v, rest))
}

// Consume leading digits after a decimal point. Digits beyond what fits are
// dropped, they cannot change the result at nanosecond resolution.
fn leading_fraction(s: &str) -> (u64, f64, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (digits, rest) = s.split_at(end);
    let mut v: u64 = 0;
    let mut scale = 1.0;
    let mut overflow = false;
    for c in digits.bytes() {
        if overflow {
            continue;
        }
        match v.checked_mul(10).and_then(|x| x.checked_add(u64::from(c - b'0'))) {
            Some(next) if next <= 1 << 63 => {
                v = next;
                scale *= 10.0;
            }
            _ => overflow = true,
        }
    }
    (v, scale, rest)
}

impl str::FromStr for Duration {
    type Err = DurationError;

    fn from_str(orig: &str) -> Result<Self, Self::Err> {
        let invalid = || DurationError::Invalid(orig.to_owned());
        let overflow = || DurationError::Overflow(orig.to_owned());

        let (neg, mut s) = match orig.as_bytes().first() {
            Some(b'-') => (true, &orig[1..]),
            Some(b'+') => (false, &orig[1..]),
            _ => (false, orig),
        };

        if s == "0" {
            return Ok(Self::ZERO);
        }
        if s.is_empty() {
            return Err(invalid());
        }

        let mut total: u64 = 0;
        while !s.is_empty() {
            // The next character must be [0-9.]
            if !s.starts_with(|c: char| c == '.' || c.is_ascii_digit()) {
                return Err(invalid());
            }

            let before = s.len();
            let (mut v, rest) = leading_int(s).ok_or_else(invalid)?;
            s = rest;
            let pre = before != s.len();

            let mut frac = None;
            if let Some(rest) = s.strip_prefix('.') {
                let before = rest.len();
                let (f, scale, rest) = leading_fraction(rest);
                if before != rest.len() {
                    frac = Some((f, scale));
                }
                s = rest;
            }
            if !pre && frac.is_none() {
                return Err(invalid());
            }

            let unit_end = s
                .find(|c: char| c == '.' || c.is_ascii_digit())
                .unwrap_or(s.len());
            if unit_end == 0 {
                return Err(DurationError::MissingUnit(orig.to_owned()));
            }
            let (unit, rest) = s.split_at(unit_end);
            s = rest;
            let unit_ns = unit_nanos(unit).ok_or_else(|| DurationError::UnknownUnit {
                unit: unit.to_owned(),
                input: orig.to_owned(),
            })?;

            if v > (1 << 63) / unit_ns {
                return Err(overflow());
            }
            v *= unit_ns;
            if let Some((f, scale)) = frac.filter(|(f, _)| *f > 0) {
                // float64 is needed to be nanosecond accurate for fractions of hours.
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let extra = (f as f64 * (unit_ns as f64 / scale)) as u64;
                v = v.checked_add(extra).ok_or_else(overflow)?;
                if v > 1 << 63 {
                    return Err(overflow());
                }
            }
            total = total.checked_add(v).ok_or_else(overflow)?;
            if total > 1 << 63 {
                return Err(overflow());
            }
        }

        if neg {
            // 1 << 63 is allowed here, it is exactly i64::MIN
            return Ok(Self((total as i64).wrapping_neg()));
        }
        i64::try_from(total).map(Self).map_err(|_| overflow())
    }
}

impl fmt::Display for Duration {
    // largest time is 2562047h47m16.854775807s
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0u8; 32];
        let mut w = buf.len();

        let neg = self.0 < 0;
        let mut u = self.0.unsigned_abs();

        if u < Self::SECOND.0 as u64 {
            // Special case: if duration is smaller than a second,
            // use smaller units, like 1.2ms
            let prec;
            w -= 1;
            buf[w] = b's';
            w -= 1;
            if u == 0 {
                return f.write_str("0s");
            } else if u < Self::MICROSECOND.0 as u64 {
                prec = 0;
                buf[w] = b'n';
            } else if u < Self::MILLISECOND.0 as u64 {
                prec = 3;
                // U+00B5 'µ' micro sign == 0xC2 0xB5
                w -= 1;
                buf[w] = 0xC2;
                buf[w + 1] = 0xB5;
            } else {
                prec = 6;
                buf[w] = b'm';
            }
            let (w2, rest) = fmt_frac(&mut buf[..w], u, prec);
            w = fmt_int(&mut buf[..w2], rest);
        } else {
            w -= 1;
            buf[w] = b's';

            let (w2, rest) = fmt_frac(&mut buf[..w], u, 9);
            u = rest;

            // u is now integer seconds
            w = fmt_int(&mut buf[..w2], u % 60);
            u /= 60;

            // u is now integer minutes
            if u > 0 {
                w -= 1;
                buf[w] = b'm';
                w = fmt_int(&mut buf[..w], u % 60);
                u /= 60;

                // u is now integer hours
                if u > 0 {
                    w -= 1;
                    buf[w] = b'h';
                    w = fmt_int(&mut buf[..w], u);
                }
            }
        }

        if neg {
            w -= 1;
            buf[w] = b'-';
        }

        f.write_str(str::from_utf8(&buf[w..]).map_err(|_| fmt::Error)?)
    }
}

// Format the fraction of v / 10**prec (e.g. ".12345") into the tail of buf,
// omitting trailing zeros. Omits the decimal point when the fraction is 0.
// Returns the index where the output begins and v / 10**prec.
fn fmt_frac(buf: &mut [u8], mut v: u64, prec: u8) -> (usize, u64) {
    let mut w = buf.len();
    let mut print = false;
    for _ in 0..prec {
        let digit = v % 10;
        print = print || digit != 0;
        if print {
            w -= 1;
            buf[w] = digit as u8 + b'0';
        }
        v /= 10;
    }
    if print {
        w -= 1;
        buf[w] = b'.';
    }
    (w, v)
}

// Format v into the tail of buf, returning the index where the output begins.
fn fmt_int(buf: &mut [u8], mut v: u64) -> usize {
    let mut w = buf.len();
    if v == 0 {
        w -= 1;
        buf[w] = b'0';
    } else {
        while v > 0 {
            w -= 1;
            buf[w] = (v % 10) as u8 + b'0';
            v /= 10;
        }
    }
    w
}

#[cfg(feature = "serde")]
impl serde::Serialize for Duration {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Duration {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

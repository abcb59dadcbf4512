//! String to value conversions for defaults and flag inputs.
//!
//! Every type has a strict parser (`parse_*`), used when a flag receives a value on the Cli,
//! and a lenient `default_*` counterpart which maps the empty string to the zero value.
use std::time::Duration;
use thiserror::Error;

/// The reason a string could not be converted to a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseValueError {
    /// The input is not a literal of the requested type.
    #[error("parsing {input:?}: invalid syntax")]
    Syntax {
        /// The offending input.
        input: String,
    },
    /// The input is a literal, but does not fit the requested type.
    #[error("parsing {input:?}: value out of range")]
    Range {
        /// The offending input.
        input: String,
    },
    /// The input is not a duration.
    #[error("invalid duration {input:?}")]
    InvalidDuration {
        /// The offending input.
        input: String,
    },
    /// A duration component has no unit (ex: `10`).
    #[error("missing unit in duration {input:?}")]
    MissingUnit {
        /// The offending input.
        input: String,
    },
    /// A duration component uses an unknown unit (ex: `10y`).
    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit {
        /// The unrecognized unit.
        unit: String,
        /// The offending input.
        input: String,
    },
}

impl ParseValueError {
    fn syntax(input: &str) -> Self {
        ParseValueError::Syntax {
            input: input.to_string(),
        }
    }

    fn range(input: &str) -> Self {
        ParseValueError::Range {
            input: input.to_string(),
        }
    }
}

/// Parse a boolean literal: `1 t T TRUE true True 0 f F FALSE false False`.
pub fn parse_bool(input: &str) -> Result<bool, ParseValueError> {
    match input {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ParseValueError::syntax(input)),
    }
}

/// Parse a platform sized signed integer, allowing base prefixes (`0x`, `0o`, `0b`, `0`).
pub fn parse_int(input: &str) -> Result<isize, ParseValueError> {
    let value = parse_signed(input, isize::BITS)?;
    isize::try_from(value).map_err(|_| ParseValueError::range(input))
}

/// Parse a 64-bit signed integer, allowing base prefixes (`0x`, `0o`, `0b`, `0`).
pub fn parse_int64(input: &str) -> Result<i64, ParseValueError> {
    parse_signed(input, i64::BITS)
}

/// Parse a platform sized unsigned integer, allowing base prefixes (`0x`, `0o`, `0b`, `0`).
pub fn parse_uint(input: &str) -> Result<usize, ParseValueError> {
    let value = parse_unsigned(input, usize::BITS)?;
    usize::try_from(value).map_err(|_| ParseValueError::range(input))
}

/// Parse a 64-bit unsigned integer, allowing base prefixes (`0x`, `0o`, `0b`, `0`).
pub fn parse_uint64(input: &str) -> Result<u64, ParseValueError> {
    parse_unsigned(input, u64::BITS)
}

/// Parse a 64-bit float.
/// A finite literal which overflows to infinity is out of range.
pub fn parse_float64(input: &str) -> Result<f64, ParseValueError> {
    let value: f64 = input
        .replace('_', "")
        .parse()
        .map_err(|_| ParseValueError::syntax(input))?;

    if value.is_infinite() && !input.to_ascii_lowercase().contains("inf") {
        return Err(ParseValueError::range(input));
    }

    Ok(value)
}

// Nanoseconds per unit.
const UNITS: [(&str, u128); 8] = [
    ("ns", 1),
    ("us", 1_000),
    ("µs", 1_000),
    ("μs", 1_000),
    ("ms", 1_000_000),
    ("s", 1_000_000_000),
    ("m", 60_000_000_000),
    ("h", 3_600_000_000_000),
];

/// Parse a duration such as `300ms`, `1.5h` or `2h45m`.
///
/// Valid units are `ns`, `us` (or `µs`), `ms`, `s`, `m`, `h`.
/// The bare literal `0` needs no unit.
pub fn parse_duration(input: &str) -> Result<Duration, ParseValueError> {
    let invalid = || ParseValueError::InvalidDuration {
        input: input.to_string(),
    };
    let mut remaining = input.strip_prefix('+').unwrap_or(input);

    if remaining == "0" {
        return Ok(Duration::ZERO);
    }

    if remaining.is_empty() || remaining.starts_with('-') {
        return Err(invalid());
    }

    let mut total: u128 = 0;

    while !remaining.is_empty() {
        let whole_end = remaining
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(remaining.len());
        let (whole, rest) = remaining.split_at(whole_end);
        let (fraction, rest) = match rest.strip_prefix('.') {
            Some(after_dot) => {
                let fraction_end = after_dot
                    .find(|c: char| !c.is_ascii_digit())
                    .unwrap_or(after_dot.len());
                after_dot.split_at(fraction_end)
            }
            None => ("", rest),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }

        let unit_end = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (unit, rest) = rest.split_at(unit_end);

        if unit.is_empty() {
            return Err(ParseValueError::MissingUnit {
                input: input.to_string(),
            });
        }

        let scale = UNITS
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, scale)| *scale)
            .ok_or_else(|| ParseValueError::UnknownUnit {
                unit: unit.to_string(),
                input: input.to_string(),
            })?;

        let whole_nanos = if whole.is_empty() {
            0
        } else {
            whole
                .parse::<u128>()
                .ok()
                .and_then(|w| w.checked_mul(scale))
                .ok_or_else(invalid)?
        };
        // Digits beyond nanosecond precision don't contribute.
        let fraction = &fraction[..fraction.len().min(18)];
        let fraction_nanos = if fraction.is_empty() {
            0
        } else {
            let digits: u128 = fraction.parse().map_err(|_| invalid())?;
            digits * scale / 10u128.pow(fraction.len() as u32)
        };

        total = total
            .checked_add(whole_nanos + fraction_nanos)
            .ok_or_else(invalid)?;
        remaining = rest;
    }

    let seconds = u64::try_from(total / 1_000_000_000).map_err(|_| invalid())?;
    Ok(Duration::new(seconds, (total % 1_000_000_000) as u32))
}

/// Render a duration the way [`parse_duration`] reads it (ex: `1h30m0s`, `1.5s`, `300ms`).
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();

    if nanos == 0 {
        return "0s".to_string();
    }

    if nanos < 1_000_000_000 {
        let (unit, scale) = if nanos < 1_000 {
            ("ns", 1)
        } else if nanos < 1_000_000 {
            ("µs", 1_000)
        } else {
            ("ms", 1_000_000)
        };
        return format!("{}{unit}", decimal(nanos, scale));
    }

    let seconds = duration.as_secs();
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let mut out = String::default();

    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }

    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }

    let second_nanos = u128::from(seconds % 60) * 1_000_000_000 + u128::from(duration.subsec_nanos());
    out.push_str(&format!("{}s", decimal(second_nanos, 1_000_000_000)));
    out
}

fn decimal(value: u128, scale: u128) -> String {
    let whole = value / scale;
    let fraction = value % scale;

    if fraction == 0 {
        whole.to_string()
    } else {
        let width = scale.to_string().len() - 1;
        let digits = format!("{fraction:0width$}");
        format!("{whole}.{}", digits.trim_end_matches('0'))
    }
}

/// Parse a boolean default; the empty string is `false`.
pub fn default_bool(input: &str) -> Result<bool, ParseValueError> {
    lenient(input, parse_bool)
}

/// Parse a duration default; the empty string is zero.
pub fn default_duration(input: &str) -> Result<Duration, ParseValueError> {
    lenient(input, parse_duration)
}

/// Parse a float default; the empty string is `0.0`.
pub fn default_float64(input: &str) -> Result<f64, ParseValueError> {
    lenient(input, parse_float64)
}

/// Parse a platform integer default; the empty string is `0`.
pub fn default_int(input: &str) -> Result<isize, ParseValueError> {
    lenient(input, parse_int)
}

/// Parse a 64-bit integer default; the empty string is `0`.
pub fn default_int64(input: &str) -> Result<i64, ParseValueError> {
    lenient(input, parse_int64)
}

/// Parse a platform unsigned integer default; the empty string is `0`.
pub fn default_uint(input: &str) -> Result<usize, ParseValueError> {
    lenient(input, parse_uint)
}

/// Parse a 64-bit unsigned integer default; the empty string is `0`.
pub fn default_uint64(input: &str) -> Result<u64, ParseValueError> {
    lenient(input, parse_uint64)
}

fn lenient<T: Default>(
    input: &str,
    parse: impl Fn(&str) -> Result<T, ParseValueError>,
) -> Result<T, ParseValueError> {
    if input.is_empty() {
        Ok(T::default())
    } else {
        parse(input)
    }
}

fn parse_signed(input: &str, bits: u32) -> Result<i64, ParseValueError> {
    let (negative, body) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };
    let magnitude = parse_magnitude(input, body)?;
    let limit: u64 = 1 << (bits - 1);

    if negative {
        if magnitude > limit {
            return Err(ParseValueError::range(input));
        }
        // -limit is representable, so wrap through i128.
        Ok((-(magnitude as i128)) as i64)
    } else {
        if magnitude >= limit {
            return Err(ParseValueError::range(input));
        }
        Ok(magnitude as i64)
    }
}

fn parse_unsigned(input: &str, bits: u32) -> Result<u64, ParseValueError> {
    let body = input.strip_prefix('+').unwrap_or(input);

    if body.starts_with('-') {
        return Err(ParseValueError::syntax(input));
    }

    let magnitude = parse_magnitude(input, body)?;

    if bits < u64::BITS && magnitude >= 1 << bits {
        return Err(ParseValueError::range(input));
    }

    Ok(magnitude)
}

// Parses the unsigned digits of a base-0 integer literal.
fn parse_magnitude(input: &str, body: &str) -> Result<u64, ParseValueError> {
    let lower = body.to_ascii_lowercase();
    let (radix, digits) = if let Some(rest) = lower.strip_prefix("0x") {
        (16, rest)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (8, rest)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (2, rest)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (8, &lower[1..])
    } else {
        (10, lower.as_str())
    };

    if !underscores_ok(digits, radix != 10) {
        return Err(ParseValueError::syntax(input));
    }

    let digits = digits.replace('_', "");

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(ParseValueError::syntax(input));
    }

    u64::from_str_radix(&digits, radix).map_err(|_| ParseValueError::range(input))
}

// Underscores may only separate digits, or follow a base prefix.
fn underscores_ok(digits: &str, prefixed: bool) -> bool {
    let mut previous_is_digit = prefixed;
    let mut previous_is_underscore = false;

    for c in digits.chars() {
        if c == '_' {
            if !previous_is_digit {
                return false;
            }
            previous_is_digit = false;
            previous_is_underscore = true;
        } else {
            previous_is_digit = true;
            previous_is_underscore = false;
        }
    }

    !previous_is_underscore
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Numeric token parsing and printing
//!
//! Parsing is strict: the whole token must be consumed, so `1.0abc` is an
//! error rather than `1.0`. Printing mirrors C's `%.16g`, which is what
//! other WKT producers emit and what round-trips a double exactly enough
//! for our epsilon comparisons.

/// Significant digits used when printing doubles into WKT
pub const WKT_PRECISION: i32 = 16;

/// Parse a finite double, rejecting any trailing characters
#[inline]
pub fn parse_f64_strict(token: &str) -> Option<f64> {
    if token.is_empty() {
        return None;
    }
    match fast_float::parse::<f64, _>(token) {
        Ok(value) if value.is_finite() => Some(value),
        _ => None,
    }
}

/// Parse a signed integer, rejecting any trailing characters
#[inline]
pub fn parse_i64_strict(token: &str) -> Option<i64> {
    lexical_core::parse::<i64>(token.as_bytes()).ok()
}

/// Format a double with `%.16g` semantics
///
/// Trailing zeros are stripped, scientific notation is used when the
/// decimal exponent is below -4 or at least the precision.
pub fn format_g16(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let scientific = format!("{:.*e}", (WKT_PRECISION - 1) as usize, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some(parts) => parts,
        None => return scientific,
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= WKT_PRECISION {
        format!(
            "{}e{}{:02}",
            strip_trailing_zeros(mantissa),
            if exponent < 0 { '-' } else { '+' },
            exponent.abs()
        )
    } else {
        let decimals = (WKT_PRECISION - 1 - exponent).max(0) as usize;
        strip_trailing_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn strip_trailing_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_f64_strict() {
        assert_eq!(parse_f64_strict("1"), Some(1.0));
        assert_eq!(parse_f64_strict("-2.5"), Some(-2.5));
        assert_eq!(parse_f64_strict("1.5E-10"), Some(1.5e-10));
        assert_eq!(parse_f64_strict("0.0174532925199433"), Some(0.0174532925199433));
    }

    #[test]
    fn test_parse_f64_rejects_partial_tokens() {
        assert_eq!(parse_f64_strict(""), None);
        assert_eq!(parse_f64_strict("1.0abc"), None);
        assert_eq!(parse_f64_strict("1.0 "), None);
        assert_eq!(parse_f64_strict("abc"), None);
        assert_eq!(parse_f64_strict("inf"), None);
        assert_eq!(parse_f64_strict("nan"), None);
    }

    #[test]
    fn test_parse_i64_strict() {
        assert_eq!(parse_i64_strict("11000"), Some(11000));
        assert_eq!(parse_i64_strict("-3"), Some(-3));
        assert_eq!(parse_i64_strict("11000x"), None);
        assert_eq!(parse_i64_strict("1.0"), None);
        assert_eq!(parse_i64_strict(""), None);
    }

    #[test]
    fn test_format_g16_integers() {
        assert_eq!(format_g16(1.0), "1");
        assert_eq!(format_g16(2.0), "2");
        assert_eq!(format_g16(-150.0), "-150");
        assert_eq!(format_g16(0.0), "0");
        assert_eq!(format_g16(11000.0), "11000");
    }

    #[test]
    fn test_format_g16_fractions() {
        assert_eq!(format_g16(0.5), "0.5");
        assert_eq!(format_g16(0.3048), "0.3048");
        assert_eq!(
            format_g16(std::f64::consts::PI / 180.0),
            "0.0174532925199433"
        );
        assert_eq!(format_g16(1200.0 / 3937.0), "0.3048006096012192");
    }

    #[test]
    fn test_format_g16_scientific() {
        assert_eq!(format_g16(1.5e-10), "1.5e-10");
        assert_eq!(format_g16(0.00001), "1e-05");
        assert_eq!(format_g16(1e20), "1e+20");
        assert_eq!(format_g16(0.0001), "0.0001");
    }

    #[test]
    fn test_format_then_parse_recovers_value() {
        for value in [0.1, 1.0 / 3.0, 6378137.0, 298.257223563, -1e-7] {
            let text = format_g16(value);
            let parsed = parse_f64_strict(&text).unwrap();
            assert!((parsed - value).abs() <= value.abs() * 1e-15);
        }
    }
}

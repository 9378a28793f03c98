// Copyright (C) 2025 Category Labs, Inc.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

/// Significant digits used for every floating point field.
pub const SIGNIFICANT_DIGITS: usize = 15;

/// Formats `value` the way `printf("%.15g")` does.
pub fn format_double(value: f64) -> String {
    format_significant(value, SIGNIFICANT_DIGITS)
}

/// Shortest of fixed or scientific notation with `digits` significant
/// digits, trailing zeros removed (`%g` semantics).
pub fn format_significant(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let digits = digits.max(1);
    // rounding to `digits` may bump the exponent, so take it from the rounded form
    let scientific = format!("{:.*e}", digits - 1, value);
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (digits as i32 - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, "0")]
    #[case(1.0, "1")]
    #[case(1000.0, "1000")]
    #[case(1200.0, "1200")]
    #[case(0.1, "0.1")]
    #[case(-2.5, "-2.5")]
    #[case(1.0 / 3.0, "0.333333333333333")]
    #[case(2.0 / 3.0, "0.666666666666667")]
    #[case(1e20, "1e+20")]
    #[case(1.5e-5, "1.5e-05")]
    #[case(0.0001, "0.0001")]
    #[case(123456789012345678.0, "1.23456789012346e+17")]
    #[case(999999999999999.0, "999999999999999")]
    #[case(9999999999999999.0, "1e+16")]
    fn formats_like_printf_g(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_double(value), expected);
    }

    #[test]
    fn millisecond_scaling_stays_exact() {
        assert_eq!(format_double(1000.0 * 1.2), "1200");
        assert_eq!(format_double(1000.0 * 0.000123), "0.123");
    }

    #[test]
    fn lower_precision() {
        assert_eq!(format_significant(3.14159, 3), "3.14");
        assert_eq!(format_significant(31415.9, 3), "3.14e+04");
    }
}

//! Text formats the generator settings keep for element deletion and scaling.
//!
//! Both formats are forgiving: anything unparseable is dropped or replaced by
//! a neutral value, and the parsed value is written back in canonical form.

use log::debug;

/// Significant digits used when printing scale factors.
pub const SCALE_SIGNIFICANT_DIGITS: usize = 8;

/// Inclusive range of element identifiers, `start <= stop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementRange {
    pub start: u32,
    pub stop: u32,
}

impl ElementRange {
    /// Builds a range from two ends given in either order.
    pub fn new(a: u32, b: u32) -> Self {
        Self {
            start: a.min(b),
            stop: a.max(b),
        }
    }

    pub fn contains(&self, identifier: u32) -> bool {
        identifier >= self.start && identifier <= self.stop
    }
}

impl std::fmt::Display for ElementRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.start == self.stop {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.stop)
        }
    }
}

/// Parses `"1-5,9,12-10"` style text into sorted ranges.
///
/// Trailing non-digit characters on each end are ignored; tokens that still
/// fail to parse are skipped.
pub fn parse_element_ranges(text: &str) -> Vec<ElementRange> {
    let mut ranges: Vec<ElementRange> = text
        .split(',')
        .filter_map(|token| {
            let range = parse_range_token(token);
            if range.is_none() && !token.trim().is_empty() {
                debug!("skipping element range token {:?}", token);
            }
            range
        })
        .collect();
    ranges.sort();
    ranges
}

fn parse_range_token(token: &str) -> Option<ElementRange> {
    let mut ends = token.split('-');
    let start = parse_range_end(ends.next()?)?;
    let stop = match ends.next() {
        Some(end) => parse_range_end(end)?,
        None => start,
    };
    Some(ElementRange::new(start, stop))
}

fn parse_range_end(text: &str) -> Option<u32> {
    text.trim_end_matches(|c: char| !c.is_ascii_digit())
        .trim()
        .parse()
        .ok()
}

pub fn format_element_ranges(ranges: &[ElementRange]) -> String {
    ranges
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Identifiers covered by any of the ranges, in input order.
pub fn elements_in_ranges(identifiers: &[u32], ranges: &[ElementRange]) -> Vec<u32> {
    identifiers
        .iter()
        .copied()
        .filter(|id| ranges.iter().any(|r| r.contains(*id)))
        .collect()
}

/// Parses `"x*y*z"` scale text. Bad components become 1.0, missing ones
/// repeat the last value, extra ones are dropped.
pub fn parse_scale(text: &str) -> [f64; 3] {
    let values: Vec<f64> = text
        .split('*')
        .map(|component| component.trim().parse::<f64>().unwrap_or(1.0))
        .collect();
    let last = values.last().copied().unwrap_or(1.0);
    let mut scale = [last; 3];
    for (slot, value) in scale.iter_mut().zip(values) {
        *slot = value;
    }
    scale
}

pub fn format_scale(scale: &[f64; 3]) -> String {
    scale
        .iter()
        .map(|v| format_general(*v, SCALE_SIGNIFICANT_DIGITS))
        .collect::<Vec<_>>()
        .join("*")
}

/// Width of node derivative glyphs: 1% of the smallest non-zero scale factor.
pub fn node_derivative_width(scale: &[f64; 3]) -> f64 {
    let min_scale = scale
        .iter()
        .map(|s| s.abs())
        .filter(|s| *s > 0.0)
        .fold(None, |acc: Option<f64>, s| Some(acc.map_or(s, |m| m.min(s))))
        .unwrap_or(1.0);
    0.01 * min_scale
}

/// `%g`-style formatting: `precision` significant digits, trailing zeros
/// removed, exponent form outside `1e-4 <= |v| < 10^precision`.
pub fn format_general(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let precision = precision.max(1);
    let scientific = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => match e.parse::<i32>() {
            Ok(exp) => (m, exp),
            Err(_) => return scientific,
        },
        None => return scientific,
    };

    if exponent < -4 || exponent >= precision as i32 {
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            if exponent < 0 { '-' } else { '+' },
            exponent.abs()
        )
    } else {
        let decimals = (precision as i32 - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

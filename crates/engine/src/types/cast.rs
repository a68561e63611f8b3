//! `cast as` and `castable as`.
use super::{AtomicType, AtomicValue, SingleType, XdmValue};
use crate::error::{Result, XPathError};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use std::str::FromStr;
use xpath2_node::XdmNode;

pub fn cast<'a, N: XdmNode<'a>>(value: &XdmValue<N>, target: &SingleType) -> Result<XdmValue<N>> {
    let ty = AtomicType::from_qname(&target.type_name).ok_or_else(|| {
        XPathError::type_error(format!("Unknown atomic type {}", target.type_name))
    })?;
    let atoms = value.atomize();
    match atoms.as_slice() {
        [] if target.optional => Ok(XdmValue::empty()),
        [atom] => cast_atomic(atom, ty).map(XdmValue::from_atomic),
        _ => Err(XPathError::CastCardinality {
            to: target.to_string(),
            actual: atoms.len(),
        }),
    }
}

pub fn castable<'a, N: XdmNode<'a>>(value: &XdmValue<N>, target: &SingleType) -> bool {
    cast(value, target).is_ok()
}

/// Converts one atomic value to `target`. Casting to the value's own type
/// returns an equal value.
pub fn cast_atomic(value: &AtomicValue, target: AtomicType) -> Result<AtomicValue> {
    if value.atomic_type() == target {
        return Ok(value.clone());
    }
    let fail = || XPathError::cast(value.to_string_value(), value.type_name(), target.name());

    match target {
        AtomicType::String => return Ok(AtomicValue::String(value.to_string_value())),
        AtomicType::UntypedAtomic => {
            return Ok(AtomicValue::UntypedAtomic(value.to_string_value()));
        }
        AtomicType::AnyAtomic | AtomicType::Numeric | AtomicType::QName => return Err(fail()),
        _ => {}
    }

    if let AtomicValue::String(s) | AtomicValue::UntypedAtomic(s) = value {
        return parse_lexical(s.trim(), target).ok_or_else(fail);
    }

    let converted = match (value, target) {
        (AtomicValue::Boolean(b), AtomicType::Integer) => Some(AtomicValue::Integer(*b as i64)),
        (AtomicValue::Boolean(b), AtomicType::Decimal) => {
            Some(AtomicValue::Decimal(Decimal::from(*b as i64)))
        }
        (AtomicValue::Boolean(b), AtomicType::Double) => {
            Some(AtomicValue::Double(if *b { 1.0 } else { 0.0 }))
        }
        (AtomicValue::Integer(i), AtomicType::Boolean) => Some(AtomicValue::Boolean(*i != 0)),
        (AtomicValue::Integer(i), AtomicType::Decimal) => {
            Some(AtomicValue::Decimal(Decimal::from(*i)))
        }
        (AtomicValue::Integer(i), AtomicType::Double) => Some(AtomicValue::Double(*i as f64)),
        (AtomicValue::Decimal(d), AtomicType::Boolean) => Some(AtomicValue::Boolean(!d.is_zero())),
        (AtomicValue::Decimal(d), AtomicType::Integer) => {
            d.trunc().to_i64().map(AtomicValue::Integer)
        }
        (AtomicValue::Decimal(d), AtomicType::Double) => d.to_f64().map(AtomicValue::Double),
        (AtomicValue::Double(d), AtomicType::Boolean) => {
            Some(AtomicValue::Boolean(*d != 0.0 && !d.is_nan()))
        }
        (AtomicValue::Double(d), AtomicType::Integer) => double_to_integer(*d),
        (AtomicValue::Double(d), AtomicType::Decimal) => {
            if d.is_finite() {
                Decimal::from_f64(*d).map(AtomicValue::Decimal)
            } else {
                None
            }
        }
        _ => None,
    };
    converted.ok_or_else(fail)
}

fn double_to_integer(d: f64) -> Option<AtomicValue> {
    if !d.is_finite() {
        return None;
    }
    let truncated = d.trunc();
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return None;
    }
    Some(AtomicValue::Integer(truncated as i64))
}

fn parse_lexical(s: &str, target: AtomicType) -> Option<AtomicValue> {
    match target {
        AtomicType::AnyUri => Some(AtomicValue::AnyUri(s.to_string())),
        AtomicType::Boolean => match s {
            "true" | "1" => Some(AtomicValue::Boolean(true)),
            "false" | "0" => Some(AtomicValue::Boolean(false)),
            _ => None,
        },
        AtomicType::Integer => {
            let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            s.parse().ok().map(AtomicValue::Integer)
        }
        AtomicType::Decimal => {
            if !is_decimal_lexical(s) {
                return None;
            }
            let (negative, unsigned) = match s.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, s.strip_prefix('+').unwrap_or(s)),
            };
            let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
            let whole = if whole.is_empty() { "0" } else { whole };
            let fraction = if fraction.is_empty() { "0" } else { fraction };
            let sign = if negative { "-" } else { "" };
            Decimal::from_str(&format!("{sign}{whole}.{fraction}"))
                .ok()
                .map(AtomicValue::Decimal)
        }
        AtomicType::Double => parse_double(s).map(AtomicValue::Double),
        _ => None,
    }
}

/// `[+-]? (digits ('.' digits?)? | '.' digits)`
fn is_decimal_lexical(s: &str) -> bool {
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((w, f)) => (w, f),
        None => (unsigned, ""),
    };
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    (!whole.is_empty() || !fraction.is_empty()) && all_digits(whole) && all_digits(fraction)
}

fn parse_double(s: &str) -> Option<f64> {
    match s {
        "INF" | "+INF" => return Some(f64::INFINITY),
        "-INF" => return Some(f64::NEG_INFINITY),
        "NaN" => return Some(f64::NAN),
        _ => {}
    }
    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
        None => (s, None),
    };
    if !is_decimal_lexical(mantissa) {
        return None;
    }
    if let Some(exp) = exponent {
        let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }
    s.parse().ok()
}

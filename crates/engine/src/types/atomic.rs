use crate::qname::QName;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::fmt;

/// The atomic types the engine knows about, including the two abstract ones
/// that only appear in sequence types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomicType {
    AnyAtomic,
    Numeric,
    String,
    UntypedAtomic,
    AnyUri,
    Boolean,
    Decimal,
    Integer,
    Double,
    QName,
}

impl AtomicType {
    /// Resolves an `xs:` (or unprefixed) type name.
    pub fn from_qname(name: &QName) -> Option<Self> {
        match name.prefix.as_deref() {
            None | Some("xs") => {}
            Some(_) => return None,
        }
        let ty = match name.local_part.as_str() {
            "anyAtomicType" => AtomicType::AnyAtomic,
            "numeric" => AtomicType::Numeric,
            "string" => AtomicType::String,
            "untypedAtomic" => AtomicType::UntypedAtomic,
            "anyURI" => AtomicType::AnyUri,
            "boolean" => AtomicType::Boolean,
            "decimal" => AtomicType::Decimal,
            "integer" => AtomicType::Integer,
            "double" => AtomicType::Double,
            "QName" => AtomicType::QName,
            _ => return None,
        };
        Some(ty)
    }

    pub fn name(self) -> &'static str {
        match self {
            AtomicType::AnyAtomic => "xs:anyAtomicType",
            AtomicType::Numeric => "xs:numeric",
            AtomicType::String => "xs:string",
            AtomicType::UntypedAtomic => "xs:untypedAtomic",
            AtomicType::AnyUri => "xs:anyURI",
            AtomicType::Boolean => "xs:boolean",
            AtomicType::Decimal => "xs:decimal",
            AtomicType::Integer => "xs:integer",
            AtomicType::Double => "xs:double",
            AtomicType::QName => "xs:QName",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            AtomicType::Numeric | AtomicType::Decimal | AtomicType::Integer | AtomicType::Double
        )
    }

    /// Abstract types have no instances of their own and cannot be cast targets.
    pub fn is_abstract(self) -> bool {
        matches!(self, AtomicType::AnyAtomic | AtomicType::Numeric)
    }

    /// `xs:integer` derives from `xs:decimal`; `xs:numeric` is the union of the
    /// three numeric types. Promotion (decimal to double) is not subtyping.
    pub fn is_subtype_of(self, other: AtomicType) -> bool {
        if self == other || other == AtomicType::AnyAtomic {
            return true;
        }
        match other {
            AtomicType::Decimal => self == AtomicType::Integer,
            AtomicType::Numeric => matches!(
                self,
                AtomicType::Integer | AtomicType::Decimal | AtomicType::Double
            ),
            _ => false,
        }
    }
}

impl fmt::Display for AtomicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AtomicValue {
    String(String),
    UntypedAtomic(String),
    AnyUri(String),
    Boolean(bool),
    Integer(i64),
    Decimal(Decimal),
    Double(f64),
    QName(QName),
}

impl AtomicValue {
    pub fn atomic_type(&self) -> AtomicType {
        match self {
            AtomicValue::String(_) => AtomicType::String,
            AtomicValue::UntypedAtomic(_) => AtomicType::UntypedAtomic,
            AtomicValue::AnyUri(_) => AtomicType::AnyUri,
            AtomicValue::Boolean(_) => AtomicType::Boolean,
            AtomicValue::Integer(_) => AtomicType::Integer,
            AtomicValue::Decimal(_) => AtomicType::Decimal,
            AtomicValue::Double(_) => AtomicType::Double,
            AtomicValue::QName(_) => AtomicType::QName,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.atomic_type().name()
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            AtomicValue::Integer(_) | AtomicValue::Decimal(_) | AtomicValue::Double(_)
        )
    }

    /// True for the types compared and cast as plain strings.
    pub fn is_string_like(&self) -> bool {
        matches!(
            self,
            AtomicValue::String(_) | AtomicValue::UntypedAtomic(_) | AtomicValue::AnyUri(_)
        )
    }

    /// The canonical lexical form.
    pub fn to_string_value(&self) -> String {
        match self {
            AtomicValue::String(s) | AtomicValue::UntypedAtomic(s) | AtomicValue::AnyUri(s) => {
                s.clone()
            }
            AtomicValue::Boolean(b) => b.to_string(),
            AtomicValue::Integer(i) => i.to_string(),
            AtomicValue::Decimal(d) => format_decimal(*d),
            AtomicValue::Double(d) => format_double(*d),
            AtomicValue::QName(q) => q.to_string(),
        }
    }

    /// Numeric value as a double; `None` for non-numeric types.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AtomicValue::Integer(i) => Some(*i as f64),
            AtomicValue::Decimal(d) => d.to_f64(),
            AtomicValue::Double(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for AtomicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_value())
    }
}

impl From<bool> for AtomicValue {
    fn from(value: bool) -> Self {
        AtomicValue::Boolean(value)
    }
}

impl From<i64> for AtomicValue {
    fn from(value: i64) -> Self {
        AtomicValue::Integer(value)
    }
}

impl From<Decimal> for AtomicValue {
    fn from(value: Decimal) -> Self {
        AtomicValue::Decimal(value)
    }
}

impl From<f64> for AtomicValue {
    fn from(value: f64) -> Self {
        AtomicValue::Double(value)
    }
}

impl From<&str> for AtomicValue {
    fn from(value: &str) -> Self {
        AtomicValue::String(value.to_string())
    }
}

pub(crate) fn format_decimal(d: Decimal) -> String {
    d.normalize().to_string()
}

/// Doubles inside `[1e-6, 1e6)` print in plain decimal notation, everything
/// else in `mantissa E exponent` form with at least one fractional digit.
pub(crate) fn format_double(d: f64) -> String {
    if d.is_nan() {
        return "NaN".to_string();
    }
    if d.is_infinite() {
        return if d > 0.0 { "INF" } else { "-INF" }.to_string();
    }
    if d == 0.0 {
        return if d.is_sign_negative() { "-0" } else { "0" }.to_string();
    }
    let magnitude = d.abs();
    if (1e-6..1e6).contains(&magnitude) {
        return d.to_string();
    }
    let formatted = format!("{:E}", d);
    match formatted.split_once('E') {
        Some((mantissa, exponent)) if !mantissa.contains('.') => {
            format!("{}.0E{}", mantissa, exponent)
        }
        _ => formatted,
    }
}

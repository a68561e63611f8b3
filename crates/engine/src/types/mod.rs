mod atomic;
mod cast;
mod sequence;
mod sequence_type;

pub use atomic::{AtomicType, AtomicValue};
pub(crate) use atomic::format_decimal;
pub use cast::{cast, cast_atomic, castable};
pub use sequence::{XdmItem, XdmValue};
pub use sequence_type::{
    ItemType, KindTest, OccurrenceIndicator, SequenceType, SingleType, instance_of, treat_as,
};

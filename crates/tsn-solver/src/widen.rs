//! Numeric-width discipline.
//!
//! Every numeric expression carries a computed width: declared (`int`,
//! `long`) or inferred (`double` by default, since surface `number` is a
//! 64-bit float). Integer-valued literals widen to double in a `number`
//! context and keep integer width in an `int`/`long` context; container
//! elements inherit their container's element context.

use tsn_ir::types::{IrType, PrimitiveName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NumericWidth {
    Int,
    Long,
    Double,
}

impl NumericWidth {
    /// Binary operators pick the widest operand.
    pub fn widest(a: NumericWidth, b: NumericWidth) -> NumericWidth {
        a.max(b)
    }

    /// Whether a value of width `self` may flow into a slot of width `into`
    /// without an explicit conversion.
    pub fn fits_in(self, into: NumericWidth) -> bool {
        self <= into
    }

    pub const fn cs_name(self) -> &'static str {
        match self {
            NumericWidth::Int => "int",
            NumericWidth::Long => "long",
            NumericWidth::Double => "double",
        }
    }
}

/// The width of a numeric type, if it is one.
pub fn width_of(ty: &IrType) -> Option<NumericWidth> {
    match ty {
        IrType::Primitive { name } => match name {
            PrimitiveName::Int => Some(NumericWidth::Int),
            PrimitiveName::Long => Some(NumericWidth::Long),
            PrimitiveName::Number => Some(NumericWidth::Double),
            _ => None,
        },
        IrType::Literal { value } => match value {
            tsn_ir::expr::LiteralValue::Number(_) => Some(NumericWidth::Double),
            _ => None,
        },
        _ => None,
    }
}

/// Whether an integer-valued literal is representable at the given width.
/// Doubles accept any finite literal.
pub fn literal_fits(value: f64, width: NumericWidth) -> bool {
    if !value.is_finite() {
        return false;
    }
    match width {
        NumericWidth::Int => {
            value.fract() == 0.0 && value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX)
        }
        NumericWidth::Long => value.fract() == 0.0 && value.abs() <= 9_007_199_254_740_992.0,
        NumericWidth::Double => true,
    }
}

/// The static type of a numeric literal under a contextual type.
///
/// Integer-valued literals in a `number` context widen to double; in an
/// `int`/`long` context they retain integer width when they fit. Returns
/// `Err(width)` with the violated width when the literal does not fit,
/// which the caller reports as `TSN5110`.
pub fn widen_literal(value: f64, contextual: Option<&IrType>) -> Result<IrType, NumericWidth> {
    let Some(ctx_width) = contextual.and_then(width_of) else {
        // No numeric context: `number` is the default literal type.
        return Ok(IrType::NUMBER);
    };
    match ctx_width {
        NumericWidth::Double => Ok(IrType::NUMBER),
        NumericWidth::Int => {
            if literal_fits(value, NumericWidth::Int) {
                Ok(IrType::INT)
            } else {
                Err(NumericWidth::Int)
            }
        }
        NumericWidth::Long => {
            if literal_fits(value, NumericWidth::Long) {
                Ok(IrType::LONG)
            } else {
                Err(NumericWidth::Long)
            }
        }
    }
}

/// Element context for array literal members: the contextual array's element
/// type, if the context is an array.
pub fn element_context(contextual: Option<&IrType>) -> Option<&IrType> {
    match contextual? {
        IrType::Array { element, .. } => Some(element),
        _ => None,
    }
}

/// Element context for a tuple literal member at a given index.
pub fn tuple_element_context(contextual: Option<&IrType>, index: usize) -> Option<&IrType> {
    match contextual? {
        IrType::Tuple { elements } => elements.get(index),
        _ => None,
    }
}

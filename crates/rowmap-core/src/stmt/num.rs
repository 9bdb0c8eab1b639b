use super::Value;
use crate::Error;

macro_rules! impl_num {
    ( $( $variant:ident($ty:ty) )* ) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }

            impl From<&$ty> for Value {
                fn from(value: &$ty) -> Self {
                    Self::$variant(*value)
                }
            }

            // Integers convert across widths when in range, strings are
            // parsed, and integral floats are accepted.
            impl TryFrom<Value> for $ty {
                type Error = Error;

                fn try_from(value: Value) -> Result<Self, Self::Error> {
                    if let Some(wide) = value.as_i128() {
                        return <$ty>::try_from(wide)
                            .map_err(|_| Error::type_conversion(value, stringify!($ty)));
                    }

                    let converted = match &value {
                        Value::String(s) => s.trim().parse::<$ty>().ok(),
                        Value::F64(f) if f.fract() == 0.0 => <$ty>::try_from(*f as i128).ok(),
                        _ => None,
                    };

                    converted.ok_or_else(|| Error::type_conversion(value, stringify!($ty)))
                }
            }
        )*
    };
}

impl_num! {
    I8(i8)
    I16(i16)
    I32(i32)
    I64(i64)
    U8(u8)
    U16(u16)
    U32(u32)
    U64(u64)
}

impl TryFrom<Value> for f64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        if let Some(wide) = value.as_i128() {
            return Ok(wide as f64);
        }

        match value {
            Value::F64(v) => Ok(v),
            Value::String(ref s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| Error::type_conversion(value.clone(), "f64")),
            value => Err(Error::type_conversion(value, "f64")),
        }
    }
}

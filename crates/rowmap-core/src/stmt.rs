mod num;

mod ty;
pub use ty::Type;

mod ty_enum;
pub use ty_enum::TypeEnum;

mod value;
pub use value::Value;

mod value_enum;
pub use value_enum::ValueEnum;

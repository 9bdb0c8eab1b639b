mod constructor;
pub use constructor::{Build, Constructor};

mod field;
pub use field::{Field, FieldName, Setter};

mod result_map;
pub use result_map::{ConstructorArg, ConstructorMap, ResultMap, ResultProperty};

mod target;
pub use target::{TargetType, TrackingHook};

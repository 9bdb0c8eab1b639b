mod deserializer;
pub use deserializer::Deserializer;

pub mod engine;
pub use engine::{CacheKey, CompiledMapper, MapperCache, TypeHandler, TypeHandlerRegistry};

mod entity;
pub use entity::Entity;

mod request;
pub use request::{Request, Statement};

mod settings;
pub use settings::Settings;

mod tracked;
pub use tracked::Tracked;

pub use rowmap_core::{
    bail, err,
    driver::{self, Column, MemoryRows, RowAccess, RowSource, StreamRows},
    schema::{self, ConstructorArg, Field, ResultMap, TargetType},
    stmt::{self, Type, TypeEnum, Value, ValueEnum},
    Error, Result,
};

//! Turns a result set's shape and a target type into a reusable mapper.
//!
//! Building a mapper is the expensive step and happens once per query shape:
//! [`plan`] matches columns to constructor arguments and fields, resolving a
//! [`Coercion`] for each, and [`mapper`] closes over the resolved plan. The
//! [`MapperCache`] keeps the result for every later execution.

mod cache;
pub use cache::{CacheKey, MapperCache};

mod coerce;
pub use coerce::Coercion;

mod handler;
pub use handler::{EnumHandler, TypeHandler, TypeHandlerRegistry};

pub mod mapper;
pub use mapper::CompiledMapper;

pub mod plan;
pub use plan::{Binding, BindingTarget, Construction, MappingPlan};

use crate::{Request, Settings};
use rowmap_core::{schema::TargetType, Column, Result};

/// Builds the mapper for one query shape.
pub(crate) fn compile<T: 'static>(
    key: CacheKey,
    target: &TargetType<T>,
    columns: &[Column],
    request: &Request,
    result_index: usize,
    settings: &Settings,
    handlers: &TypeHandlerRegistry,
) -> Result<CompiledMapper<T>> {
    let result_map = request.current_result_map(result_index);

    let plan = match plan::build(target, columns, result_map, handlers) {
        Ok(plan) => plan,
        Err(err) => {
            tracing::debug!(%key, target = %target.name, error = %err, "failed to plan mapper");
            return Err(err);
        }
    };

    tracing::debug!(
        %key,
        target = %target.name,
        constructor_args = plan.constructor.len(),
        fields = plan.fields.len(),
        unmatched = plan.unmatched.len(),
        "built mapper"
    );

    mapper::synthesize(key, plan, target, settings, request.change_tracking)
}

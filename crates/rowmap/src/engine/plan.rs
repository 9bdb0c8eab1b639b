//! Matches the columns of a result set to a target type.

use super::{Coercion, TypeHandlerRegistry};
use rowmap_core::{
    schema::{ResultMap, TargetType},
    stmt::Type,
    Column, Error, Result,
};

/// The resolved mapping of one result set shape onto one target type.
#[derive(Debug)]
pub struct MappingPlan {
    /// How instances are created
    pub construction: Construction,

    /// Constructor arguments, in positional order
    pub constructor: Vec<Binding>,

    /// Fields written after construction, in column order
    pub fields: Vec<Binding>,

    /// Columns that feed nothing
    pub unmatched: Vec<Column>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construction {
    /// The parameterless constructor
    Default,

    /// The constructor at this index of [`TargetType::constructors`]
    Constructor(usize),
}

/// Feeds one column into one constructor argument or field.
#[derive(Debug, Clone)]
pub struct Binding {
    pub target: BindingTarget,

    /// Name of the field the binding populates
    pub name: String,

    pub column: Column,

    /// Type of the slot being populated
    pub ty: Type,

    pub nullable: bool,

    pub coercion: Coercion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingTarget {
    /// Position in the constructor's argument list
    Argument(usize),

    /// Index into [`TargetType::fields`]
    Field(usize),
}

/// How a column was matched to a field. Later variants win over earlier ones
/// when two columns claim the same field; within one variant an exact name
/// beats one matched ignoring case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Source {
    Name,
    Declared,
    Configured,
}

/// Builds the mapping plan for `columns` onto `target`.
///
/// Fails when no constructor can be used or when a constructor argument names
/// a column the result set lacks. Columns that match no writable field are
/// recorded as unmatched.
pub fn build<T>(
    target: &TargetType<T>,
    columns: &[Column],
    result_map: Option<&ResultMap>,
    handlers: &TypeHandlerRegistry,
) -> Result<MappingPlan> {
    let mut plan = MappingPlan {
        construction: Construction::Default,
        constructor: vec![],
        fields: vec![],
        unmatched: vec![],
    };

    match result_map.and_then(|map| map.constructor.as_ref()) {
        Some(ctor_map) => {
            let arg_tys: Vec<_> = ctor_map.args.iter().map(|arg| arg.ty.clone()).collect();
            let Some(index) = target
                .constructors
                .iter()
                .position(|ctor| ctor.accepts(&arg_tys))
            else {
                return Err(Error::no_usable_constructor(&target.name));
            };

            plan.construction = Construction::Constructor(index);

            for (position, arg) in ctor_map.args.iter().enumerate() {
                let Some(column) = find_column(columns, &arg.column) else {
                    return Err(Error::missing_mapped_column(&target.name, &arg.column));
                };

                plan.constructor.push(Binding {
                    target: BindingTarget::Argument(position),
                    name: arg.target_name().to_string(),
                    column: column.clone(),
                    ty: arg.ty.clone(),
                    nullable: arg.nullable,
                    coercion: Coercion::resolve(
                        handlers,
                        &arg.ty,
                        arg.nullable,
                        &column.ty,
                        arg.type_handler.as_deref(),
                    )?,
                });
            }
        }
        None => {
            if target.default_constructor_fn().is_none() {
                return Err(Error::no_usable_constructor(&target.name));
            }
        }
    }

    // Field claims in first-claim order. A later column only replaces a claim
    // when it ranks higher.
    let mut claims: Vec<Claim<'_>> = vec![];

    for column in columns {
        if plan
            .constructor
            .iter()
            .any(|binding| binding.column.index == column.index)
        {
            continue;
        }

        let Some(claim) = resolve_field(target, column, result_map) else {
            plan.unmatched.push(column.clone());
            continue;
        };

        let field = target.field_at(claim.index);

        let claimed_by_constructor = plan
            .constructor
            .iter()
            .any(|binding| binding.name == field.name.app_name);

        if !field.is_writable() || claimed_by_constructor {
            plan.unmatched.push(column.clone());
            continue;
        }

        match claims.iter().position(|held| held.index == claim.index) {
            Some(position) if claims[position].rank() < claim.rank() => {
                let displaced = std::mem::replace(&mut claims[position], claim);
                plan.unmatched.push(displaced.column.clone());
            }
            Some(_) => plan.unmatched.push(column.clone()),
            None => claims.push(claim),
        }
    }

    // Only kept claims resolve a coercion, so a displaced column never
    // registers or looks up a handler.
    for claim in claims {
        let field = target.field_at(claim.index);

        plan.fields.push(Binding {
            target: BindingTarget::Field(claim.index),
            name: field.name.app_name.clone(),
            column: claim.column.clone(),
            ty: field.ty.clone(),
            nullable: field.nullable,
            coercion: Coercion::resolve(
                handlers,
                &field.ty,
                field.nullable,
                &claim.column.ty,
                claim.handler.or(field.type_handler.as_deref()),
            )?,
        });
    }

    plan.unmatched.sort_by_key(|column| column.index);

    Ok(plan)
}

/// A column's claim on a field.
struct Claim<'a> {
    index: usize,
    column: &'a Column,
    handler: Option<&'a str>,
    source: Source,

    /// The names matched without folding case
    exact: bool,
}

impl Claim<'_> {
    fn rank(&self) -> (Source, bool) {
        (self.source, self.exact)
    }
}

/// Finds the field `column` feeds, along with a handler configured for it.
///
/// A configured result map property is consulted first, then a column name
/// declared on a field, then a field named like the column.
fn resolve_field<'a, T>(
    target: &TargetType<T>,
    column: &'a Column,
    result_map: Option<&'a ResultMap>,
) -> Option<Claim<'a>> {
    if let Some(property) = result_map.and_then(|map| map.properties.get(&column.name)) {
        if let Some(index) = target.field_index(&property.name) {
            return Some(Claim {
                index,
                column,
                handler: property.type_handler.as_deref(),
                source: Source::Configured,
                exact: true,
            });
        }
    }

    if let Some(index) = target.field_index_by_column(&column.name) {
        let declared = target.field_at(index).name.storage_name.as_deref();

        return Some(Claim {
            index,
            column,
            handler: None,
            source: Source::Declared,
            exact: declared == Some(column.name.as_str()),
        });
    }

    target.field_index(&column.name).map(|index| Claim {
        index,
        column,
        handler: None,
        source: Source::Name,
        exact: target.field_at(index).name.app_name == column.name,
    })
}

fn find_column<'a>(columns: &'a [Column], name: &str) -> Option<&'a Column> {
    columns
        .iter()
        .find(|column| column.name == name)
        .or_else(|| {
            columns
                .iter()
                .find(|column| column.name.eq_ignore_ascii_case(name))
        })
}

use rowmap::{
    Deserializer, Entity, Field, MemoryRows, Request, ResultMap, RowAccess, TargetType, Type,
    TypeHandler, TypeHandlerRegistry, Value,
};
use std::sync::Arc;

/// Reads `Y`/`N` flags as booleans.
#[derive(Debug)]
struct YesNo;

impl TypeHandler for YesNo {
    fn read(&self, row: &dyn RowAccess, index: usize, _target: &Type) -> rowmap::Result<Value> {
        if row.is_null(index) {
            return Ok(Value::Bool(false));
        }

        match row.raw_value(index, &Type::String)?.as_str() {
            Some("Y") => Ok(Value::Bool(true)),
            Some("N") => Ok(Value::Bool(false)),
            _ => rowmap::bail!("expected `Y` or `N` in column `{}`", row.field_name(index)),
        }
    }
}

/// Reads a decimal amount as whole cents.
#[derive(Debug)]
struct Cents;

impl TypeHandler for Cents {
    fn read(&self, row: &dyn RowAccess, index: usize, _target: &Type) -> rowmap::Result<Value> {
        let amount: f64 = row.raw_value(index, &Type::F64)?.try_into()?;
        Ok(Value::I64((amount * 100.0).round() as i64))
    }
}

/// Renders bytes as lowercase hex.
#[derive(Debug)]
struct Hex;

impl TypeHandler for Hex {
    fn read(&self, row: &dyn RowAccess, index: usize, _target: &Type) -> rowmap::Result<Value> {
        let bytes: Vec<u8> = row.raw_value(index, &Type::Bytes)?.try_into()?;
        Ok(Value::from(
            bytes.iter().map(|b| format!("{b:02x}")).collect::<String>(),
        ))
    }
}

#[derive(Debug, Default)]
struct Invoice {
    paid: bool,
    total_cents: i64,
    fingerprint: String,
}

impl Entity for Invoice {
    fn target_type() -> TargetType<Self> {
        TargetType::new("Invoice")
            .default_constructor(Invoice::default)
            .field(Field::new("paid", Type::Bool, |i: &mut Invoice, v| {
                i.paid = v.try_into()?;
                Ok(())
            }))
            .field(
                Field::new("total_cents", Type::I64, |i: &mut Invoice, v| {
                    i.total_cents = v.try_into()?;
                    Ok(())
                })
                .column("total")
                .type_handler("Cents"),
            )
            .field(Field::new("fingerprint", Type::String, |i: &mut Invoice, v| {
                i.fingerprint = v.try_into()?;
                Ok(())
            }))
    }
}

fn deserializer() -> Deserializer {
    let handlers = TypeHandlerRegistry::new();
    handlers.register_named("YesNo", YesNo);
    handlers.register_named("Cents", Cents);
    handlers.register(Type::String, Type::Bytes, Hex);
    Deserializer::default().with_handlers(Arc::new(handlers))
}

fn rows(paid: &str) -> MemoryRows {
    MemoryRows::new([
        ("paid_flag", Type::String),
        ("total", Type::F64),
        ("fingerprint", Type::Bytes),
    ])
    .row(vec![
        Value::from(paid),
        Value::F64(12.5),
        Value::Bytes(vec![0xde, 0xad, 0x01]),
    ])
}

fn request() -> Request {
    Request::named("Invoices.Get")
        .result_map(ResultMap::new("InvoiceMap").property_with_handler("paid_flag", "paid", "YesNo"))
}

#[test]
fn configured_declared_and_registered_handlers() {
    let invoice: Invoice = deserializer()
        .to_single(&mut rows("Y"), &request())
        .unwrap()
        .unwrap();

    assert!(invoice.paid);
    assert_eq!(invoice.total_cents, 1250);
    assert_eq!(invoice.fingerprint, "dead01");
}

#[test]
fn handler_errors_are_fatal_for_the_row() {
    let err = deserializer()
        .to_single::<Invoice, _>(&mut rows("maybe"), &request())
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "failed to read column `paid_flag` into `paid`: expected `Y` or `N` in column `paid_flag`"
    );
}

#[test]
fn wildcard_source_handler() {
    let handlers = TypeHandlerRegistry::new();
    handlers.register_named("Cents", Cents);
    handlers.register(Type::String, Type::Any, Hex);
    let de = Deserializer::default().with_handlers(Arc::new(handlers));

    let mut rows = MemoryRows::new([("fingerprint", Type::Any)])
        .row(vec![Value::Bytes(vec![0x0f])]);

    let invoice: Invoice = de
        .to_single(&mut rows, &Request::named("Invoices.Fingerprint"))
        .unwrap()
        .unwrap();

    assert_eq!(invoice.fingerprint, "0f");
}

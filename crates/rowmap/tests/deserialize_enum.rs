use rowmap::{
    Deserializer, Entity, Field, MemoryRows, Request, TargetType, Type, TypeEnum, Value, ValueEnum,
};

#[derive(Debug, Default, Clone, Copy, PartialEq)]
enum Status {
    #[default]
    Active,
    Suspended,
    Closed,
}

impl Status {
    fn ty() -> TypeEnum {
        TypeEnum::new("Status", ["Active", "Suspended", "Closed"])
    }

    fn from_value(value: Value) -> rowmap::Result<Status> {
        let variant = ValueEnum::try_from(value)?;
        Ok(match variant.variant {
            0 => Status::Active,
            1 => Status::Suspended,
            _ => Status::Closed,
        })
    }
}

#[derive(Debug, Default)]
struct Account {
    status: Status,
    previous: Option<Status>,
}

impl Entity for Account {
    fn target_type() -> TargetType<Self> {
        TargetType::new("Account")
            .default_constructor(Account::default)
            .field(Field::new("status", Status::ty().into(), |a: &mut Account, v| {
                a.status = Status::from_value(v)?;
                Ok(())
            }))
            .field(
                Field::new("previous", Status::ty().into(), |a: &mut Account, v: Value| {
                    a.previous = match v {
                        Value::Null => None,
                        v => Some(Status::from_value(v)?),
                    };
                    Ok(())
                })
                .nullable(),
            )
    }
}

fn map(status: Value, previous: Value) -> rowmap::Result<Account> {
    let mut rows = MemoryRows::new([("status", Type::Any), ("previous", Type::Any)])
        .row(vec![status, previous]);

    Deserializer::default()
        .to_single(&mut rows, &Request::named("Accounts.Get"))
        .map(|account| account.unwrap_or_default())
}

#[test]
fn enum_from_name() {
    let account = map(Value::from("Suspended"), Value::from("closed")).unwrap();
    assert_eq!(account.status, Status::Suspended);
    assert_eq!(account.previous, Some(Status::Closed));
}

#[test]
fn enum_from_ordinal() {
    let account = map(Value::I32(2), Value::U8(0)).unwrap();
    assert_eq!(account.status, Status::Closed);
    assert_eq!(account.previous, Some(Status::Active));
}

#[test]
fn null_enum() {
    let account = map(Value::Null, Value::Null).unwrap();
    assert_eq!(account.status, Status::Active);
    assert_eq!(account.previous, None);
}

#[test]
fn unknown_name_is_a_conversion_error() {
    let err = map(Value::from("Deleted"), Value::Null).unwrap_err();
    assert!(err.root().is_type_conversion());
    assert!(err.to_string().ends_with("cannot convert String to Status"));
}

#[test]
fn enum_handler_registered_once() {
    let de = Deserializer::default();
    let ty = Type::Enum(Status::ty());

    for n in 0..2 {
        let mut rows = MemoryRows::new([("status", Type::String)])
            .row(vec![Value::from("Closed")]);
        let request = Request::named(format!("Accounts.Get{n}"));
        let account: Account = de.to_single(&mut rows, &request).unwrap().unwrap();
        assert_eq!(account.status, Status::Closed);
    }

    assert!(de.handlers().try_find(&ty, &Type::Any).is_some());
}

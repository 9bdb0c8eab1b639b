use pretty_assertions::assert_eq;
use rowmap_core::{
    schema::{ConstructorArg, ResultMap},
    stmt::{Type, TypeEnum},
};

#[test]
fn deserialize_properties_in_column_order() {
    let map: ResultMap = serde_json::from_str(
        r#"{
            "id": "Users.UserMap",
            "properties": {
                "user_name": { "name": "name" },
                "created": { "name": "created_at", "type_handler": "UnixTime" }
            }
        }"#,
    )
    .unwrap();

    assert_eq!(
        map,
        ResultMap::new("Users.UserMap")
            .property("user_name", "name")
            .property_with_handler("created", "created_at", "UnixTime")
    );

    let columns: Vec<_> = map.properties.keys().map(String::as_str).collect();
    assert_eq!(columns, ["user_name", "created"]);
}

#[test]
fn deserialize_constructor_map() {
    let map: ResultMap = serde_json::from_str(
        r#"{
            "id": "Orders.OrderMap",
            "constructor": {
                "args": [
                    { "column": "order_id", "ty": "I64", "name": "id" },
                    { "column": "status", "ty": { "Enum": { "name": "Status", "variants": ["Open", "Shipped"] } } },
                    { "column": "note", "ty": "String", "nullable": true }
                ]
            }
        }"#,
    )
    .unwrap();

    let status = Type::Enum(TypeEnum::new("Status", ["Open", "Shipped"]));
    assert_eq!(
        map,
        ResultMap::new("Orders.OrderMap").constructor([
            ConstructorArg::new("order_id", Type::I64).name("id"),
            ConstructorArg::new("status", status),
            ConstructorArg::new("note", Type::String).nullable(),
        ])
    );

    let args = &map.constructor.as_ref().unwrap().args;
    assert_eq!(args[0].target_name(), "id");
    assert_eq!(args[1].target_name(), "status");
}

#[test]
fn everything_is_optional() {
    let map: ResultMap = serde_json::from_str("{}").unwrap();
    assert_eq!(map, ResultMap::default());
    assert!(map.constructor.is_none());
}

#[test]
fn property_requires_a_name() {
    let res = serde_json::from_str::<ResultMap>(r#"{ "properties": { "a": {} } }"#);
    assert!(res.is_err());
}

use rowmap_core::{
    stmt::{Type, Value},
    Error, RowAccess, RowSource, StreamRows,
};

fn rows(n: i64) -> impl tokio_stream::Stream<Item = rowmap_core::Result<Vec<Value>>> {
    async_stream::stream! {
        for i in 0..n {
            yield Ok(vec![Value::I64(i), Value::from(format!("row {i}"))]);
        }
    }
}

fn columns() -> [(&'static str, Type); 2] {
    [("id", Type::I64), ("label", Type::String)]
}

#[tokio::test]
async fn open_taps_first_row() {
    let source = StreamRows::open(columns(), rows(3)).await.unwrap();
    assert!(source.has_rows());

    let empty = StreamRows::open(columns(), rows(0)).await.unwrap();
    assert!(!empty.has_rows());
}

#[tokio::test]
async fn advance_async_pulls_every_row() {
    let mut source = StreamRows::open(columns(), rows(3)).await.unwrap();
    let mut ids = vec![];

    while source.advance_async().await.unwrap() {
        ids.push(source.raw_value(0, &Type::I64).unwrap());
    }

    assert_eq!(ids, [Value::I64(0), Value::I64(1), Value::I64(2)]);
}

#[tokio::test]
async fn sync_advance_needs_buffered_rows() {
    let mut source = StreamRows::open(columns(), rows(2)).await.unwrap();

    // The first row was fetched by `open`
    assert!(source.advance().unwrap());
    let err = source.advance().unwrap_err();
    assert!(err.is_invalid_result());
}

#[tokio::test]
async fn sync_advance_after_buffering() {
    let mut source = StreamRows::open(columns(), rows(2)).await.unwrap();
    source.buffer().await.unwrap();

    assert!(source.advance().unwrap());
    assert!(source.advance().unwrap());
    assert_eq!(source.raw_value(1, &Type::String).unwrap(), Value::from("row 1"));
    assert!(!source.advance().unwrap());
}

#[tokio::test]
async fn stream_errors_surface_on_advance() {
    let failing = async_stream::stream! {
        yield Ok(vec![Value::I64(1), Value::Null]);
        yield Err(Error::invalid_result("connection reset"));
    };

    let mut source = StreamRows::open(columns(), failing).await.unwrap();
    assert!(source.advance_async().await.unwrap());
    assert!(source.is_null(1));

    let err = source.advance_async().await.unwrap_err();
    assert_eq!(err.to_string(), "invalid result: connection reset");
}

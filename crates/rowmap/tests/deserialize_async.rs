use rowmap::{
    Deserializer, Entity, Error, Field, Request, StreamRows, TargetType, Type, Value,
};

#[derive(Debug, Default, PartialEq)]
struct Event {
    id: i64,
    kind: String,
}

impl Entity for Event {
    fn target_type() -> TargetType<Self> {
        TargetType::new("Event")
            .default_constructor(Event::default)
            .field(Field::new("id", Type::I64, |e: &mut Event, v| {
                e.id = v.try_into()?;
                Ok(())
            }))
            .field(Field::new("kind", Type::String, |e: &mut Event, v| {
                e.kind = v.try_into()?;
                Ok(())
            }))
    }
}

async fn events(n: i64) -> StreamRows {
    let stream = async_stream::stream! {
        for id in 0..n {
            tokio::task::yield_now().await;
            let kind = if id % 2 == 0 { "open" } else { "close" };
            yield Ok::<_, Error>(vec![Value::I64(id), Value::from(kind)]);
        }
    };

    StreamRows::open([("id", Type::I64), ("kind", Type::String)], stream)
        .await
        .unwrap()
}

#[tokio::test]
async fn to_list_async() {
    let mut rows = events(4).await;
    let events: Vec<Event> = Deserializer::default()
        .to_list_async(&mut rows, &Request::named("Events.All"))
        .await
        .unwrap();

    let kinds: Vec<_> = events.iter().map(|e| e.kind.as_str()).collect();
    assert_eq!(kinds, ["open", "close", "open", "close"]);
    assert_eq!(events[3].id, 3);
}

#[tokio::test]
async fn to_single_async() {
    let mut rows = events(3).await;
    let event: Option<Event> = Deserializer::default()
        .to_single_async(&mut rows, &Request::named("Events.First"))
        .await
        .unwrap();

    assert_eq!(
        event,
        Some(Event {
            id: 0,
            kind: "open".to_string(),
        })
    );
}

#[tokio::test]
async fn zero_rows_async() {
    let de = Deserializer::default();
    let request = Request::named("Events.None");

    let mut rows = events(0).await;
    assert_eq!(de.to_single_async::<Event, _>(&mut rows, &request).await.unwrap(), None);

    let mut rows = events(0).await;
    assert!(de.to_list_async::<Event, _>(&mut rows, &request).await.unwrap().is_empty());
}

#[tokio::test]
async fn sync_and_async_share_the_mapper() {
    let de = Deserializer::default();
    let request = Request::named("Events.Shared");

    let mut rows = events(2).await;
    rows.buffer().await.unwrap();
    let sync: Vec<Event> = de.to_list(&mut rows, &request).unwrap();

    let mut rows = events(2).await;
    let not_sync: Vec<Event> = de.to_list_async(&mut rows, &request).await.unwrap();

    assert_eq!(sync, not_sync);
    assert_eq!(de.cache().len(), 1);
}

#[tokio::test]
async fn stream_error_ends_the_list() {
    let stream = async_stream::stream! {
        yield Ok(vec![Value::I64(1), Value::from("open")]);
        yield Err(Error::invalid_result("connection reset"));
    };
    let mut rows = StreamRows::open([("id", Type::I64), ("kind", Type::String)], stream)
        .await
        .unwrap();

    let err = Deserializer::default()
        .to_list_async::<Event, _>(&mut rows, &Request::named("Events.Broken"))
        .await
        .unwrap_err();

    assert!(err.is_invalid_result());
}

#[tokio::test]
async fn deserializer_is_shared_across_tasks() {
    let de = Deserializer::default();

    let tasks: Vec<_> = (0..4)
        .map(|n| {
            let de = de.clone();
            tokio::spawn(async move {
                let mut rows = events(n + 1).await;
                de.to_list_async::<Event, _>(&mut rows, &Request::named("Events.Tasks"))
                    .await
                    .unwrap()
                    .len()
            })
        })
        .collect();

    let mut lens = vec![];
    for task in tasks {
        lens.push(task.await.unwrap());
    }

    assert_eq!(lens, [1, 2, 3, 4]);
    assert_eq!(de.cache().len(), 1);
}

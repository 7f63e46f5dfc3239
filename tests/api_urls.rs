//! API endpoint URLs, transaction bodies and listen streams through the
//! public API.

use content_lake::api::{self, ListenOptions, MutateOptions, QueryParams, Visibility};
use content_lake::config::{ClientConfig, Perspective};
use content_lake::listen::{ListenEvent, SseParser};
use content_lake::mutation::{InsertPosition, Mutation, Patch, PatchOperation, Transaction};
use serde_json::{Value, json};

fn live() -> ClientConfig {
    ClientConfig::new("rwmuledy", "prod")
        .with_api_version("v1")
        .with_use_cdn(false)
}

#[test]
fn query_url_on_live_host() {
    let url = api::query_url(&live(), "*", &QueryParams::new()).unwrap();
    assert_eq!(
        url.as_str(),
        "https://rwmuledy.api.sanity.io/v1/data/query/prod?query=*"
    );
}

#[test]
fn query_url_with_perspective_and_params() {
    let config = live()
        .with_use_cdn(true)
        .with_perspective(Perspective::published());
    let mut params = QueryParams::new();
    params.insert("limit".to_string(), json!(10));
    params.insert("type".to_string(), json!("movie"));

    let url = api::query_url(&config, "*", &params).unwrap();
    assert_eq!(
        url.as_str(),
        "https://rwmuledy.apicdn.sanity.io/v1/data/query/prod\
         ?query=*&perspective=published&limit=10&type=movie"
    );
}

#[test]
fn listen_and_mutate_ignore_cdn() {
    let config = live().with_use_cdn(true);
    let listen = api::listen_url(&config, "*", &QueryParams::new(), &ListenOptions::default())
        .unwrap();
    let mutate = api::mutate_url(
        &config,
        &MutateOptions {
            visibility: Some(Visibility::Sync),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(
        listen.as_str(),
        "https://rwmuledy.api.sanity.io/v1/data/listen/prod?query=*&includeResult=true"
    );
    assert_eq!(
        mutate.as_str(),
        "https://rwmuledy.api.sanity.io/v1/data/mutate/prod?visibility=sync"
    );
}

#[test]
fn transaction_body() {
    let tx = Transaction::new(vec![
        Mutation::CreateIfNotExists(json!({"_id": "one", "_type": "some-type"})),
        Mutation::CreateOrReplace(json!({"_id": "four", "_type": "other"})),
        Mutation::delete("foo"),
        Mutation::patch(
            "one",
            vec![
                Patch::new("counter", PatchOperation::SetIfMissing(json!(0))),
                Patch::new(
                    "array",
                    PatchOperation::Insert(json!(["bar"]), InsertPosition::After),
                ),
            ],
        ),
        Mutation::patch("three", Vec::new()),
    ]);

    assert_eq!(
        tx.body().unwrap(),
        json!({"mutations": [
            {"createIfNotExists": {"_id": "one", "_type": "some-type"}},
            {"createOrReplace": {"_id": "four", "_type": "other"}},
            {"delete": {"id": "foo"}},
            {"patch": {"id": "one", "setIfMissing": {"counter": 0}}},
            {"patch": {"id": "one", "insert": {"after": "array", "items": ["bar"]}}},
        ]})
    );
}

#[test]
fn listen_stream_decodes_in_chunks() {
    let stream = concat!(
        "event: welcome\ndata: {\"listenerName\":\"abc\"}\n\n",
        ": keepalive\n\n",
        "event: mutation\nid: tx1#doc1\n",
        "data: {\"eventId\":\"tx1#doc1\",\"documentId\":\"doc1\",",
        "\"transition\":\"update\",\"result\":{\"title\":\"Heat\"}}\n\n",
        "event: disconnect\ndata: {\"reason\":\"shutdown\"}\n\n",
    );

    let mut parser = SseParser::new();
    let mut events = Vec::new();
    for chunk in stream.as_bytes().chunks(7) {
        let chunk = std::str::from_utf8(chunk).unwrap();
        events.extend(
            parser
                .push(chunk)
                .into_iter()
                .filter_map(ListenEvent::<Value>::decode),
        );
    }
    assert_eq!(parser.finish(), None);

    assert_eq!(events.len(), 3);
    assert_eq!(events[0], ListenEvent::Welcome);
    let ListenEvent::Mutation(mutation) = &events[1] else {
        panic!("expected mutation, got {:?}", events[1]);
    };
    assert_eq!(mutation.document_id, "doc1");
    assert_eq!(mutation.result.as_ref().unwrap()["title"], "Heat");
    assert_eq!(
        events[2],
        ListenEvent::Disconnect {
            reason: Some("shutdown".to_string())
        }
    );
}

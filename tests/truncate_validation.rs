//! Truncate argument validation taxonomy
//!
//! Malformed client input must fail client-side, with the right error
//! class, before the engine is touched: wrong types are TypeArgument,
//! negative values are RangeUnderflow, values too wide for their field
//! are RangeOverflow. Thresholds that are well-formed but outside the
//! server's accepted domain fail with ServerDomain instead.

use std::collections::HashMap;
use std::sync::Arc;

use tidemarkdb::{
    Arg, Bins, Client, Engine, Error, NanoTime, Namespace, SetName, Value, STORE_EPOCH,
};

fn client() -> Client {
    Client::new(Arc::new(Engine::open_in_memory()))
}

fn seeded() -> Client {
    let client = client();
    let mut bins = Bins::default();
    bins.insert("field".to_string(), Value::Int(1));
    client.put(
        &Namespace::new("test").unwrap(),
        &SetName::new("demo").unwrap(),
        "key-0",
        bins,
    );
    client
}

fn still_intact(client: &Client) {
    assert_eq!(
        client
            .engine()
            .store()
            .count_visible(&Namespace::new("test").unwrap(), None),
        1,
        "failed validation must leave data untouched"
    );
    assert_eq!(client.engine().registry().len(), 0);
}

#[test]
fn namespace_wrong_types_are_type_errors() {
    let client = seeded();
    for bad in [
        Arg::Null,
        Arg::Bool(true),
        Arg::Int(512),
        Arg::Float(3.2),
        Arg::Bytes(vec![1, 2]),
        Arg::List(vec![Arg::from("test")]),
        Arg::Map(HashMap::new()),
    ] {
        let err = client
            .truncate(&bad, &Arg::from("demo"), &Arg::Int(0), None)
            .unwrap_err();
        assert!(matches!(err, Error::TypeArgument(_)), "for {:?}", bad);
        assert!(err.is_client_side());
    }
    still_intact(&client);
}

#[test]
fn set_wrong_types_are_type_errors() {
    let client = seeded();
    for bad in [Arg::Bool(false), Arg::Int(1), Arg::Float(0.5), Arg::List(vec![])] {
        let err = client
            .truncate(&Arg::from("test"), &bad, &Arg::Int(0), None)
            .unwrap_err();
        assert!(matches!(err, Error::TypeArgument(_)), "for {:?}", bad);
    }
    still_intact(&client);
}

#[test]
fn threshold_wrong_types_are_type_errors() {
    let client = seeded();
    for bad in [
        Arg::Null,
        Arg::Bool(true),
        Arg::Float(0.0),
        Arg::from("0"),
        Arg::List(vec![Arg::Int(0)]),
    ] {
        let err = client
            .truncate(&Arg::from("test"), &Arg::from("demo"), &bad, None)
            .unwrap_err();
        assert!(matches!(err, Error::TypeArgument(_)), "for {:?}", bad);
    }
    still_intact(&client);
}

#[test]
fn negative_threshold_is_underflow() {
    let client = seeded();
    let err = client
        .truncate(&Arg::from("test"), &Arg::from("demo"), &Arg::Int(-1), None)
        .unwrap_err();
    assert!(matches!(err, Error::RangeUnderflow(_)));
    still_intact(&client);
}

#[test]
fn threshold_beyond_u64_is_overflow() {
    let client = seeded();
    let err = client
        .truncate(
            &Arg::from("test"),
            &Arg::from("demo"),
            &Arg::Int(u64::MAX as i128 + 1),
            None,
        )
        .unwrap_err();
    assert!(matches!(err, Error::RangeOverflow(_)));
    still_intact(&client);
}

#[test]
fn before_epoch_threshold_is_server_domain() {
    let client = seeded();
    // Nonzero but far before the store epoch (1ns after Unix zero)
    let err = client
        .truncate(&Arg::from("test"), &Arg::from("demo"), &Arg::Int(1), None)
        .unwrap_err();
    assert!(matches!(err, Error::ServerDomain(_)));
    assert!(!err.is_client_side());

    // One nanosecond short of the store epoch: representable, rejected
    let err = client
        .truncate(
            &Arg::from("test"),
            &Arg::from("demo"),
            &Arg::Int(STORE_EPOCH.as_nanos() as i128 - 1),
            None,
        )
        .unwrap_err();
    assert!(matches!(err, Error::ServerDomain(_)));
    still_intact(&client);
}

#[test]
fn epoch_boundary_threshold_is_accepted() {
    let client = seeded();
    client
        .truncate(
            &Arg::from("test"),
            &Arg::from("demo"),
            &Arg::Int(STORE_EPOCH.as_nanos() as i128),
            None,
        )
        .unwrap();
}

#[test]
fn future_threshold_is_server_domain() {
    let client = seeded();
    let future = NanoTime::now().as_nanos() + 3_600_000_000_000;
    let err = client
        .truncate(
            &Arg::from("test"),
            &Arg::from("demo"),
            &Arg::Int(future as i128),
            None,
        )
        .unwrap_err();
    assert!(matches!(err, Error::ServerDomain(_)));
    still_intact(&client);
}

#[test]
fn positional_arity_errors() {
    let client = seeded();
    for args in [
        vec![],
        vec![Arg::from("test")],
        vec![Arg::from("test"), Arg::from("demo")],
        vec![
            Arg::from("test"),
            Arg::from("demo"),
            Arg::Int(0),
            Arg::Null,
            Arg::Null,
        ],
    ] {
        let err = client.truncate_args(&args).unwrap_err();
        assert!(matches!(err, Error::TypeArgument(_)), "for {:?}", args);
    }
    still_intact(&client);
}

#[test]
fn positional_policy_variants() {
    let client = seeded();

    // Bad policy shapes fail client-side
    for bad in [Arg::Int(1000), Arg::from("policy"), Arg::Bool(true)] {
        let err = client
            .truncate_args(&[Arg::from("test"), Arg::from("demo"), Arg::Int(0), bad])
            .unwrap_err();
        assert!(matches!(err, Error::TypeArgument(_)));
    }

    let mut map = HashMap::new();
    map.insert("timeout".to_string(), Arg::Int(-1));
    let err = client
        .truncate_args(&[
            Arg::from("test"),
            Arg::from("demo"),
            Arg::Int(0),
            Arg::Map(map),
        ])
        .unwrap_err();
    assert!(matches!(err, Error::RangeUnderflow(_)));

    let mut map = HashMap::new();
    map.insert("timeout".to_string(), Arg::Int(u32::MAX as i128 + 1));
    let err = client
        .truncate_args(&[
            Arg::from("test"),
            Arg::from("demo"),
            Arg::Int(0),
            Arg::Map(map),
        ])
        .unwrap_err();
    assert!(matches!(err, Error::RangeOverflow(_)));

    still_intact(&client);

    // A well-formed policy goes through
    let mut map = HashMap::new();
    map.insert("timeout".to_string(), Arg::Int(10_000));
    client
        .truncate_args(&[
            Arg::from("test"),
            Arg::from("demo"),
            Arg::Int(0),
            Arg::Map(map),
        ])
        .unwrap();
}

use crate::engine::core::id::RetryPolicy;
use crate::engine::errors::StoreError;
use crate::engine::store::StoreSettings;
use crate::shared::config::Settings;
use crate::test_helpers::factories::{Account, Deposited, Order, Withdrawn};
use std::time::Duration;

#[test]
fn defaults_follow_config_defaults() {
    let settings = StoreSettings::new();
    assert_eq!(settings.events_collection(), "Events");
    assert!(settings.event_types().is_empty());
    assert_eq!(settings.info_collections().count(), 0);
    assert_eq!(settings.retry_policy(), RetryPolicy::default());
}

#[test]
fn info_collection_uses_stream_name_and_suffix() {
    let settings = StoreSettings::new()
        .register_stream::<Account>()
        .register_stream::<Order>();

    assert_eq!(settings.info_collection::<Account>().unwrap(), "Account_Info");
    assert_eq!(settings.info_collection::<Order>().unwrap(), "Order_Info");

    let mut names: Vec<_> = settings.stream_names().collect();
    names.sort();
    assert_eq!(names, vec!["Account", "Order"]);
}

#[test]
fn unregistered_stream_type_is_reported_by_name() {
    let settings = StoreSettings::new().register_stream::<Account>();
    match settings.info_collection::<Order>() {
        Err(StoreError::UnregisteredStreamType(name)) => assert_eq!(name, "Order"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn from_config_applies_names_and_policy() {
    let mut config = Settings::default();
    config.store.events_collection = "LedgerEvents".to_string();
    config.store.info_suffix = "Streams".to_string();
    config.generator.max_attempts = 3;
    config.generator.retry_delay_ms = 25;

    let settings = StoreSettings::from_config(&config)
        .register_stream::<Account>()
        .register_event::<Deposited>("Deposited")
        .register_event::<Withdrawn>("Withdrawn");

    assert_eq!(settings.events_collection(), "LedgerEvents");
    assert_eq!(settings.info_collection::<Account>().unwrap(), "AccountStreams");
    assert_eq!(settings.event_types().len(), 2);
    assert_eq!(
        settings.retry_policy(),
        RetryPolicy {
            max_attempts: 3,
            delay: Duration::from_millis(25),
        }
    );
}

use crate::test_helpers::factories::{Account, EventBatchFactory, LedgerEvent};
use crate::test_helpers::factory::Factory;

#[test]
fn builds_batch_in_given_order() {
    let batch = EventBatchFactory::<Account>::new()
        .with_deposits(&[5, 7])
        .with_event(LedgerEvent::withdraw(3))
        .with_metadata()
        .create();

    assert_eq!(batch.len(), 3);
    assert_eq!(batch.events()[0].event, LedgerEvent::deposit(5));
    assert_eq!(batch.events()[2].event, LedgerEvent::withdraw(3));
    assert!(batch.events().iter().all(|e| e.metadata.is_some()));
}

#[test]
fn recorded_events_share_one_batch() {
    let events = Factory::recorded_event()
        .with_event(LedgerEvent::withdraw(9))
        .create_list(4);

    assert_eq!(events.len(), 4);
    assert!(events.windows(2).all(|w| w[0].id().next().unwrap() == w[1].id()));
    assert!(events.iter().all(|e| e.event() == &LedgerEvent::withdraw(9)));
    assert!(Factory::event_batch::<Account>().create().is_empty());
}

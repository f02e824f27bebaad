use crate::engine::facade::DocumentStore;
use crate::test_helpers::factories::{Account, Order, StoreFactory};
use crate::test_helpers::factory::Factory;

#[tokio::test]
async fn upgraded_store_has_all_collections() {
    let store = Factory::store().create_upgraded().await;
    let mut names = store.facade().collection_names().await.unwrap();
    names.sort();
    assert_eq!(names, vec!["Account_Info", "Events", "Order_Info"]);

    assert_eq!(
        store.settings().info_collection::<Account>().unwrap(),
        "Account_Info"
    );
    assert!(
        StoreFactory::new()
            .without_order_stream()
            .settings()
            .info_collection::<Order>()
            .is_err()
    );
}

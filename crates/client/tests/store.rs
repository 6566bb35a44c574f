mod common;

use common::{Fixture, date, dec, id, item_type, stock_item, supplier, transaction};
use gestion_client::error::DUPLICATE_CODE_MESSAGE;
use gestion_client::{CallKind, Operation, StoreError};
use gestion_core::{Iri, Reference};
use gestion_inventory::{Location, NewItemType, NewStockItem, Unit};
use gestion_suppliers::{
    EmbeddedTransaction, NewSupplier, NewTransaction, Supplier, SupplierPatch, SupplierSummary,
};

#[tokio::test]
async fn load_all_fills_every_collection() {
    let f = Fixture::seeded().await;

    let snapshot = f.store.snapshot().await;
    assert_eq!(snapshot.suppliers.len(), 1);
    assert_eq!(snapshot.transactions.len(), 1);
    assert_eq!(snapshot.item_types.len(), 1);
    assert_eq!(snapshot.stock_items.len(), 1);
    assert_eq!(snapshot.stock_movements.len(), 1);

    let status = f.store.status();
    assert!(!status.is_loading());
    assert_eq!(status.error, None);
}

#[tokio::test]
async fn failed_load_reports_the_load_message() {
    let f = Fixture::empty();
    f.item_types.fail_on(CallKind::GetAll);

    let err = f.store.load_all().await.unwrap_err();

    assert_eq!(err.operation(), Operation::LoadAll);
    assert_eq!(
        f.store.status().error.as_deref(),
        Some("Erreur lors du chargement des données")
    );
    assert_eq!(f.store.snapshot().await, Default::default());
}

#[tokio::test]
async fn duplicate_supplier_code_never_reaches_the_api() {
    let f = Fixture::seeded().await;

    f.store
        .create_supplier(NewSupplier::new("F002", "Textiles Sud"))
        .await
        .unwrap();
    let err = f
        .store
        .create_supplier(NewSupplier::new("F002", "Textiles Nord"))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Invalid { .. }));
    assert_eq!(err.user_message(), DUPLICATE_CODE_MESSAGE);
    assert_eq!(f.store.status().error.as_deref(), Some(DUPLICATE_CODE_MESSAGE));
    assert_eq!(f.suppliers.calls().create, 1);
    assert_eq!(f.store.suppliers().await.len(), 2);
}

#[tokio::test]
async fn duplicate_check_ignores_surrounding_whitespace() {
    let f = Fixture::seeded().await;

    let err = f
        .store
        .create_supplier(NewSupplier::new(" F001 ", "Autre"))
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), DUPLICATE_CODE_MESSAGE);
    assert_eq!(f.suppliers.calls().total(), 0);
}

#[tokio::test]
async fn remote_failure_leaves_the_read_model_unchanged() {
    let f = Fixture::seeded().await;
    let before = f.store.snapshot().await;
    f.suppliers.fail_on(CallKind::Create);

    let err = f
        .store
        .create_supplier(NewSupplier::new("F003", "Bois & Co"))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Remote { .. }));
    assert!(!err.primary_succeeded());
    assert_eq!(f.store.snapshot().await, before);

    let status = f.store.status();
    assert!(!status.is_loading());
    assert_eq!(
        status.error.as_deref(),
        Some("Erreur lors de l'ajout du fournisseur")
    );
}

#[tokio::test]
async fn next_operation_clears_the_previous_error() {
    let f = Fixture::seeded().await;
    f.suppliers.fail_on(CallKind::Delete);
    assert!(f.store.delete_supplier(&id("1")).await.is_err());
    assert!(f.store.status().error.is_some());

    f.suppliers.clear_failures();
    f.store.delete_supplier(&id("1")).await.unwrap();

    assert_eq!(f.store.status().error, None);
    assert!(f.store.suppliers().await.is_empty());
}

#[tokio::test]
async fn subscribers_see_busy_and_error_transitions() {
    let f = Fixture::seeded().await;
    let mut rx = f.store.subscribe();
    f.item_types.fail_on(CallKind::Update);

    let result = f
        .store
        .update_item_type(&id("3"), Default::default())
        .await;

    assert!(result.is_err());
    assert!(rx.has_changed().unwrap());
    let status = rx.borrow_and_update().clone();
    assert_eq!(status.in_flight, 0);
    assert_eq!(
        status.error.as_deref(),
        Some("Erreur lors de la modification du type d'article")
    );
}

#[tokio::test]
async fn supplier_stats_follow_the_cached_supplier() {
    let f = Fixture::seeded().await;

    let stats = f.store.supplier_stats(&id("1")).await.unwrap();
    assert_eq!(stats.total_purchases, dec(1000));
    assert_eq!(stats.total_payments, dec(400));
    assert_eq!(stats.total_remainder, dec(600));

    let patch = SupplierPatch {
        transactions: Some(vec![
            EmbeddedTransaction::new(date(1), dec(1000), dec(400)),
            EmbeddedTransaction::new(date(3), dec(500), dec(1100)),
        ]),
        ..SupplierPatch::default()
    };
    f.store.update_supplier(&id("1"), patch).await.unwrap();

    let stats = f.store.supplier_stats(&id("1")).await.unwrap();
    assert_eq!(stats.total_purchases, dec(1500));
    assert_eq!(stats.total_payments, dec(1500));
    assert_eq!(stats.total_remainder, dec(0));

    let statement = f.store.supplier_statement(&id("1")).await.unwrap();
    assert_eq!(statement.len(), 2);
    assert_eq!(statement[0].balance, dec(600));
    assert_eq!(statement[1].balance, dec(0));

    assert!(f.store.supplier_stats(&id("404")).await.is_none());
}

#[tokio::test]
async fn transaction_create_refetches_its_supplier() {
    let f = Fixture::seeded().await;
    // What the server holds once the new transaction is embedded.
    f.suppliers.insert(supplier(
        "1",
        "F001",
        vec![
            EmbeddedTransaction::new(date(1), dec(1000), dec(400)),
            EmbeddedTransaction::new(date(4), dec(250), dec(0)),
        ],
    ));

    let draft = NewTransaction {
        supplier: f.store.iri_for::<Supplier>(&id("1")).into(),
        date: date(4),
        purchase: dec(250),
        payment: dec(0),
        description: Some("Commande avril".to_string()),
    };
    let created = f.store.create_transaction(draft).await.unwrap();

    assert_eq!(created.remainder, dec(250));
    assert_eq!(f.suppliers.calls().get_by_id, vec![id("1")]);
    let stats = f.store.supplier_stats(&id("1")).await.unwrap();
    assert_eq!(stats.total_remainder, dec(850));
}

#[tokio::test]
async fn transaction_delete_refetches_the_captured_supplier() {
    let f = Fixture::seeded().await;

    f.store.delete_transaction(&id("1")).await.unwrap();

    assert_eq!(f.transactions.calls().delete, vec![id("1")]);
    assert_eq!(f.suppliers.calls().get_by_id, vec![id("1")]);
    assert!(f.store.transactions().await.is_empty());
}

#[tokio::test]
async fn transactions_match_suppliers_by_string_identity() {
    let f = Fixture::seeded().await;
    f.transactions.insert(transaction(
        "2",
        Reference::Embedded(SupplierSummary {
            id: id("1"),
            code: Some("F001".to_string()),
            name: None,
        }),
        dec(10),
        dec(0),
    ));
    f.transactions.insert(transaction(
        "3",
        Reference::Iri(Iri::from("/api/fournisseurs/11")),
        dec(10),
        dec(0),
    ));
    f.load().await;

    let ids: Vec<_> = f
        .store
        .transactions_for_supplier(&id("1"))
        .await
        .into_iter()
        .map(|tx| tx.id)
        .collect();

    assert_eq!(ids, vec![id("1"), id("2")]);

    let stats = f.store.transaction_stats(&id("1")).await;
    assert_eq!(stats.total_purchases, dec(1010));
    assert_eq!(stats.total_payments, dec(400));
    assert_eq!(stats.total_remainder, dec(610));
}

#[tokio::test]
async fn stock_item_crud_updates_the_read_model() {
    let f = Fixture::seeded().await;

    let created_type = f
        .store
        .create_item_type(NewItemType {
            name: "Fil".to_string(),
            description: None,
        })
        .await
        .unwrap();

    let draft = NewStockItem {
        reference: "FIL-01".to_string(),
        name: "Fil blanc".to_string(),
        item_type: Some(f.store.iri_for::<gestion_inventory::ItemType>(&created_type.id).into()),
        location: Location::Maison,
        unit: Unit::Unite,
        stock_initial: 12,
        last_inventory_date: None,
    };
    let created = f.store.create_stock_item(draft).await.unwrap();

    assert_eq!(created.remaining(), 12);
    assert_eq!(f.store.item_type_name(&created).await.as_deref(), Some("Fil"));

    f.store.delete_stock_item(&created.id).await.unwrap();
    assert!(f.store.stock_item(&created.id).await.is_none());
    assert_eq!(f.store.stock_items().await, vec![stock_item("7", 10, Some(8))]);
    assert_eq!(f.store.item_types().await[0], item_type("3", "Tissu"));
}

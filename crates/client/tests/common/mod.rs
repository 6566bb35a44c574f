#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use gestion_client::{AppStore, ClientConfig, InMemoryRepository, Repositories};
use gestion_core::{EntityId, Iri, Reference};
use gestion_inventory::{
    ItemType, Location, MovementKind, StockItem, StockItemSummary, StockMovement, Unit,
};
use gestion_suppliers::{EmbeddedTransaction, Supplier, SupplierSummary, Transaction};

pub struct Fixture {
    pub suppliers: Arc<InMemoryRepository<Supplier>>,
    pub transactions: Arc<InMemoryRepository<Transaction>>,
    pub item_types: Arc<InMemoryRepository<ItemType>>,
    pub stock_items: Arc<InMemoryRepository<StockItem>>,
    pub stock_movements: Arc<InMemoryRepository<StockMovement>>,
    pub store: AppStore,
}

impl Fixture {
    pub fn empty() -> Self {
        gestion_observability::init_for_tests();

        let suppliers = Arc::new(InMemoryRepository::new());
        let transactions = Arc::new(InMemoryRepository::new());
        let item_types = Arc::new(InMemoryRepository::new());
        let stock_items = Arc::new(InMemoryRepository::new());
        let stock_movements = Arc::new(InMemoryRepository::new());

        let repos = Repositories {
            suppliers: suppliers.clone(),
            transactions: transactions.clone(),
            item_types: item_types.clone(),
            stock_items: stock_items.clone(),
            stock_movements: stock_movements.clone(),
        };

        Self {
            suppliers,
            transactions,
            item_types,
            stock_items,
            stock_movements,
            store: AppStore::new(repos, ClientConfig::default()),
        }
    }

    /// One supplier (F001), one item type, stock item 7 with one exit of 2
    /// recorded against it, and one transaction. Loaded, call logs reset.
    pub async fn seeded() -> Self {
        let fixture = Self::empty();

        fixture.suppliers.insert(supplier(
            "1",
            "F001",
            vec![EmbeddedTransaction::new(date(1), dec(1000), dec(400))],
        ));
        fixture.transactions.insert(transaction(
            "1",
            Reference::Iri(Iri::from("/api/fournisseurs/1")),
            dec(1000),
            dec(400),
        ));
        fixture.item_types.insert(item_type("3", "Tissu"));
        fixture.stock_items.insert(stock_item("7", 10, Some(8)));
        fixture.stock_movements.insert(movement(
            "1",
            Reference::Embedded(StockItemSummary::with_id("7")),
            MovementKind::Sortie,
            2,
        ));

        fixture.load().await;
        fixture
    }

    pub async fn load(&self) {
        self.store.load_all().await.unwrap();
        self.reset_calls();
    }

    pub fn reset_calls(&self) {
        self.suppliers.reset_calls();
        self.transactions.reset_calls();
        self.item_types.reset_calls();
        self.stock_items.reset_calls();
        self.stock_movements.reset_calls();
    }
}

pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
}

pub fn dec(n: i64) -> Decimal {
    Decimal::from(n)
}

pub fn id(value: &str) -> EntityId {
    EntityId::from(value)
}

pub fn supplier(id: &str, code: &str, transactions: Vec<EmbeddedTransaction>) -> Supplier {
    Supplier {
        id: EntityId::from(id),
        code: code.to_string(),
        name: format!("Fournisseur {code}"),
        transactions,
    }
}

pub fn transaction(
    id: &str,
    supplier: Reference<SupplierSummary>,
    purchase: Decimal,
    payment: Decimal,
) -> Transaction {
    Transaction {
        id: EntityId::from(id),
        supplier,
        date: date(1),
        purchase,
        payment,
        remainder: purchase - payment,
        description: None,
    }
}

pub fn item_type(id: &str, name: &str) -> ItemType {
    ItemType {
        id: EntityId::from(id),
        name: name.to_string(),
        description: None,
    }
}

pub fn stock_item(id: &str, initial: i64, remaining: Option<i64>) -> StockItem {
    StockItem {
        id: EntityId::from(id),
        reference: format!("REF-{id}"),
        name: format!("Article {id}"),
        item_type: Some(Reference::Iri(Iri::from("/api/item_types/3"))),
        location: Location::Cotona,
        unit: Unit::Piece,
        stock_initial: initial,
        stock_restant: remaining,
        nb_entrees: 0,
        nb_sorties: 0,
        last_inventory_date: None,
    }
}

pub fn movement(
    id: &str,
    stock_item: Reference<StockItemSummary>,
    kind: MovementKind,
    quantity: i64,
) -> StockMovement {
    StockMovement {
        id: EntityId::from(id),
        date: date(2),
        stock_item,
        kind,
        quantity,
        notes: None,
    }
}

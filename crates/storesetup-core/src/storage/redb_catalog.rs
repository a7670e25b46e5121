//! # redb-backed Catalog Storage
//!
//! A disk-backed catalog using the redb embedded database, providing:
//! - ACID transactions (one write transaction per mutation)
//! - Crash safety (copy-on-write B-trees)
//! - MVCC (concurrent readers, single writer)
//!
//! Entity rows are postcard-encoded and keyed by their numeric id. Id
//! counters live in the metadata table so ids are never reused, even after a
//! reopen.

use crate::catalog::{validate_config_entry, validate_name, CatalogStore};
use crate::seed::{CatalogSeed, SeedSummary};
use crate::{
    Carrier, CarrierId, CarrierPriceRange, NewPriceRange, PriceRangeId, Product, ProductId,
    StoreSetupError,
};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Table for products: ProductId(u64) -> serialized Product bytes
const PRODUCTS: TableDefinition<u64, &[u8]> = TableDefinition::new("products");

/// Table for carriers: CarrierId(u64) -> serialized Carrier bytes
const CARRIERS: TableDefinition<u64, &[u8]> = TableDefinition::new("carriers");

/// Table for carrier price ranges: PriceRangeId(u64) -> serialized range bytes
const PRICE_RANGES: TableDefinition<u64, &[u8]> = TableDefinition::new("carrier_price_ranges");

/// Table for configuration: key -> value
const CONFIG: TableDefinition<&str, &str> = TableDefinition::new("configuration");

/// Table for metadata: key string -> value u64
const METADATA: TableDefinition<&str, u64> = TableDefinition::new("metadata");

/// Shape shared by the entity tables.
type RowTable = TableDefinition<'static, u64, &'static [u8]>;

const NEXT_PRODUCT_ID: &str = "next_product_id";
const NEXT_CARRIER_ID: &str = "next_carrier_id";
const NEXT_PRICE_RANGE_ID: &str = "next_price_range_id";

fn io_err(e: impl std::fmt::Display) -> StoreSetupError {
    StoreSetupError::IoError(e.to_string())
}

fn encode<T: Serialize>(row: &T) -> Result<Vec<u8>, StoreSetupError> {
    postcard::to_allocvec(row).map_err(|e| StoreSetupError::SerializationError(e.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreSetupError> {
    postcard::from_bytes(bytes).map_err(|e| StoreSetupError::SerializationError(e.to_string()))
}

/// A disk-backed catalog store using redb.
pub struct RedbCatalog {
    /// The redb database handle.
    db: Database,
}

impl std::fmt::Debug for RedbCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbCatalog").finish_non_exhaustive()
    }
}

impl RedbCatalog {
    /// Open or create a catalog database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreSetupError> {
        let db = Database::create(path.as_ref()).map_err(io_err)?;

        // Initialize tables so read transactions never see a missing table.
        {
            let write_txn = db.begin_write().map_err(io_err)?;
            let _ = write_txn.open_table(PRODUCTS).map_err(io_err)?;
            let _ = write_txn.open_table(CARRIERS).map_err(io_err)?;
            let _ = write_txn.open_table(PRICE_RANGES).map_err(io_err)?;
            let _ = write_txn.open_table(CONFIG).map_err(io_err)?;
            let _ = write_txn.open_table(METADATA).map_err(io_err)?;
            write_txn.commit().map_err(io_err)?;
        }

        Ok(Self { db })
    }

    /// Open a catalog database that must already exist.
    ///
    /// Never creates a file, so a mistyped path fails instead of yielding an
    /// empty catalog.
    pub fn open_existing(path: impl AsRef<Path>) -> Result<Self, StoreSetupError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(StoreSetupError::IoError(format!(
                "Database {} not found (run `storesetup init` first)",
                path.display()
            )));
        }

        let db = Database::open(path).map_err(io_err)?;
        Ok(Self { db })
    }

    /// Reserve the next id for `counter` inside an open write transaction.
    fn allocate_id(txn: &WriteTransaction, counter: &str) -> Result<u64, StoreSetupError> {
        let mut meta = txn.open_table(METADATA).map_err(io_err)?;
        let id = meta
            .get(counter)
            .map_err(io_err)?
            .map(|v| v.value())
            .unwrap_or(1);
        meta.insert(counter, id.saturating_add(1)).map_err(io_err)?;
        Ok(id)
    }

    fn put_row<T: Serialize>(
        txn: &WriteTransaction,
        table: RowTable,
        id: u64,
        row: &T,
    ) -> Result<(), StoreSetupError> {
        let bytes = encode(row)?;
        let mut table = txn.open_table(table).map_err(io_err)?;
        table.insert(id, bytes.as_slice()).map_err(io_err)?;
        Ok(())
    }

    fn row_exists(
        txn: &WriteTransaction,
        table: RowTable,
        id: u64,
    ) -> Result<bool, StoreSetupError> {
        let table = txn.open_table(table).map_err(io_err)?;
        let exists = table.get(id).map_err(io_err)?.is_some();
        Ok(exists)
    }

    /// Insert a new row built from its freshly allocated id.
    fn insert_row<T: Serialize>(
        &mut self,
        table: RowTable,
        counter: &str,
        build: impl FnOnce(u64) -> T,
    ) -> Result<u64, StoreSetupError> {
        let write_txn = self.db.begin_write().map_err(io_err)?;
        let id = Self::allocate_id(&write_txn, counter)?;
        Self::put_row(&write_txn, table, id, &build(id))?;
        write_txn.commit().map_err(io_err)?;
        Ok(id)
    }

    /// Read-modify-write a single row. Returns `missing` if the row is absent.
    fn update_row<T: Serialize + DeserializeOwned>(
        &mut self,
        table: RowTable,
        id: u64,
        missing: StoreSetupError,
        apply: impl FnOnce(&mut T),
    ) -> Result<(), StoreSetupError> {
        let write_txn = self.db.begin_write().map_err(io_err)?;
        {
            let mut rows = write_txn.open_table(table).map_err(io_err)?;
            let bytes = rows
                .get(id)
                .map_err(io_err)?
                .map(|data| data.value().to_vec());
            let Some(bytes) = bytes else {
                return Err(missing);
            };

            let mut row: T = decode(&bytes)?;
            apply(&mut row);
            let encoded = encode(&row)?;
            rows.insert(id, encoded.as_slice()).map_err(io_err)?;
        }
        write_txn.commit().map_err(io_err)?;
        Ok(())
    }

    /// All rows of a table in id order.
    fn rows<T: DeserializeOwned>(
        &self,
        table: RowTable,
    ) -> Result<Vec<T>, StoreSetupError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(table).map_err(io_err)?;

        let mut rows = Vec::new();
        for entry in table.iter().map_err(io_err)? {
            let (_, value) = entry.map_err(io_err)?;
            rows.push(decode(value.value())?);
        }
        Ok(rows)
    }
}

impl CatalogStore for RedbCatalog {
    fn insert_product(&mut self, name: &str, enabled: bool) -> Result<ProductId, StoreSetupError> {
        validate_name(name)?;
        let id = self.insert_row(PRODUCTS, NEXT_PRODUCT_ID, |id| Product {
            id: ProductId(id),
            name: name.to_string(),
            enabled,
        })?;
        Ok(ProductId(id))
    }

    fn set_product_enabled(
        &mut self,
        id: ProductId,
        enabled: bool,
    ) -> Result<(), StoreSetupError> {
        self.update_row(
            PRODUCTS,
            id.0,
            StoreSetupError::ProductNotFound(id),
            |product: &mut Product| product.enabled = enabled,
        )
    }

    fn products(&self) -> Result<Vec<Product>, StoreSetupError> {
        self.rows(PRODUCTS)
    }

    fn insert_carrier(&mut self, name: &str, enabled: bool) -> Result<CarrierId, StoreSetupError> {
        validate_name(name)?;
        let id = self.insert_row(CARRIERS, NEXT_CARRIER_ID, |id| Carrier {
            id: CarrierId(id),
            name: name.to_string(),
            enabled,
        })?;
        Ok(CarrierId(id))
    }

    fn set_carrier_enabled(
        &mut self,
        id: CarrierId,
        enabled: bool,
    ) -> Result<(), StoreSetupError> {
        self.update_row(
            CARRIERS,
            id.0,
            StoreSetupError::CarrierNotFound(id),
            |carrier: &mut Carrier| carrier.enabled = enabled,
        )
    }

    fn carriers(&self) -> Result<Vec<Carrier>, StoreSetupError> {
        self.rows(CARRIERS)
    }

    fn insert_price_range(
        &mut self,
        range: NewPriceRange,
    ) -> Result<PriceRangeId, StoreSetupError> {
        range.validate()?;

        // The carrier check and the insert share one transaction.
        let write_txn = self.db.begin_write().map_err(io_err)?;
        if !Self::row_exists(&write_txn, CARRIERS, range.carrier.0)? {
            return Err(StoreSetupError::CarrierNotFound(range.carrier));
        }
        let id = PriceRangeId(Self::allocate_id(&write_txn, NEXT_PRICE_RANGE_ID)?);
        Self::put_row(&write_txn, PRICE_RANGES, id.0, &range.with_id(id))?;
        write_txn.commit().map_err(io_err)?;

        Ok(id)
    }

    fn price_ranges(&self) -> Result<Vec<CarrierPriceRange>, StoreSetupError> {
        self.rows(PRICE_RANGES)
    }

    fn config_value(&self, key: &str) -> Result<Option<String>, StoreSetupError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(CONFIG).map_err(io_err)?;
        let value = table
            .get(key)
            .map_err(io_err)?
            .map(|v| v.value().to_string());
        Ok(value)
    }

    fn set_config_value(&mut self, key: &str, value: &str) -> Result<(), StoreSetupError> {
        validate_config_entry(key, value)?;

        let write_txn = self.db.begin_write().map_err(io_err)?;
        {
            let mut table = write_txn.open_table(CONFIG).map_err(io_err)?;
            table.insert(key, value).map_err(io_err)?;
        }
        write_txn.commit().map_err(io_err)?;
        Ok(())
    }

    fn insert_seed(&mut self, seed: &CatalogSeed) -> Result<SeedSummary, StoreSetupError> {
        let mut summary = SeedSummary::default();

        // One transaction: an error drops it uncommitted and nothing is written.
        let write_txn = self.db.begin_write().map_err(io_err)?;

        for product in &seed.products {
            validate_name(&product.name)?;
            let id = Self::allocate_id(&write_txn, NEXT_PRODUCT_ID)?;
            let row = Product {
                id: ProductId(id),
                name: product.name.clone(),
                enabled: product.enabled,
            };
            Self::put_row(&write_txn, PRODUCTS, id, &row)?;
            summary.products += 1;
        }

        for carrier in &seed.carriers {
            validate_name(&carrier.name)?;
            let id = CarrierId(Self::allocate_id(&write_txn, NEXT_CARRIER_ID)?);
            let row = Carrier {
                id,
                name: carrier.name.clone(),
                enabled: carrier.enabled,
            };
            Self::put_row(&write_txn, CARRIERS, id.0, &row)?;
            summary.carriers += 1;

            for range in &carrier.price_ranges {
                let range = range.for_carrier(id);
                range.validate()?;
                let range_id = PriceRangeId(Self::allocate_id(&write_txn, NEXT_PRICE_RANGE_ID)?);
                Self::put_row(&write_txn, PRICE_RANGES, range_id.0, &range.with_id(range_id))?;
                summary.price_ranges += 1;
            }
        }

        {
            let mut table = write_txn.open_table(CONFIG).map_err(io_err)?;
            for (key, value) in &seed.configuration {
                validate_config_entry(key, value)?;
                table.insert(key.as_str(), value.as_str()).map_err(io_err)?;
                summary.configuration += 1;
            }
        }

        write_txn.commit().map_err(io_err)?;
        Ok(summary)
    }
}

// =============================================================================
// TESTS
// =============================================================================

//! CLI command implementations.
//!
//! Every command writes its result to the given writer, as text or, with
//! `--json-mode`, as a single pretty-printed JSON document.

use super::{ConfigAction, EntityAction, PriceRangeAction};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use storesetup_core::{
    CarrierId, CarrierPriceRangeRepository, CatalogSeed, CatalogStore, ConfigurationManager,
    NewPriceRange, ProductId, Repositories, Repository, RepositoryKind, Store, StoreSetupError,
    WizardPlan,
};

/// Maximum seed file size (10 MB).
const MAX_SEED_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    /// Catalog database path.
    pub database: PathBuf,
    /// Wizard steps to evaluate.
    pub plan: WizardPlan,
    /// Emit JSON instead of text.
    pub json_mode: bool,
}

// =============================================================================
// HELPERS
// =============================================================================

fn io_err(e: std::io::Error) -> StoreSetupError {
    StoreSetupError::IoError(format!("Write output: {}", e))
}

fn write_json<T: Serialize + ?Sized>(
    out: &mut dyn Write,
    value: &T,
) -> Result<(), StoreSetupError> {
    serde_json::to_writer_pretty(&mut *out, value)
        .map_err(|e| StoreSetupError::SerializationError(e.to_string()))?;
    writeln!(out).map_err(io_err)
}

/// Open the catalog created by `init`. A missing database is an error.
fn open_store(ctx: &Context) -> Result<Store, StoreSetupError> {
    tracing::debug!("Opening catalog at {}", ctx.database.display());
    Store::open_redb(&ctx.database)
}

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), StoreSetupError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| StoreSetupError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(StoreSetupError::InvalidInput(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Resolve an input path and require a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, StoreSetupError> {
    let canonical = path.canonicalize().map_err(|e| {
        StoreSetupError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(StoreSetupError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

fn write_entity_row(
    out: &mut dyn Write,
    id: u64,
    name: &str,
    enabled: bool,
) -> Result<(), StoreSetupError> {
    let state = if enabled { "enabled" } else { "disabled" };
    writeln!(out, "{:>6}  {:<8}  {}", id, state, name).map_err(io_err)
}

fn write_toggle(
    ctx: &Context,
    out: &mut dyn Write,
    entity: &str,
    id: u64,
    enabled: bool,
) -> Result<(), StoreSetupError> {
    tracing::info!(id, enabled, "{} toggled", entity);
    if ctx.json_mode {
        return write_json(out, &serde_json::json!({ "id": id, "enabled": enabled }));
    }
    let verb = if enabled { "Enabled" } else { "Disabled" };
    writeln!(out, "{} {} {}", verb, entity, id).map_err(io_err)
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Create an empty catalog database.
pub fn cmd_init(ctx: &Context, out: &mut dyn Write, force: bool) -> Result<(), StoreSetupError> {
    if ctx.database.exists() {
        if !force {
            return Err(StoreSetupError::InvalidInput(format!(
                "Database {} already exists (use --force to overwrite)",
                ctx.database.display()
            )));
        }
        std::fs::remove_file(&ctx.database)
            .map_err(|e| StoreSetupError::IoError(format!("Remove database: {}", e)))?;
        tracing::warn!("Removed existing database {}", ctx.database.display());
    }

    Store::with_redb(&ctx.database)?;
    tracing::info!("Initialized catalog at {}", ctx.database.display());

    if ctx.json_mode {
        return write_json(
            out,
            &serde_json::json!({
                "database": ctx.database.to_string_lossy(),
                "initialized": true
            }),
        );
    }

    writeln!(out, "Initialized empty catalog at {}", ctx.database.display()).map_err(io_err)
}

// =============================================================================
// WIZARD COMMANDS
// =============================================================================

/// Show the status of every wizard step.
pub fn cmd_status(ctx: &Context, out: &mut dyn Write) -> Result<(), StoreSetupError> {
    let store = open_store(ctx)?;
    let report = ctx.plan.build_for_store(&store)?.report()?;

    if ctx.json_mode {
        return write_json(
            out,
            &serde_json::json!({
                "database": ctx.database.to_string_lossy(),
                "steps": report.steps,
                "completed": report.completed(),
                "next_step": report.next_step,
                "finished": report.finished
            }),
        );
    }

    writeln!(out, "Store Setup Wizard").map_err(io_err)?;
    writeln!(out, "==================").map_err(io_err)?;
    writeln!(out, "Database: {}", ctx.database.display()).map_err(io_err)?;
    writeln!(out).map_err(io_err)?;
    for step in &report.steps {
        let mark = if step.complete { 'x' } else { ' ' };
        writeln!(out, "  [{}] {}. {}", mark, step.id, step.label).map_err(io_err)?;
    }
    writeln!(out).map_err(io_err)?;

    let summary = match report.steps.iter().find(|s| Some(s.id) == report.next_step) {
        Some(step) => format!(
            "Next step: {} ({}), {}/{} complete",
            step.id,
            step.label,
            report.completed(),
            report.steps.len()
        ),
        None => "Wizard finished".to_string(),
    };
    writeln!(out, "{}", summary).map_err(io_err)
}

/// Show the next incomplete step.
pub fn cmd_next(ctx: &Context, out: &mut dyn Write) -> Result<(), StoreSetupError> {
    let store = open_store(ctx)?;
    let state = ctx.plan.build_for_store(&store)?.state()?;

    if ctx.json_mode {
        return write_json(out, &state);
    }

    let line = match state.next_step() {
        Some(step) => step.to_string(),
        None => "finished".to_string(),
    };
    writeln!(out, "{}", line).map_err(io_err)
}

// =============================================================================
// CATALOG COMMANDS
// =============================================================================

/// Add, toggle or list products.
pub fn cmd_product(
    ctx: &Context,
    out: &mut dyn Write,
    action: EntityAction,
) -> Result<(), StoreSetupError> {
    let mut store = open_store(ctx)?;

    match action {
        EntityAction::Add { name, disabled } => {
            let id = store.insert_product(&name, !disabled)?;
            tracing::info!(id = id.0, "product added");
            if ctx.json_mode {
                return write_json(
                    out,
                    &serde_json::json!({ "id": id, "name": name, "enabled": !disabled }),
                );
            }
            writeln!(out, "Added product {} ({})", id.0, name).map_err(io_err)
        }
        EntityAction::Enable { id } => {
            store.set_product_enabled(ProductId(id), true)?;
            write_toggle(ctx, out, "product", id, true)
        }
        EntityAction::Disable { id } => {
            store.set_product_enabled(ProductId(id), false)?;
            write_toggle(ctx, out, "product", id, false)
        }
        EntityAction::List => {
            let products = store.products()?;
            if ctx.json_mode {
                return write_json(out, &products);
            }
            if products.is_empty() {
                return writeln!(out, "No products").map_err(io_err);
            }
            for product in &products {
                write_entity_row(out, product.id.0, &product.name, product.enabled)?;
            }
            Ok(())
        }
    }
}

/// Add, toggle or list carriers.
pub fn cmd_carrier(
    ctx: &Context,
    out: &mut dyn Write,
    action: EntityAction,
) -> Result<(), StoreSetupError> {
    let mut store = open_store(ctx)?;

    match action {
        EntityAction::Add { name, disabled } => {
            let id = store.insert_carrier(&name, !disabled)?;
            tracing::info!(id = id.0, "carrier added");
            if ctx.json_mode {
                return write_json(
                    out,
                    &serde_json::json!({ "id": id, "name": name, "enabled": !disabled }),
                );
            }
            writeln!(out, "Added carrier {} ({})", id.0, name).map_err(io_err)
        }
        EntityAction::Enable { id } => {
            store.set_carrier_enabled(CarrierId(id), true)?;
            write_toggle(ctx, out, "carrier", id, true)
        }
        EntityAction::Disable { id } => {
            store.set_carrier_enabled(CarrierId(id), false)?;
            write_toggle(ctx, out, "carrier", id, false)
        }
        EntityAction::List => {
            let carriers = store.carriers()?;
            if ctx.json_mode {
                return write_json(out, &carriers);
            }
            if carriers.is_empty() {
                return writeln!(out, "No carriers").map_err(io_err);
            }
            for carrier in &carriers {
                write_entity_row(out, carrier.id.0, &carrier.name, carrier.enabled)?;
            }
            Ok(())
        }
    }
}

/// Add, list or quote carrier price ranges.
pub fn cmd_price_range(
    ctx: &Context,
    out: &mut dyn Write,
    action: PriceRangeAction,
) -> Result<(), StoreSetupError> {
    let mut store = open_store(ctx)?;

    match action {
        PriceRangeAction::Add {
            carrier,
            from,
            to,
            price,
        } => {
            let range = NewPriceRange {
                carrier: CarrierId(carrier),
                from_amount: from,
                to_amount: to,
                price,
            };
            let id = store.insert_price_range(range)?;
            let stored = range.with_id(id);
            if ctx.json_mode {
                return write_json(out, &stored);
            }
            writeln!(
                out,
                "Added price range {} for carrier {}: [{}, {}) costs {}",
                id.0, carrier, from, to, price
            )
            .map_err(io_err)
        }
        PriceRangeAction::List { carrier } => {
            let ranges = match carrier {
                Some(carrier) => {
                    CarrierPriceRangeRepository::new(&store).find_by_carrier(CarrierId(carrier))?
                }
                None => store.price_ranges()?,
            };
            if ctx.json_mode {
                return write_json(out, &ranges);
            }
            if ranges.is_empty() {
                return writeln!(out, "No price ranges").map_err(io_err);
            }
            for range in &ranges {
                writeln!(
                    out,
                    "{:>6}  carrier {:<4}  [{}, {})  {}",
                    range.id.0, range.carrier.0, range.from_amount, range.to_amount, range.price
                )
                .map_err(io_err)?;
            }
            Ok(())
        }
        PriceRangeAction::Quote { carrier, amount } => {
            let range = CarrierPriceRangeRepository::new(&store)
                .find_for_amount(CarrierId(carrier), amount)?;
            if ctx.json_mode {
                return write_json(out, &range);
            }
            let line = match range {
                Some(range) => format!(
                    "Carrier {} charges {} for amount {} (range {})",
                    carrier, range.price, amount, range.id.0
                ),
                None => format!(
                    "No price range of carrier {} covers amount {}",
                    carrier, amount
                ),
            };
            writeln!(out, "{}", line).map_err(io_err)
        }
    }
}

/// Read or write a configuration value.
pub fn cmd_config(
    ctx: &Context,
    out: &mut dyn Write,
    action: ConfigAction,
) -> Result<(), StoreSetupError> {
    let mut store = open_store(ctx)?;

    match action {
        ConfigAction::Get { key } => {
            let value = ConfigurationManager::new(&store).get(&key)?;
            if ctx.json_mode {
                return write_json(out, &serde_json::json!({ "key": key, "value": value }));
            }
            let line = match value {
                Some(value) => value,
                None => format!("{} is not set", key),
            };
            writeln!(out, "{}", line).map_err(io_err)
        }
        ConfigAction::Set { key, value } => {
            store.set_config_value(&key, &value)?;
            if ctx.json_mode {
                return write_json(out, &serde_json::json!({ "key": key, "value": value }));
            }
            writeln!(out, "{} = {}", key, value).map_err(io_err)
        }
    }
}

// =============================================================================
// SEED COMMAND
// =============================================================================

/// Load products, carriers and configuration from a TOML file.
pub fn cmd_seed(ctx: &Context, out: &mut dyn Write, file: &Path) -> Result<(), StoreSetupError> {
    let path = validate_file_path(file)?;
    validate_file_size(&path, MAX_SEED_FILE_SIZE)?;

    let content = std::fs::read_to_string(&path)
        .map_err(|e| StoreSetupError::IoError(format!("Read seed file: {}", e)))?;
    let seed: CatalogSeed = toml::from_str(&content)
        .map_err(|e| StoreSetupError::SerializationError(format!("Seed file: {}", e)))?;

    let mut store = open_store(ctx)?;
    let summary = seed.apply(&mut store)?;

    if ctx.json_mode {
        return write_json(out, &summary);
    }

    writeln!(
        out,
        "Seeded {} products, {} carriers, {} price ranges, {} configuration values",
        summary.products, summary.carriers, summary.price_ranges, summary.configuration
    )
    .map_err(io_err)
}

// =============================================================================
// RESOLVE COMMAND
// =============================================================================

#[derive(Debug, Serialize)]
struct Resolution<'a> {
    kind: RepositoryKind,
    canonical_name: &'static str,
    aliases: &'static [&'static str],
    description: &'static str,
    requested: &'a str,
    enabled_rows: Option<usize>,
}

/// Resolve a repository service name or alias.
pub fn cmd_resolve(ctx: &Context, out: &mut dyn Write, name: &str) -> Result<(), StoreSetupError> {
    let store = open_store(ctx)?;
    let repository = Repositories::of(&store).resolve(name)?;

    let enabled_rows = match &repository {
        Repository::Product(repo) => Some(repo.find_by_enabled(true)?.len()),
        Repository::Carrier(repo) => Some(repo.find_by_enabled(true)?.len()),
        Repository::CarrierPriceRange(_) | Repository::Configuration(_) => None,
    };

    let kind = repository.kind();
    let resolution = Resolution {
        kind,
        canonical_name: kind.canonical_name(),
        aliases: kind.aliases(),
        description: kind.description(),
        requested: name,
        enabled_rows,
    };

    if ctx.json_mode {
        return write_json(out, &resolution);
    }

    writeln!(out, "{} -> {}", name, resolution.canonical_name).map_err(io_err)?;
    writeln!(out, "Kind:    {}", resolution.description).map_err(io_err)?;
    writeln!(out, "Aliases: {}", resolution.aliases.join(", ")).map_err(io_err)?;
    if let Some(count) = enabled_rows {
        writeln!(out, "Enabled: {}", count).map_err(io_err)?;
    }
    Ok(())
}

//! Crossledger Demo Binary
//!
//! Seeds a small ledger (currencies, users, rates, opening balances) and
//! drives a burst of concurrent transfers through the engine.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crossledger_engine::{EngineConfig, TransferEngine};
use crossledger_ledger::{BalanceStore, CurrencyRegistry, TransactionLog, UserDirectory};
use crossledger_rates::RateTable;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Starting crossledger demo");

    let config = EngineConfig::from_env();
    if let Err(e) = config.validate() {
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    let registry = Arc::new(CurrencyRegistry::new());
    let directory = Arc::new(UserDirectory::new());
    let rates = Arc::new(RateTable::new());
    let balances = Arc::new(BalanceStore::new());
    let log = Arc::new(TransactionLog::new());

    // Reference data
    let clp = registry.register("Chilean Peso", "CLP")?;
    let usd = registry.register("US Dollar", "USD")?;
    let eur = registry.register("Euro", "EUR")?;
    for currency in [clp, usd, eur] {
        rates.seed_identity(currency);
    }
    rates.upsert(clp, usd, Decimal::ONE / Decimal::from(950));
    rates.upsert(usd, clp, Decimal::from(950));
    rates.upsert(usd, eur, "0.92".parse()?);
    rates.upsert(eur, usd, "1.08".parse()?);

    let alice = directory.create("Alice", "alice@example.com", Vec::new(), clp)?;
    let bob = directory.create("Bob", "bob@example.com", Vec::new(), usd)?;
    let carol = directory.create("Carol", "carol@example.com", Vec::new(), eur)?;

    balances.deposit(alice, clp, Decimal::from(100_000))?;
    balances.deposit(bob, usd, Decimal::from(500))?;

    let engine = Arc::new(TransferEngine::new(
        config,
        registry,
        directory,
        rates,
        balances.clone(),
        log.clone(),
    ));

    // Concurrent burst: several transfers touching overlapping rows.
    let mut tasks = Vec::new();
    for _ in 0..5 {
        let engine = engine.clone();
        tasks.push(tokio::spawn(async move {
            engine.transfer(alice, bob, clp, Decimal::from(15_000)).await
        }));
    }
    for _ in 0..3 {
        let engine = engine.clone();
        tasks.push(tokio::spawn(async move {
            engine.transfer(bob, carol, usd, Decimal::from(100)).await
        }));
    }

    for task in tasks {
        match task.await? {
            Ok(outcome) => info!(
                transaction_id = %outcome.transaction_id,
                settled = %outcome.settled(),
                "Transfer succeeded"
            ),
            Err(e) => warn!(code = e.error_code(), error = %e, "Transfer failed"),
        }
    }

    info!(
        transfers = log.len(),
        alice_clp = %balances.read(alice, clp).unwrap_or_default(),
        bob_usd = %balances.read(bob, usd).unwrap_or_default(),
        carol_eur = %balances.read(carol, eur).unwrap_or_default(),
        "Demo complete"
    );

    Ok(())
}

use ship_registry::infra::config;
use ship_registry::storage::{PgShipStore, RecordStore};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--create-table]\n\
         \n\
         Requires env vars:\n\
           DATABASE_URL\n\
         Optional:\n\
           DB_MAX_CONNECTIONS, BIND_ADDR\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let create_table = args.iter().any(|a| a == "--create-table");

    // Force-read config (nice error messages if malformed)
    let database_url = config::database_url()
        .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set for preflight"))?;
    let max_connections = config::db_max_connections()?;
    let bind_addr = config::bind_addr()?;

    println!("> Preflight:");
    println!("  BIND_ADDR={}", bind_addr);
    println!("  DB_MAX_CONNECTIONS={}", max_connections);

    let store = PgShipStore::connect(&database_url, max_connections).await?;
    store.ping().await?;
    println!("  Database is reachable.");

    let table_exists: bool = sqlx::query_scalar("SELECT to_regclass('public.ships') IS NOT NULL")
        .fetch_one(store.pool())
        .await?;
    if table_exists {
        println!("  Table `ships` exists.");
    } else if create_table {
        println!("  Table `ships` missing -> creating...");
        store.ensure_schema().await?;
        println!("  Table `ships` created.");
    } else {
        return Err(anyhow::anyhow!(
            "Table `ships` does not exist. Re-run with --create-table (the API server also creates it on startup)"
        ));
    }

    let rows = store.count_all().await?;
    println!("  Ships stored: {}", rows);

    println!("> Preflight OK.");
    Ok(())
}

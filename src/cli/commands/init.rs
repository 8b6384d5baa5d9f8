use serde_json::json;

use crate::cli::OutputFormat;
use crate::database::manager::DatabaseManager;
use crate::database::SCHEMA_SQL;

/// Create the application database (if missing) and apply the embedded
/// schema. Every statement is idempotent, so re-running is safe.
pub async fn handle(drop: bool, output_format: OutputFormat) -> anyhow::Result<()> {
    let db_name = DatabaseManager::app_db_name();

    if drop {
        DatabaseManager::drop_database(&db_name).await?;
    }

    if !database_exists(&db_name).await? {
        DatabaseManager::create_database(&db_name).await?;
    }

    let pool = DatabaseManager::app_pool().await?;
    let mut applied = 0usize;
    for statement in SCHEMA_SQL.split(';') {
        let statement = statement.trim();
        if statement.is_empty() {
            continue;
        }
        sqlx::query(statement).execute(&pool).await?;
        applied += 1;
    }

    match output_format {
        OutputFormat::Json => println!(
            "{}",
            json!({ "database": db_name, "statements_applied": applied, "dropped": drop })
        ),
        OutputFormat::Text => {
            println!("Applied {} schema statements to '{}'", applied, db_name)
        }
    }

    Ok(())
}

async fn database_exists(name: &str) -> anyhow::Result<bool> {
    let admin_pool = DatabaseManager::admin_pool().await?;
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM pg_database WHERE datname = $1")
        .bind(name)
        .fetch_one(&admin_pool)
        .await?;
    Ok(count.0 > 0)
}

//! oxide-dialect CLI
//!
//! Command-line tool for previewing dialect output and introspecting a
//! database.

mod fields;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use oxide_dialect::{resolve_dialect_with_diagnostics, Dialect, PageArg, StructField};
use oxide_dialect_sqlite::SqliteDatabase;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

/// Preview column types and run catalog introspection for any registered dialect.
#[derive(Parser)]
#[command(name = "oxide-dialect")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL. Only opened by commands that query the database.
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite::memory:")]
    database: String,

    /// Dialect name (`sqlite3`, `oci8`, `common`, ...).
    #[arg(long, env = "OXIDE_DIALECT", default_value = "sqlite3")]
    dialect: String,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the column definition of every field in a JSON file.
    ColumnTypes {
        /// JSON array of field definitions.
        file: PathBuf,
    },

    /// Quote identifiers.
    Quote {
        /// Identifiers to quote.
        #[arg(required = true)]
        identifiers: Vec<String>,
    },

    /// Print the pagination clause.
    Paginate {
        /// Maximum number of rows.
        #[arg(short, long)]
        limit: Option<String>,

        /// Number of rows to skip.
        #[arg(short, long)]
        offset: Option<String>,
    },

    /// Check whether a table, column, index or foreign key exists.
    Inspect {
        /// Table name.
        #[arg(short, long)]
        table: String,

        /// Column name.
        #[arg(short, long)]
        column: Option<String>,

        /// Index name.
        #[arg(short, long)]
        index: Option<String>,

        /// Foreign key name.
        #[arg(short, long)]
        foreign_key: Option<String>,
    },

    /// Print the current database.
    CurrentDatabase,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    oxide_dialect_oracle::register();
    oxide_dialect_sqlite::register();

    let db = SqliteDatabase::connect_lazy(&cli.database)?;
    let (dialect, _warning) = resolve_dialect_with_diagnostics(&cli.dialect, Arc::new(db));
    debug!(dialect = dialect.name(), "Resolved dialect");

    match cli.command {
        Commands::ColumnTypes { file } => {
            for line in column_definitions(dialect.as_ref(), fields::load(&file)?)? {
                println!("{line}");
            }
        }

        Commands::Quote { identifiers } => {
            for identifier in &identifiers {
                println!("{}", dialect.quote(identifier));
            }
        }

        Commands::Paginate { limit, offset } => {
            let clause =
                dialect.limit_and_offset_sql(limit.map(PageArg::from), offset.map(PageArg::from));
            println!("{}", clause.trim_start());
        }

        Commands::Inspect {
            table,
            column,
            index,
            foreign_key,
        } => {
            println!("table {table}: {}", dialect.has_table(&table).await?);
            if let Some(column) = column {
                println!(
                    "column {table}.{column}: {}",
                    dialect.has_column(&table, &column).await?
                );
            }
            if let Some(index) = index {
                println!(
                    "index {index}: {}",
                    dialect.has_index(&table, &index).await?
                );
            }
            if let Some(foreign_key) = foreign_key {
                println!(
                    "foreign key {foreign_key}: {}",
                    dialect.has_foreign_key(&table, &foreign_key).await?
                );
            }
        }

        Commands::CurrentDatabase => {
            println!("{}", dialect.current_database().await?);
        }
    }

    Ok(())
}

/// Renders `<quoted column> <column type>` for every field.
fn column_definitions(
    dialect: &dyn Dialect,
    fields: Vec<StructField>,
) -> anyhow::Result<Vec<String>> {
    fields
        .into_iter()
        .map(|mut field| -> anyhow::Result<String> {
            let column_type = dialect.column_type(&mut field)?;
            Ok(format!("{} {column_type}", dialect.quote(&field.db_name)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxide_dialect::{CommonDialect, MockConnection, ValueType};

    #[test]
    fn test_column_definitions() {
        let dialect = CommonDialect::new(Arc::new(MockConnection::new()));
        let lines = column_definitions(
            &dialect,
            vec![
                StructField::of::<i64>("ID").primary_key(),
                StructField::of::<String>("Name").tag("NOT NULL", "NOT NULL"),
            ],
        )
        .unwrap();
        assert_eq!(
            lines,
            [
                "\"id\" BIGINT AUTO_INCREMENT",
                "\"name\" VARCHAR(255) NOT NULL"
            ]
        );
    }

    #[test]
    fn test_column_definitions_fail_on_unsupported_type() {
        let dialect = CommonDialect::new(Arc::new(MockConnection::new()));
        let err = column_definitions(
            &dialect,
            vec![StructField::new("address", ValueType::Struct("Address".into()))],
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid sql type Address"));
    }

    #[test]
    fn test_cli_parses() {
        let cli =
            Cli::try_parse_from(["oxide-dialect", "--dialect", "oci8", "paginate", "-l", "10"])
                .unwrap();
        assert_eq!(cli.dialect, "oci8");
        assert!(matches!(
            cli.command,
            Commands::Paginate { limit: Some(ref l), offset: None } if l == "10"
        ));
    }
}

// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation
//!
//! Wraps the cargo invocations CI runs, plus a migration check that needs
//! no external services.
//!
//! - `cargo xtask ci` runs formatting, clippy, build and tests
//! - `cargo xtask verify-migrations` applies the embedded migrations to an
//!   in-memory `SQLite` database and compares the result with the schema
//!   the persistence crate is compiled against

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::{fmt::Debug, io, process::Output, vec};

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{eyre::Context, Result};
use diesel::sql_types::{Integer, Text};
use diesel::{QueryableByName, RunQueryDsl, SqliteConnection};
use duct::cmd;
use std::collections::{BTreeMap, BTreeSet};
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask")]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test, migrations)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Lint formatting and clippy
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy on the project
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Check for formatting issues in the project
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Fix clippy warnings in the project
    #[command(visible_alias = "fc")]
    FixClippy,

    /// Fix formatting issues in the project
    #[command(visible_alias = "ff")]
    FixFormatting,

    /// Run all tests
    #[command(visible_alias = "t")]
    Test,

    /// Apply migrations to a scratch database and check the schema
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => build(),
            Self::Check => check(),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintFormatting => lint_format(),
            Self::FixClippy => fix_clippy(),
            Self::FixFormatting => fix_format(),
            Self::Test => test(),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

/// Run CI checks (lint, build, test, migrations)
fn ci() -> Result<()> {
    lint()?;
    build()?;
    test()?;
    verify_migrations()?;
    Ok(())
}

/// Build the project
fn build() -> Result<()> {
    run_cargo(vec!["build", "--all-targets", "--all-features"])
}

/// Run cargo check
fn check() -> Result<()> {
    run_cargo(vec!["check", "--all-targets", "--all-features"])
}

/// Lint formatting and clippy
fn lint() -> Result<()> {
    lint_format()?;
    lint_clippy()?;
    Ok(())
}

/// Run clippy on the project
fn lint_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

/// Fix clippy warnings in the project
fn fix_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--fix",
        "--allow-dirty",
        "--allow-staged",
        "--",
        "-D",
        "warnings",
    ])
}

/// Lint formatting issues in the project
fn lint_format() -> Result<()> {
    run_cargo(vec!["fmt", "--all", "--check"])
}

/// Fix formatting issues in the project
fn fix_format() -> Result<()> {
    run_cargo(vec!["fmt", "--all"])
}

/// Run the workspace tests, doc tests last because they're slow
fn test() -> Result<()> {
    run_cargo(vec!["test", "--all-targets", "--all-features"])?;
    run_cargo(vec!["test", "--doc", "--all-features"])
}

/// Run a cargo subcommand with the default toolchain
fn run_cargo(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// Columns every migrated table must have, as `(name, type, nullable)`.
///
/// Mirrors the Diesel schema the persistence crate compiles against.
const EXPECTED_TABLES: [(&str, &[(&str, &str, bool)]); 4] = [
    (
        "accounts",
        &[
            ("account_id", "integer", false),
            ("login_name", "text", false),
            ("display_name", "text", false),
            ("password_hash", "text", true),
            ("setup_code", "text", true),
            ("role", "text", false),
            ("technician_id", "integer", true),
            ("is_disabled", "integer", false),
            ("created_at", "text", false),
            ("disabled_at", "text", true),
            ("last_login_at", "text", true),
        ],
    ),
    (
        "service_orders",
        &[
            ("order_id", "integer", false),
            ("order_number", "text", false),
            ("status", "text", false),
            ("technician_id", "integer", true),
            ("client_id", "integer", false),
            ("amount_cents", "integer", false),
            ("created_at", "text", false),
            ("updated_at", "text", false),
        ],
    ),
    (
        "sessions",
        &[
            ("session_id", "integer", false),
            ("session_token", "text", false),
            ("account_id", "integer", false),
            ("created_at", "text", false),
            ("last_activity_at", "text", false),
            ("expires_at", "text", false),
        ],
    ),
    (
        "technicians",
        &[
            ("technician_id", "integer", false),
            ("name", "text", false),
            ("phone", "text", true),
            ("created_at", "text", false),
        ],
    ),
];

/// Foreign keys the migrated schema must declare, as
/// `(table, column, referenced table, referenced column)`.
const EXPECTED_FOREIGN_KEYS: [(&str, &str, &str, &str); 3] = [
    ("accounts", "technician_id", "technicians", "technician_id"),
    ("service_orders", "technician_id", "technicians", "technician_id"),
    ("sessions", "account_id", "accounts", "account_id"),
];

/// Verify the embedded migrations
///
/// 1. Applies every migration to an in-memory `SQLite` database
/// 2. Compares the resulting tables, columns and foreign keys with the
///    schema the persistence crate is compiled against
/// 3. Reverts every migration and checks that no table is left behind
/// 4. Applies them again, so `down.sql` and `up.sql` stay in step
fn verify_migrations() -> Result<()> {
    use diesel::Connection;
    use diesel_migrations::{embed_migrations, MigrationHarness};

    const MIGRATIONS: diesel_migrations::EmbeddedMigrations =
        embed_migrations!("../crates/persistence/migrations");

    tracing::info!("Starting migration verification");

    let mut conn = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;

    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .wrap_err("Failed to enable foreign keys on SQLite")?;

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to apply migrations: {}", e))?;
    tracing::info!("Migrations applied successfully");

    let schema = introspect_sqlite_schema(&mut conn)?;
    compare_with_expected(&schema)?;
    tracing::info!("Migrated schema matches the Diesel schema");

    conn.revert_all_migrations(MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to revert migrations: {}", e))?;
    let reverted = introspect_sqlite_schema(&mut conn)?;
    if !reverted.tables.is_empty() {
        let leftover: Vec<&String> = reverted.tables.keys().collect();
        return Err(color_eyre::eyre::eyre!(
            "❌ Migration check FAILED: tables left after revert: {:?}",
            leftover
        ));
    }

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to re-apply migrations: {}", e))?;
    if introspect_sqlite_schema(&mut conn)? != schema {
        return Err(color_eyre::eyre::eyre!(
            "❌ Migration check FAILED: schema differs after revert and re-apply"
        ));
    }

    tracing::info!("✓ Migration verification passed");
    Ok(())
}

/// Normalized schema representation
#[derive(Debug, Clone, PartialEq, Eq)]
struct Schema {
    tables: BTreeMap<String, Table>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Table {
    columns: BTreeMap<String, Column>,
    primary_keys: BTreeSet<String>,
    foreign_keys: BTreeSet<ForeignKey>,
    unique_constraints: BTreeSet<UniqueConstraint>,
    indexes: BTreeSet<Index>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Column {
    normalized_type: String,
    nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ForeignKey {
    from_column: String,
    to_table: String,
    to_column: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct UniqueConstraint {
    columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Index {
    name: String,
    columns: Vec<String>,
}

/// Introspect `SQLite` schema
fn introspect_sqlite_schema(conn: &mut SqliteConnection) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        r#type: String,
        #[diesel(sql_type = Integer)]
        notnull: i32,
        #[diesel(sql_type = Integer)]
        pk: i32,
    }

    #[derive(QueryableByName)]
    struct ForeignKeyInfo {
        #[diesel(sql_type = Text)]
        table: String,
        #[diesel(sql_type = Text)]
        from: String,
        #[diesel(sql_type = Text)]
        to: String,
    }

    #[derive(QueryableByName)]
    struct IndexInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        origin: String,
    }

    #[derive(QueryableByName)]
    struct IndexColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
    }

    let mut schema = Schema {
        tables: BTreeMap::new(),
    };

    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' ORDER BY name"
    )
    .load(conn)
    .wrap_err("Failed to query SQLite tables")?;

    for table in tables {
        let mut table_info = Table {
            columns: BTreeMap::new(),
            primary_keys: BTreeSet::new(),
            foreign_keys: BTreeSet::new(),
            unique_constraints: BTreeSet::new(),
            indexes: BTreeSet::new(),
        };

        let columns: Vec<ColumnInfo> =
            diesel::sql_query(format!("PRAGMA table_info({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get columns for table {}", table.name))?;

        for col in columns {
            // SQLite reports INTEGER PRIMARY KEY columns as nullable.
            let nullable = col.notnull == 0 && col.pk == 0;
            table_info.columns.insert(
                col.name.clone(),
                Column {
                    normalized_type: normalize_sqlite_type(&col.r#type),
                    nullable,
                },
            );

            if col.pk > 0 {
                table_info.primary_keys.insert(col.name);
            }
        }

        let fks: Vec<ForeignKeyInfo> =
            diesel::sql_query(format!("PRAGMA foreign_key_list({})", table.name))
                .load(conn)
                .wrap_err(format!(
                    "Failed to get foreign keys for table {}",
                    table.name
                ))?;

        for fk in fks {
            table_info.foreign_keys.insert(ForeignKey {
                from_column: fk.from,
                to_table: fk.table,
                to_column: fk.to,
            });
        }

        let indexes: Vec<IndexInfo> =
            diesel::sql_query(format!("PRAGMA index_list({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get indexes for table {}", table.name))?;

        for idx in indexes {
            let index_columns: Vec<IndexColumnInfo> =
                diesel::sql_query(format!("PRAGMA index_info({})", idx.name))
                    .load(conn)
                    .wrap_err(format!("Failed to get index columns for {}", idx.name))?;

            let column_names: Vec<String> = index_columns.into_iter().map(|c| c.name).collect();

            if idx.origin == "u" {
                table_info.unique_constraints.insert(UniqueConstraint {
                    columns: column_names,
                });
            } else if !idx.name.starts_with("sqlite_autoindex_") {
                table_info.indexes.insert(Index {
                    name: idx.name,
                    columns: column_names,
                });
            }
        }

        schema.tables.insert(table.name, table_info);
    }

    Ok(schema)
}

/// Normalize `SQLite` type to common representation
fn normalize_sqlite_type(sqlite_type: &str) -> String {
    let normalized = sqlite_type.to_uppercase();
    if normalized.contains("INT") {
        "integer".to_string()
    } else if normalized.contains("REAL")
        || normalized.contains("FLOA")
        || normalized.contains("DOUB")
    {
        "real".to_string()
    } else if normalized.contains("BLOB") {
        "blob".to_string()
    } else {
        "text".to_string()
    }
}

/// Compare the migrated schema with the expected tables and foreign keys
fn compare_with_expected(schema: &Schema) -> Result<()> {
    let actual_tables: BTreeSet<&str> = schema.tables.keys().map(String::as_str).collect();
    let expected_tables: BTreeSet<&str> = EXPECTED_TABLES.iter().map(|(name, _)| *name).collect();

    if actual_tables != expected_tables {
        let mut errors = Vec::new();

        for table in actual_tables.difference(&expected_tables) {
            errors.push(format!("  - Unexpected table '{table}'"));
        }

        for table in expected_tables.difference(&actual_tables) {
            errors.push(format!("  - Missing table '{table}'"));
        }

        return Err(color_eyre::eyre::eyre!(
            "❌ Migration check FAILED: Table mismatch\n{}",
            errors.join("\n")
        ));
    }

    for (table_name, expected_columns) in EXPECTED_TABLES {
        let table = &schema.tables[table_name];

        let actual: BTreeMap<&str, &Column> = table
            .columns
            .iter()
            .map(|(name, column)| (name.as_str(), column))
            .collect();
        let expected_names: BTreeSet<&str> =
            expected_columns.iter().map(|(name, _, _)| *name).collect();
        let actual_names: BTreeSet<&str> = actual.keys().copied().collect();

        if actual_names != expected_names {
            return Err(color_eyre::eyre::eyre!(
                "❌ Migration check FAILED: Column mismatch in table '{}'\n  Migrated: {:?}\n  Expected: {:?}",
                table_name,
                actual_names,
                expected_names
            ));
        }

        for (column_name, column_type, nullable) in expected_columns {
            let column = actual[column_name];
            if column.normalized_type != *column_type || column.nullable != *nullable {
                return Err(color_eyre::eyre::eyre!(
                    "❌ Migration check FAILED: Column '{}.{}' is {} (nullable: {}), expected {} (nullable: {})",
                    table_name,
                    column_name,
                    column.normalized_type,
                    column.nullable,
                    column_type,
                    nullable
                ));
            }
        }
    }

    for (table_name, from_column, to_table, to_column) in EXPECTED_FOREIGN_KEYS {
        let expected = ForeignKey {
            from_column: from_column.to_string(),
            to_table: to_table.to_string(),
            to_column: to_column.to_string(),
        };
        if !schema.tables[table_name].foreign_keys.contains(&expected) {
            return Err(color_eyre::eyre::eyre!(
                "❌ Migration check FAILED: Missing foreign key {}.{} -> {}.{}",
                table_name,
                from_column,
                to_table,
                to_column
            ));
        }
    }

    Ok(())
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before running it.
trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command that was run may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}

//! qail-oracle — Oracle SQL from the command line
//!
//! Prints the statements the compiler would send, without connecting.
//!
//! # Usage
//!
//! ```bash
//! # DDL for a new table
//! qail-oracle create users "id:increments, email:string(100):unique"
//!
//! # Drop plan, including the auto-increment sequence and trigger
//! qail-oracle drop users --pk id --if-exists
//!
//! # Compile a JSON descriptor
//! qail-oracle compile select.json --numbered
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use qail_oracle::prelude::*;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "qail-oracle")]
#[command(version)]
#[command(about = "Oracle dialect compiler for QAIL descriptors", long_about = None)]
#[command(after_help = "EXAMPLES:
    qail-oracle create users 'id:increments, email:string(100):unique'
    qail-oracle drop users --pk id --if-exists
    qail-oracle compile insert.json --format json")]
struct Cli {
    /// Config file (defaults to ./qail-oracle.toml, then the user config dir)
    #[arg(short, long, env = "QAIL_ORACLE_CONFIG")]
    config: Option<PathBuf>,

    /// Schema prefix, overriding the config file
    #[arg(long)]
    schema: Option<String>,

    /// Table prefix, overriding the config file
    #[arg(long)]
    prefix: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "sql")]
    format: OutputFormat,

    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Sql,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile `create table` from a column list
    Create {
        table: String,
        /// Columns, e.g. "id:increments, email:string(100):unique"
        columns: String,
        /// Table comment
        #[arg(long)]
        comment: Option<String>,
    },
    /// Compile the drop plan for a table
    Drop {
        table: String,
        /// Primary key column; drops its sequence and trigger too
        #[arg(long)]
        pk: Option<String>,
        #[arg(long)]
        if_exists: bool,
    },
    /// Compile a JSON descriptor
    Compile {
        file: PathBuf,
        /// Rewrite `?` placeholders into `:1, :2, ...`
        #[arg(long)]
        numbered: bool,
    },
    /// Show the effective configuration
    Config,
}

/// A descriptor file, tagged by `kind`.
#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Descriptor {
    Select(QueryDescriptor),
    Exists(QueryDescriptor),
    Insert(InsertDescriptor),
    InsertGetId(InsertDescriptor),
    InsertLob(InsertDescriptor),
    Update(UpdateDescriptor),
    UpdateLob(UpdateDescriptor),
    Delete(DeleteDescriptor),
    Blueprint(TableBlueprint),
}

fn init_tracing(verbose: u8) -> anyhow::Result<()> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_env("QAIL_ORACLE_LOG")
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(format!("qail_oracle={}", level)))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<OracleConfig> {
    let mut config = match &cli.config {
        Some(path) => OracleConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => OracleConfig::discover()?,
    };
    if let Some(schema) = &cli.schema {
        config.schema_prefix = Some(schema.clone());
    }
    if let Some(prefix) = &cli.prefix {
        config.table_prefix = prefix.clone();
    }
    config.validate()?;
    Ok(config)
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    init_tracing(cli.verbose)?;
    let config = load_config(cli)?;

    match &cli.command {
        Commands::Config => show_config(&config),
        Commands::Create {
            table,
            columns,
            comment,
        } => {
            let compiler = OracleCompiler::new(config);
            let mut blueprint = TableBlueprint::create(table);
            blueprint.columns = parse_columns(columns)?;
            blueprint.comment = comment.clone();
            let statements = compiler.compile_blueprint(&blueprint)?;
            print_ddl(&statements, cli.format)
        }
        Commands::Drop {
            table,
            pk,
            if_exists,
        } => {
            let compiler = OracleCompiler::new(config);
            let plan = compiler.compile_drop_table(table, pk.as_deref(), *if_exists);
            print_statements(&plan, false, cli.format)
        }
        Commands::Compile { file, numbered } => {
            let compiler = OracleCompiler::new(config);
            compile_file(&compiler, file, *numbered, cli.format)
        }
    }
}

fn compile_file(
    compiler: &OracleCompiler,
    file: &Path,
    numbered: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let content =
        std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let descriptor: Descriptor = serde_json::from_str(&content)
        .with_context(|| format!("parsing descriptor {}", file.display()))?;

    let stmt = match &descriptor {
        Descriptor::Blueprint(blueprint) => {
            return print_ddl(&compiler.compile_blueprint(blueprint)?, format);
        }
        Descriptor::Select(query) => compiler.compile_select(query)?,
        Descriptor::Exists(query) => compiler.compile_exists(query)?,
        Descriptor::Insert(insert) => compiler.compile_insert(insert)?,
        Descriptor::InsertGetId(insert) => compiler.compile_insert_get_id(insert)?,
        Descriptor::InsertLob(insert) => compiler.compile_insert_lob(insert)?,
        Descriptor::Update(update) => compiler.compile_update(update)?,
        Descriptor::UpdateLob(update) => compiler.compile_update_lob(update)?,
        Descriptor::Delete(delete) => compiler.compile_delete(delete)?,
    };
    print_statements(std::slice::from_ref(&stmt), numbered, format)
}

fn print_ddl(statements: &[String], format: OutputFormat) -> anyhow::Result<()> {
    let compiled: Vec<CompiledStatement> =
        statements.iter().map(|s| CompiledStatement::new(s.as_str())).collect();
    print_statements(&compiled, false, format)
}

/// PL/SQL blocks end with `/`, plain statements with `;`.
fn terminator(sql: &str) -> &'static str {
    let head = sql.trim_start().to_ascii_lowercase();
    if head.starts_with("begin") || head.starts_with("declare") || head.starts_with("create trigger")
    {
        "\n/"
    } else {
        ";"
    }
}

fn print_statements(
    statements: &[CompiledStatement],
    numbered: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let out: Vec<serde_json::Value> = statements
                .iter()
                .map(|stmt| {
                    let sql = if numbered {
                        stmt.numbered_sql()
                    } else {
                        stmt.sql.clone()
                    };
                    serde_json::json!({
                        "sql": sql,
                        "params": stmt.params,
                        "outputs": stmt.outputs,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Sql => {
            for stmt in statements {
                let sql = if numbered {
                    stmt.numbered_sql()
                } else {
                    stmt.sql.clone()
                };
                println!("{}{}", sql.white(), terminator(&sql));
                for (i, param) in stmt.params.iter().enumerate() {
                    println!("  {} {}", format!("-- bind {}:", i + 1).dimmed(), param);
                }
                for output in &stmt.outputs {
                    println!(
                        "  {} {} {:?}",
                        "-- out:".dimmed(),
                        output.name.cyan(),
                        output.kind
                    );
                }
            }
        }
    }
    Ok(())
}

fn show_config(config: &OracleConfig) -> anyhow::Result<()> {
    println!("{}", "Search paths:".green().bold());
    for path in OracleConfig::search_paths() {
        let marker = if path.exists() { "✓".green() } else { "·".dimmed() };
        println!("  {} {}", marker, path.display());
    }
    println!();
    println!("{}", "Effective configuration:".green().bold());
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

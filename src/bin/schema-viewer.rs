//! Schema Viewer CLI
//!
//! Command-line interface for rendering and checking JSON Schema documents.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use schema_viewer::{
    check, load_documents, render, Dialect, OutputFormat, RenderOptions, SchemaRegistry,
    SchemaView, Severity, ViewOptions,
};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-viewer")]
#[command(about = "Render JSON Schema documents as nested tables")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the root schema as a table
    Render {
        /// Schema sources: file paths or URLs (http:// or https://)
        #[arg(required = true)]
        schemas: Vec<String>,

        /// Identifier of the root document (default: first document)
        #[arg(long)]
        root: Option<String>,

        /// Dialect the schema was written in (joi schemas must be pre-converted)
        #[arg(long, default_value = "json", value_parser = ["json", "joi"])]
        dialect: String,

        /// Output format
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Leave out the description column
        #[arg(long)]
        no_descriptions: bool,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Resolve a reference and print the schema node it points at
    Resolve {
        /// Schema sources: file paths or URLs (http:// or https://)
        #[arg(required = true)]
        schemas: Vec<String>,

        /// Reference to resolve, e.g. order.json#/properties/id
        #[arg(long = "ref", short)]
        reference: String,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Check the root schema for unknown references, cycles and malformed nodes
    Check {
        /// Schema sources: file paths or URLs (http:// or https://)
        #[arg(required = true)]
        schemas: Vec<String>,

        /// Identifier of the root document (default: first document)
        #[arg(long)]
        root: Option<String>,

        /// Dialect the schema was written in
        #[arg(long, default_value = "json", value_parser = ["json", "joi"])]
        dialect: String,

        /// Output format: text (default) or json
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Only show errors
        #[arg(long, short)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            schemas,
            root,
            dialect,
            format,
            pretty,
            no_descriptions,
            output,
        } => run_render(RenderArgs {
            schemas,
            options: view_options(&dialect, root),
            format: OutputFormat::parse(&format).unwrap_or_default(),
            pretty,
            descriptions: !no_descriptions,
            output,
        }),

        Commands::Resolve {
            schemas,
            reference,
            pretty,
        } => run_resolve(&schemas, &reference, pretty),

        Commands::Check {
            schemas,
            root,
            dialect,
            format,
            strict,
            quiet,
        } => run_check(
            &schemas,
            &view_options(&dialect, root),
            &format,
            strict,
            quiet,
        ),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn view_options(dialect: &str, root: Option<String>) -> ViewOptions {
    let options = ViewOptions::new().dialect(Dialect::parse(dialect).unwrap_or_default());
    match root {
        Some(root) => options.root(root),
        None => options,
    }
}

/// Load all sources and open a view over them.
fn open_view(schemas: &[String], options: &ViewOptions) -> Result<SchemaView, u8> {
    let documents = load_documents(schemas).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    SchemaView::open(documents, options).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })
}

struct RenderArgs {
    schemas: Vec<String>,
    options: ViewOptions,
    format: OutputFormat,
    pretty: bool,
    descriptions: bool,
    output: Option<PathBuf>,
}

fn run_render(args: RenderArgs) -> Result<(), u8> {
    let view = open_view(&args.schemas, &args.options)?;
    let tree = view.tree();

    let render_options = RenderOptions::new().descriptions(args.descriptions);
    let rendered = render(&tree, args.format, &render_options, args.pretty).map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    write_output(args.output, &rendered)
}

fn run_resolve(schemas: &[String], reference: &str, pretty: bool) -> Result<(), u8> {
    let documents = load_documents(schemas).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let registry = SchemaRegistry::new(documents).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let Some(node) = registry.resolve(reference) else {
        eprintln!("Error: reference not found: {}", reference);
        return Err(1);
    };

    println!("{}", to_json(node, pretty)?);
    Ok(())
}

fn run_check(
    schemas: &[String],
    options: &ViewOptions,
    format: &str,
    strict: bool,
    quiet: bool,
) -> Result<(), u8> {
    let view = open_view(schemas, options)?;
    let result = check(&view.tree());

    if format == "json" {
        let value = serde_json::to_value(&result).map_err(|e| {
            eprintln!("Error serializing output: {}", e);
            2u8
        })?;
        println!("{}", to_json(&value, true)?);
    } else {
        if !quiet {
            println!("Checking {} ...\n", result.root);
        }

        for diag in &result.diagnostics {
            let (color, label) = match diag.severity {
                Severity::Error => ("\x1b[31m", "error"),
                Severity::Warning => ("\x1b[33m", "warning"),
            };
            if !quiet || diag.severity == Severity::Error {
                println!(
                    "  {}{}[{}]\x1b[0m: {} - {}",
                    color, label, diag.code, diag.reference, diag.message
                );
            }
        }

        if !quiet {
            println!();
            if result.passes(strict) {
                println!(
                    "\x1b[32m✓ {} nodes checked, no problems\x1b[0m",
                    result.nodes_checked
                );
            } else {
                println!(
                    "\x1b[31m✗ {} nodes checked: {} errors, {} warnings\x1b[0m",
                    result.nodes_checked, result.errors, result.warnings
                );
            }
        }
    }

    if result.passes(strict) {
        Ok(())
    } else {
        Err(1)
    }
}

fn to_json(value: &Value, pretty: bool) -> Result<String, u8> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })
}

fn write_output(output: Option<PathBuf>, content: &str) -> Result<(), u8> {
    match output {
        Some(path) => {
            std::fs::write(&path, content).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            print!("{}", content);
            if !content.ends_with('\n') {
                println!();
            }
        }
    }
    Ok(())
}

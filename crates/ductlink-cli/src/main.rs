//! DuctLink command-line shell.
//!
//! Usage:
//!   ductlink disconnect --model <FILE> --element <UUID> --reference x,y,z --target x,y,z
//!   ductlink reconnect  --model <FILE> --element <UUID> --reference x,y,z --target x,y,z
//!   ductlink inspect    --model <FILE>
//!   ductlink sample     <FILE>

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use uuid::Uuid;

use ductlink_core::{
    Element, ModelDocument, Operation, Outcome, Point3, RealignConfig, RealignEngine,
    RealignError, ScriptedPicker, Vec3,
};

#[derive(Debug, Error)]
enum CliError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid model document {path}: {source}")]
    Model {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Realign(#[from] RealignError),
}

#[derive(Parser)]
#[command(name = "ductlink")]
#[command(about = "Move duct connectors along their centerline")]
struct Cli {
    /// Engine configuration (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Move a connector, leaving its neighbor behind
    Disconnect(RealignArgs),
    /// Move the neighbor so the joint follows the new location
    Reconnect(RealignArgs),
    /// List elements and connectors of a model document
    Inspect {
        /// Model document (JSON)
        #[arg(short, long)]
        model: PathBuf,
    },
    /// Write a sample document: a duct joined to a fitting
    Sample {
        /// Output file
        output: PathBuf,
    },
}

#[derive(Args)]
struct RealignArgs {
    /// Model document (JSON)
    #[arg(short, long)]
    model: PathBuf,

    /// Element to pick the reference point on
    #[arg(short, long)]
    element: Uuid,

    /// Point near the connector to move, as x,y,z
    #[arg(short, long, allow_hyphen_values = true)]
    reference: Point3,

    /// New connector location, as x,y,z
    #[arg(short, long, allow_hyphen_values = true)]
    target: Point3,

    /// Where to write the result (defaults to the model file)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => RealignConfig::from_file(path)?,
        None => RealignConfig::default(),
    };

    match cli.command {
        Command::Disconnect(args) => realign(config, Operation::Disconnect, args),
        Command::Reconnect(args) => realign(config, Operation::Reconnect, args),
        Command::Inspect { model } => {
            let doc = load(&model)?;
            print!("{}", describe(&doc));
            Ok(())
        }
        Command::Sample { output } => {
            let (doc, _) = sample_document()?;
            save(&doc, &output)?;
            log::info!("Wrote sample document to {}", output.display());
            Ok(())
        }
    }
}

fn realign(config: RealignConfig, operation: Operation, args: RealignArgs) -> Result<(), CliError> {
    let mut doc = load(&args.model)?;
    let engine = RealignEngine::new(config);
    let mut picker = ScriptedPicker::new()
        .then_pick(args.element, args.reference)
        .then_pick(args.element, args.target);

    match engine.run(&mut doc, &mut picker, operation)? {
        Outcome::Committed(summary) => {
            let output = args.output.as_ref().unwrap_or(&args.model);
            save(&doc, output)?;
            println!(
                "{}: {} connector(s) relocated, {} element(s) translated",
                summary.label, summary.relocated, summary.translated
            );
        }
        Outcome::Cancelled => {}
    }
    Ok(())
}

fn load(path: &Path) -> Result<ModelDocument, CliError> {
    let json = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ModelDocument::from_json(&json).map_err(|source| CliError::Model {
        path: path.to_path_buf(),
        source,
    })
}

fn save(doc: &ModelDocument, path: &Path) -> Result<(), CliError> {
    let json = doc.to_json().map_err(RealignError::from)?;
    fs::write(path, json).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn describe(doc: &ModelDocument) -> String {
    let mut out = String::new();
    for element in doc.elements_ordered() {
        out.push_str(&format!("{} {:?} {}\n", element.id(), element.kind, element.name));
        for con in element.connectors() {
            out.push_str(&format!(
                "  {} {:?} at {} ({} link(s))\n",
                con.id(),
                con.kind,
                con.origin,
                con.links.len()
            ));
        }
    }
    out
}

/// Duct D from (0,0,0) to (0,0,10) with fitting F joined at its first connector.
fn sample_document() -> Result<(ModelDocument, Uuid), RealignError> {
    let mut doc = ModelDocument::new();
    doc.name = "Sample network".to_string();
    let duct = Element::duct(Point3::ORIGIN, Point3::new(0.0, 0.0, 10.0)).with_name("D");
    let fitting = Element::fitting(
        Point3::new(0.0, 0.0, -0.5),
        &[(Point3::ORIGIN, Vec3::Z), (Point3::new(0.0, 0.0, -1.0), -Vec3::Z)],
    )
    .with_name("F");
    let c1 = duct.connectors()[0].reference();
    let f1 = fitting.connectors()[0].reference();
    let duct_id = doc.add_element(duct);
    doc.add_element(fitting);
    doc.link(c1, f1)?;
    Ok((doc, duct_id))
}

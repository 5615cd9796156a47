#![deny(unused_variables)]
#![deny(dead_code)]
#![deny(unused_imports)]
#![deny(clippy::no_effect_underscore_binding)]

use clap::{Args, CommandFactory, Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process;

use multidx::config::{DEFAULT_CONFIG_FILE, Settings};
use multidx::flow::{self, Outcome};
use multidx::registry::ModelRegistry;
use multidx::schema::{Disease, FieldKind};
use multidx::web;

#[derive(Args)]
pub struct ServeArgs {
    /// Path to a TOML config file (defaults to ./multidx.toml when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding parkinsons_model.toml, kidney_model.toml and liver_model.toml
    #[arg(long, value_name = "DIR")]
    pub model_dir: Option<PathBuf>,

    /// Address to listen on, e.g. 127.0.0.1:8501
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<SocketAddr>,
}

#[derive(Args)]
pub struct PredictArgs {
    /// Disease form to fill: parkinsons, kidney or liver
    pub disease: Disease,

    /// Path to a TOML config file (defaults to ./multidx.toml when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the model artifacts
    #[arg(long, value_name = "DIR")]
    pub model_dir: Option<PathBuf>,

    /// Comma-separated form values in field order (see `multidx fields`)
    #[arg(
        long,
        value_delimiter = ',',
        allow_hyphen_values = true,
        required_unless_present = "input",
        conflicts_with = "input"
    )]
    pub values: Option<Vec<String>>,

    /// CSV or TSV file with a header row and one submission per row
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Where batch results are written
    #[arg(long, value_name = "FILE", default_value = "predictions.tsv")]
    pub output: PathBuf,
}

#[derive(Parser)]
#[command(
    name = "multidx",
    version,
    about = "Multiple disease prediction: Parkinson's, kidney and liver screening forms",
    long_about = "Collects clinical measurements through per-disease forms, validates them \
                 and classifies them with pre-trained models loaded from TOML artifacts."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the prediction forms over HTTP
    #[command(about = "Serve the web form UI")]
    Serve(ServeArgs),

    /// Evaluate one submission, or a file of submissions
    #[command(about = "Predict from command-line values or a CSV/TSV file (outputs: predictions.tsv)")]
    Predict(PredictArgs),

    /// List the form fields of a disease in model order
    #[command(about = "List the input fields of a disease form")]
    Fields {
        /// parkinsons, kidney or liver
        disease: Disease,
    },

    /// Display version information
    #[command(about = "Display version information")]
    Version,
}

fn load_settings(
    config: Option<&Path>,
    model_dir: Option<PathBuf>,
    bind: Option<SocketAddr>,
) -> Result<Settings, Box<dyn std::error::Error>> {
    let settings = Settings::resolve(config)?.with_overrides(model_dir, bind);
    log::debug!("Effective settings: {settings:?}");
    Ok(settings)
}

fn run_serve(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let settings = load_settings(args.config.as_deref(), args.model_dir, args.bind)?;
    log::info!("Loading models from {}", settings.model_dir.display());
    let registry = ModelRegistry::load_dir(&settings.model_dir)?;
    web::serve(registry, settings.bind)?;
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<(), Box<dyn std::error::Error>> {
    let settings = load_settings(args.config.as_deref(), args.model_dir, None)?;
    let registry = ModelRegistry::load_dir(&settings.model_dir)?;

    match (args.values, args.input) {
        (Some(values), _) => {
            let outcome = flow::submit(args.disease, &values, &registry);
            match outcome {
                Outcome::Verdict(verdict) => {
                    println!("{verdict}");
                    Ok(())
                }
                rejected => Err(rejected.message().into()),
            }
        }
        (None, Some(input)) => predict_file(args.disease, &input, &args.output, &registry),
        (None, None) => Err("either --values or --input is required".into()),
    }
}

/// Tab for `.tsv` and `.txt`, comma otherwise.
fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") || ext.eq_ignore_ascii_case("txt") => b'\t',
        _ => b',',
    }
}

fn predict_file(
    disease: Disease,
    input: &Path,
    output: &Path,
    registry: &ModelRegistry,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Reading {} submissions from: {}", disease, input.display());
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter_for(input))
        .has_headers(true)
        .flexible(true)
        .from_path(input)?;

    let mut file = BufWriter::new(File::create(output)?);
    writeln!(file, "row\tstatus\tlabel\tmessage")?;

    let (mut verdicts, mut rejected) = (0usize, 0usize);
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let values: Vec<&str> = record.iter().collect();
        let outcome = flow::submit(disease, &values, registry);

        let (status, label) = match &outcome {
            Outcome::Verdict(verdict) => {
                verdicts += 1;
                ("verdict", verdict.label.to_string())
            }
            Outcome::Warning { .. } => {
                rejected += 1;
                ("warning", "NA".to_string())
            }
            Outcome::Error(_) => {
                rejected += 1;
                ("error", "NA".to_string())
            }
        };
        writeln!(
            file,
            "{}\t{}\t{}\t{}",
            index + 1,
            status,
            label,
            outcome.message()
        )?;
    }
    file.flush()?;

    println!(
        "Wrote {} verdicts and {} rejected rows to {}",
        verdicts,
        rejected,
        output.display()
    );
    Ok(())
}

fn print_fields(disease: Disease) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "# {}", disease.title())?;
    writeln!(out, "index\tlabel\tkind\tmodel_input")?;
    for (index, field) in disease.fields().iter().enumerate() {
        let kind = match field.kind {
            FieldKind::Numeric => "numeric".to_string(),
            FieldKind::Choice(options) => format!("choice({})", options.join("|")),
        };
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            index,
            field.label,
            kind,
            if field.is_model_input() { "yes" } else { "no" }
        )?;
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let Cli { command } = cli;

    let result = match command {
        Some(Commands::Serve(args)) => run_serve(args),
        Some(Commands::Predict(args)) => run_predict(args),
        Some(Commands::Fields { disease }) => print_fields(disease).map_err(Into::into),
        Some(Commands::Version) => {
            println!("multidx {}", env!("CARGO_PKG_VERSION"));
            println!("Config file looked up by default: {DEFAULT_CONFIG_FILE}");
            Ok(())
        }
        None => Cli::command()
            .print_help()
            .map(|()| println!())
            .map_err(Into::into),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

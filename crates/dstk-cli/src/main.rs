use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use dstk_codegen::{emit, Artifact, EmitOptions, Target, DEFAULT_KOTLIN_PACKAGE};
use dstk_schema::LoadError;
use dstk_validator::{Document, Finding, Rejection};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dstk")]
#[command(about = "dstk: design token validator and platform theme generator")]
#[command(version)]
struct Cli {
    /// Generation date written into every file header (default: today)
    #[arg(long, global = true, value_name = "YYYY-MM-DD")]
    date: Option<NaiveDate>,

    /// More log output on stderr (-v debug, -vv trace); DSTK_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check a token document and list every finding
    Validate {
        /// Token document (.json, or .md with a fenced JSON block)
        path: PathBuf,
    },

    /// Generate CSS custom properties or SCSS variables
    GenerateCss {
        /// Token document
        path: PathBuf,
        #[arg(long, value_enum, default_value_t = CssFormat::Css)]
        format: CssFormat,
        /// Also generate component classes (CSS) or mixins (SCSS)
        #[arg(long)]
        components: bool,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate SwiftUI and/or UIKit theme files (SwiftUI when neither is given)
    GenerateSwift {
        /// Token document
        path: PathBuf,
        #[arg(long)]
        swiftui: bool,
        #[arg(long)]
        uikit: bool,
        /// Output directory (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate Jetpack Compose and/or Android XML resources (Compose when neither is given)
    GenerateKotlin {
        /// Token document
        path: PathBuf,
        #[arg(long)]
        compose: bool,
        #[arg(long)]
        xml: bool,
        /// Package declared by the Compose files
        #[arg(long, default_value = DEFAULT_KOTLIN_PACKAGE)]
        package: String,
        /// Output directory (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a Tailwind CSS config
    GenerateTailwind {
        /// Token document
        path: PathBuf,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate Flutter design tokens
    GenerateDart {
        /// Token document
        path: PathBuf,
        /// Output directory (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a TypeScript token module (web, or React Native)
    GenerateTs {
        /// Token document
        path: PathBuf,
        #[arg(long)]
        react_native: bool,
        /// Output directory (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CssFormat {
    Css,
    Scss,
}

/// Where rendered artifacts go.
enum Destination {
    Stdout,
    File(PathBuf),
    Dir(PathBuf),
}

impl Destination {
    fn file(output: Option<PathBuf>) -> Self {
        output.map_or(Destination::Stdout, Destination::File)
    }

    fn dir(output: Option<PathBuf>) -> Self {
        output.map_or(Destination::Stdout, Destination::Dir)
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("could not write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CliError {
    fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Rejected(_) => ExitCode::from(1),
            CliError::Load(_) | CliError::Write { .. } => ExitCode::from(2),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(CliError::Rejected(rejection)) => {
            eprintln!("{}", report(&rejection.findings));
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            e.exit_code()
        }
    }
}

fn init_logging(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("DSTK_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .init();
}

fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let options = match cli.date {
        Some(date) => EmitOptions::for_date(date),
        None => EmitOptions::today(),
    };

    match cli.command {
        Command::Validate { path } => cmd_validate(&path),
        Command::GenerateCss {
            path,
            format,
            components,
            output,
        } => {
            let target = match format {
                CssFormat::Css => Target::Css,
                CssFormat::Scss => Target::Scss,
            };
            let options = options.with_css_components(components);
            generate(&path, &[target], &options, Destination::file(output))
        }
        Command::GenerateSwift {
            path,
            swiftui,
            uikit,
            output,
        } => {
            let mut targets = Vec::new();
            if swiftui || !uikit {
                targets.push(Target::SwiftUi);
            }
            if uikit {
                targets.push(Target::UiKit);
            }
            generate(&path, &targets, &options, Destination::dir(output))
        }
        Command::GenerateKotlin {
            path,
            compose,
            xml,
            package,
            output,
        } => {
            let mut targets = Vec::new();
            if compose || !xml {
                targets.push(Target::Compose);
            }
            if xml {
                targets.push(Target::AndroidXml);
            }
            let options = options.with_kotlin_package(package);
            generate(&path, &targets, &options, Destination::dir(output))
        }
        Command::GenerateTailwind { path, output } => {
            generate(&path, &[Target::Tailwind], &options, Destination::file(output))
        }
        Command::GenerateDart { path, output } => {
            generate(&path, &[Target::Flutter], &options, Destination::dir(output))
        }
        Command::GenerateTs {
            path,
            react_native,
            output,
        } => {
            let target = if react_native {
                Target::ReactNative
            } else {
                Target::TypeScript
            };
            generate(&path, &[target], &options, Destination::dir(output))
        }
    }
}

/// `Validation failed with N finding(s):` followed by one finding per line.
fn report(findings: &[Finding]) -> String {
    let mut lines = vec![format!("Validation failed with {} finding(s):", findings.len())];
    lines.extend(findings.iter().map(|f| format!("  - {f}")));
    lines.join("\n")
}

fn cmd_validate(path: &Path) -> Result<ExitCode, CliError> {
    let root = dstk_schema::load(path)?;
    let findings = dstk_validator::validate(&root);
    if findings.is_empty() {
        eprintln!("OK: {}", path.display());
        return Ok(ExitCode::SUCCESS);
    }
    println!("{}", report(&findings));
    Ok(ExitCode::from(1))
}

fn load_document(path: &Path) -> Result<Document, CliError> {
    let root = dstk_schema::load(path)?;
    Ok(dstk_validator::conform(&root)?)
}

/// Render every target first, then deliver. Nothing is written when the
/// document is rejected.
fn generate(
    path: &Path,
    targets: &[Target],
    options: &EmitOptions,
    destination: Destination,
) -> Result<ExitCode, CliError> {
    let doc = load_document(path)?;
    let artifacts: Vec<Artifact> = targets
        .iter()
        .flat_map(|target| emit(&doc, *target, options))
        .collect();
    tracing::info!(files = artifacts.len(), "rendered");

    match destination {
        Destination::Stdout => print_artifacts(&artifacts),
        Destination::File(out) => {
            for artifact in &artifacts {
                write_file(&out, &artifact.content)?;
                eprintln!("Generated {} written to {}", artifact.filename, out.display());
            }
        }
        Destination::Dir(dir) => {
            for artifact in &artifacts {
                let out = dir.join(&artifact.filename);
                write_file(&out, &artifact.content)?;
                eprintln!("Generated {} written to {}", artifact.filename, out.display());
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn print_artifacts(artifacts: &[Artifact]) {
    let banners = artifacts.len() > 1;
    for (i, artifact) in artifacts.iter().enumerate() {
        if i > 0 {
            println!();
        }
        if banners {
            println!("// === {} ===\n", artifact.filename);
        }
        print!("{}", artifact.content);
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), CliError> {
    let write = || -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
    };
    write().map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote");
    Ok(())
}

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use deft_config::DeftConfig;
use deft_format::FormatConfig;
use deft_framework::{synthesize_unit, MemoryHost, SynthesisContext, UnitError, UnitReport};
use deft_hir::framework::{CompilationUnit, MethodData};
use deft_types::Diagnostic;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "deft",
    version,
    about = "Synthesize default-parameter overloads for annotated Java methods"
)]
struct Cli {
    /// Path to a `deft.toml` (defaults to the nearest one at or above the unit file)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the unit with its synthesized overloads as Java
    Synth(UnitArgs),
    /// Run synthesis and report what would be generated
    Check(UnitArgs),
    /// Print the JSON schema of `deft.toml`
    ConfigSchema,
}

#[derive(Args)]
struct UnitArgs {
    /// JSON description of a compilation unit
    unit: PathBuf,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            2
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Synth(args) => {
            let config = load_config(cli.config.as_deref(), &args.unit)?;
            let mut host = load_unit(&args.unit)?;
            match run_synthesis(&mut host, &config) {
                Ok(_) => {
                    let unit = host.into_unit();
                    if args.json {
                        print_json(&injected_by_class(&unit))?;
                    } else {
                        print!("{}", deft_format::format_unit(&unit, &FormatConfig::default()));
                    }
                    Ok(0)
                }
                Err(err) => {
                    report_failure(&err, args.json)?;
                    Ok(1)
                }
            }
        }
        Command::Check(args) => {
            let config = load_config(cli.config.as_deref(), &args.unit)?;
            let mut host = load_unit(&args.unit)?;
            match run_synthesis(&mut host, &config) {
                Ok(report) => {
                    if args.json {
                        print_json(&CheckOutput {
                            ok: true,
                            report: Some(report),
                            diagnostic: None,
                        })?;
                    } else {
                        println!("annotations: {}", report.events);
                        println!("handled: {}", report.handled);
                        println!("overloads: {}", report.injected);
                        println!("already present: {}", report.already_present);
                        for (class, count) in &report.injected_per_class {
                            println!("  {class}: {count}");
                        }
                    }
                    Ok(0)
                }
                Err(err) => {
                    report_failure(&err, args.json)?;
                    Ok(1)
                }
            }
        }
        Command::ConfigSchema => {
            print_json(&deft_config::json_schema())?;
            Ok(0)
        }
    }
}

/// Explicit `--config`, else the nearest `deft.toml` next to or above the unit,
/// else defaults.
fn load_config(explicit: Option<&Path>, unit: &Path) -> Result<DeftConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => unit
            .parent()
            .map(|dir| if dir.as_os_str().is_empty() { Path::new(".") } else { dir })
            .and_then(DeftConfig::discover),
    };

    let config = match path {
        Some(path) => DeftConfig::load_from_path(&path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => DeftConfig::default(),
    };
    deft_config::init_tracing(&config.logging);
    tracing::debug!(
        markers = ?config.synthesis.all_markers().collect::<Vec<_>>(),
        "configuration loaded"
    );
    Ok(config)
}

fn load_unit(path: &Path) -> Result<MemoryHost> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let unit: CompilationUnit = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse compilation unit {}", path.display()))?;
    Ok(MemoryHost::from_unit(unit))
}

fn run_synthesis(host: &mut MemoryHost, config: &DeftConfig) -> Result<UnitReport, UnitError> {
    let registry = deft_defaults::registry();
    synthesize_unit(host, &registry, &SynthesisContext::new(&config.synthesis))
}

#[derive(Serialize)]
struct CheckOutput {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<UnitReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    diagnostic: Option<Diagnostic>,
}

#[derive(Serialize)]
struct InjectedClass<'a> {
    class: &'a str,
    methods: Vec<&'a MethodData>,
}

fn injected_by_class(unit: &CompilationUnit) -> Vec<InjectedClass<'_>> {
    unit.classes
        .iter()
        .map(|class| InjectedClass {
            class: &class.name,
            methods: class.synthesized_methods().collect(),
        })
        .filter(|entry| !entry.methods.is_empty())
        .collect()
}

fn report_failure(err: &UnitError, json: bool) -> Result<()> {
    let diagnostic = err.to_diagnostic();
    if json {
        print_json(&CheckOutput {
            ok: false,
            report: None,
            diagnostic: Some(diagnostic),
        })?;
    } else {
        eprintln!("{diagnostic}");
        eprintln!("  note: {err}");
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value)?;
    println!("{out}");
    Ok(())
}

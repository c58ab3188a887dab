use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use asset_lint::build_scenes;
use asset_lint::code_refs;
use asset_lint::config::LintConfig;
use asset_lint::error::LintError;
use asset_lint::guid_refs;
use asset_lint::meta_files;
use asset_lint::report::{self, CheckReport, OutputMode};

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;

#[derive(Parser)]
#[command(name = "asset-lint", version, about = "Asset metadata consistency checks")]
struct Cli {
    /// Project root containing Assets/ and ProjectSettings/.
    #[arg(long, value_name = "PATH", default_value = ".")]
    project_root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that every asset has a .meta and no .meta is orphaned.
    Meta,
    /// Check guid references in asset files against known sidecars.
    Guids,
    /// Check layer/sorting-layer/tag references in C# against TagManager.
    Layers,
    /// Check that build scenes exist and their guids match.
    Scenes,
    /// Run every check and print an aggregate summary.
    All,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mode = OutputMode::from_env();
    let root = cli.project_root.as_path();

    let exit_code = match cli.command {
        Commands::Meta => run_single(root, mode, "Meta File Integrity", check_meta),
        Commands::Guids => run_single(root, mode, "GUID References", check_guids),
        Commands::Layers => run_single(root, mode, "Layer / Tag Consistency", check_layers),
        Commands::Scenes => run_single(root, mode, "Build Scene Validation", check_scenes),
        Commands::All => run_all(root, mode),
    };
    std::process::exit(exit_code);
}

type Check = fn(&Path, &LintConfig) -> Result<CheckReport, LintError>;

fn check_meta(root: &Path, config: &LintConfig) -> Result<CheckReport, LintError> {
    meta_files::check_meta_files(root, config)
}

fn check_guids(root: &Path, config: &LintConfig) -> Result<CheckReport, LintError> {
    guid_refs::check_guid_refs(root, config)
}

fn check_layers(root: &Path, config: &LintConfig) -> Result<CheckReport, LintError> {
    code_refs::check_layer_consistency(root, config)
}

fn check_scenes(root: &Path, _config: &LintConfig) -> Result<CheckReport, LintError> {
    build_scenes::check_build_scenes(root)
}

fn banner(title: &str) {
    println!("{}", "=".repeat(60));
    println!("{}", title);
    println!("{}", "=".repeat(60));
}

fn run_single(root: &Path, mode: OutputMode, title: &str, check: Check) -> i32 {
    banner(title);
    let config = match LintConfig::load(root) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            return EXIT_FAILURE;
        }
    };
    match check(root, &config) {
        Ok(report) => {
            report::emit(mode, &report);
            println!(
                "{} error(s), {} warning(s)",
                report.error_count(),
                report.warning_count()
            );
            report.exit_code()
        }
        Err(err) => {
            eprintln!("ERROR: {}", err);
            EXIT_FAILURE
        }
    }
}

fn run_all(root: &Path, mode: OutputMode) -> i32 {
    const CHECKS: [(&str, Check); 4] = [
        ("Meta File Integrity", check_meta),
        ("GUID References", check_guids),
        ("Layer / Tag Consistency", check_layers),
        ("Build Scene Validation", check_scenes),
    ];

    banner("Asset Validation Suite");
    println!();

    let config = match LintConfig::load(root) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            return EXIT_FAILURE;
        }
    };

    let overall_start = Instant::now();
    let mut results: Vec<(&str, i32)> = Vec::new();

    for (name, check) in CHECKS {
        println!("--- {} ---", name);
        let start = Instant::now();
        let code = match check(root, &config) {
            Ok(report) => {
                report::emit(mode, &report);
                println!(
                    "{} error(s), {} warning(s)",
                    report.error_count(),
                    report.warning_count()
                );
                report.exit_code()
            }
            Err(err) => {
                eprintln!("ERROR: {}", err);
                EXIT_FAILURE
            }
        };
        let verdict = if code == EXIT_SUCCESS { "PASS" } else { "FAIL" };
        println!("  -> {} ({:.1}s)", verdict, start.elapsed().as_secs_f64());
        println!();
        results.push((name, code));
    }

    banner("Summary");
    let mut failed = 0usize;
    for (name, code) in &results {
        let verdict = if *code == EXIT_SUCCESS { "PASS" } else { "FAIL" };
        println!("  {:<28} {}", name, verdict);
        if *code != EXIT_SUCCESS {
            failed += 1;
        }
    }
    println!(
        "\n{}/{} checks passed ({:.1}s)",
        results.len() - failed,
        results.len(),
        overall_start.elapsed().as_secs_f64()
    );

    if failed > 0 {
        EXIT_FAILURE
    } else {
        EXIT_SUCCESS
    }
}

use anyhow::{bail, Result};
use clap::Parser;
use std::path::Path;
use std::str::FromStr;

use patcount_core::{default_config_yaml, report, AnalysisResult, CountMode, PatentAnalyzer};

#[derive(Parser)]
#[command(name = "patcount")]
#[command(about = "Check patent application documents against configurable length requirements")]
struct Args {
    /// Path to the patent document (.txt or .docx)
    #[arg(short, long, required_unless_present = "show_default_config")]
    input: Option<String>,

    /// Path to a custom requirement config (YAML format). Merged over the
    /// built-in defaults; invalid overrides fall back to defaults.
    #[arg(short, long)]
    config: Option<String>,

    /// Counting mode: script-aware, mixed-word, or all
    #[arg(short = 'm', long, default_value = "script-aware")]
    count_mode: String,

    /// Output format: text, json, or yaml
    #[arg(short = 'f', long, default_value = "text")]
    output_format: String,

    /// Output file path (printed to stdout if not specified)
    #[arg(short, long)]
    output: Option<String>,

    /// Print the built-in default configuration as YAML and exit
    #[arg(long)]
    show_default_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.show_default_config {
        print!("{}", default_config_yaml()?);
        return Ok(());
    }

    let input = args.input.as_deref().unwrap_or_default();
    let mode = match CountMode::from_str(&args.count_mode) {
        Ok(mode) => mode,
        Err(reason) => bail!(reason),
    };

    println!("📄 Analyzing: {input}");
    if let Some(config_path) = &args.config {
        println!("📋 Requirement config: {config_path}");
    } else {
        println!("📋 Using built-in default requirements");
    }

    let config_path = args.config.as_deref().map(Path::new);
    match PatentAnalyzer::analyze_file(input, config_path, mode) {
        Ok(result) => {
            println!(
                "✅ Analysis complete: {} sections, {} checks ({} failing)",
                result.sections.len(),
                result.findings.len(),
                result.failure_count()
            );
            for note in &result.notes {
                println!("⚠️  {note}");
            }
            write_result(&result, &args)?;
        }
        Err(e) => {
            eprintln!("❌ Analysis failed: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}

fn write_result(result: &AnalysisResult, args: &Args) -> Result<()> {
    let rendered = match args.output_format.as_str() {
        "text" => report::render_text(result),
        "json" => serde_json::to_string_pretty(result)?,
        "yaml" => serde_yaml::to_string(result)?,
        other => {
            println!("⚠️  Unknown output format '{other}', using text");
            report::render_text(result)
        }
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            println!("💾 Report saved to: {path}");
        }
        None => {
            println!();
            print!("{rendered}");
        }
    }

    Ok(())
}

//! `llmfn`: run the prompt-backed functions from the command line.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use llmfn_core::LlmfnConfig;
use llmfn_core::config::LoggingConfig;
use llmfn_functions::{ErrorInfo, LlmFunctions, ReportFormat, VisionOperation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(long, short, env = "LLMFN_CONFIG")]
    config: Option<PathBuf>,

    /// Print structured results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every function on sample inputs
    Showcase {
        /// Image for the vision step; skipped when absent
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Answer a math question
    Math { question: String },
    /// Apply a text operation
    String { operation: String, text: String },
    /// Rewrite a source file
    Code {
        operation: String,
        file: PathBuf,
        #[arg(long)]
        language: Option<String>,
    },
    /// Diagnose an error
    Debug {
        #[arg(long = "type")]
        error_type: String,
        #[arg(long)]
        message: String,
        #[arg(long, default_value = "")]
        traceback: String,
        /// File holding the failing code
        #[arg(long)]
        code: Option<PathBuf>,
        /// Variable state as name=value, repeatable
        #[arg(long = "var", value_parser = parse_variable)]
        variables: Vec<(String, String)>,
        #[arg(long)]
        context: Option<String>,
    },
    /// Generate an HTML/CSS component
    Web {
        operation: String,
        content: String,
        #[arg(long)]
        style: Option<String>,
    },
    /// Describe an image
    Vision {
        operation: String,
        image: PathBuf,
        #[arg(long)]
        prompt: Option<String>,
    },
    /// Embed text
    Embed { text: String },
    /// Review a source file
    Review {
        file: PathBuf,
        #[arg(long, default_value = "markdown")]
        format: ReportFormat,
        /// Write the report here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn parse_variable(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .ok();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .ok();
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => LlmfnConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => LlmfnConfig::default(),
    };
    init_tracing(&config.logging);

    let functions = LlmFunctions::from_config(config).context("building LLM client")?;
    if !functions.backend().is_available() {
        anyhow::bail!("no LLM provider configured");
    }

    match cli.command {
        Command::Showcase { image } => showcase(&functions, image).await?,
        Command::Math { question } => println!("{}", functions.math(&question).await?),
        Command::String { operation, text } => {
            println!("{}", functions.string(&operation, &text).await?);
        }
        Command::Code {
            operation,
            file,
            language,
        } => {
            let code = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            println!(
                "{}",
                functions.code(&operation, &code, language.as_deref()).await?
            );
        }
        Command::Debug {
            error_type,
            message,
            traceback,
            code,
            variables,
            context,
        } => {
            let mut info = ErrorInfo::new(error_type, message).with_traceback(traceback);
            if let Some(path) = code {
                let snippet = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?;
                info = info.with_code(snippet);
            }
            info.variables = variables;
            let report = functions.debug(&info, context.as_deref()).await?;
            if cli.json {
                print_json(&report)?;
            } else {
                print!("{report}");
            }
        }
        Command::Web {
            operation,
            content,
            style,
        } => {
            let component = functions
                .web(&operation, &content, style.as_deref())
                .await?;
            if cli.json {
                print_json(&component)?;
            } else {
                println!("HTML:\n{}\n\nCSS:\n{}", component.html, component.css);
                for issue in &component.validation.accessibility {
                    println!("! {issue}");
                }
            }
        }
        Command::Vision {
            operation,
            image,
            prompt,
        } => {
            let operation: VisionOperation = operation.parse()?;
            println!(
                "{}",
                functions
                    .vision(&operation, &image, prompt.as_deref())
                    .await?
            );
        }
        Command::Embed { text } => {
            let vector = functions.embedding(&text).await?;
            if cli.json {
                print_json(&vector)?;
            } else {
                let head: Vec<f32> = vector.iter().take(5).copied().collect();
                println!("{} dimensions, first 5: {head:?}", vector.len());
            }
        }
        Command::Review {
            file,
            format,
            output,
        } => {
            let analysis = functions.analyze_code_file(&file).await?;
            let report = functions.generate_report(&analysis, format).await?;
            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, report)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Review completed. Report saved to: {}", path.display());
                }
                None => println!("{report}"),
            }
        }
    }
    Ok(())
}

/// Walk through every function with sample inputs.
async fn showcase(functions: &LlmFunctions, image: Option<PathBuf>) -> Result<()> {
    println!("=== Math ===");
    for question in ["2 + 2=", "Square root of 16", "15% of 200", "sin(90 degrees)"] {
        println!("{question} -> {}", functions.math(question).await?);
    }

    println!("\n=== String ===");
    for (operation, text) in [
        ("reverse", "Hello World"),
        ("capitalize", "rust programming"),
        ("count_words", "The quick brown fox jumps over the lazy dog"),
        ("remove_punctuation", "Hello, World! How are you???"),
    ] {
        println!("{operation}({text:?}) -> {}", functions.string(operation, text).await?);
    }

    println!("\n=== Code ===");
    let sample = "def process_data(data):\n    result = []\n    for item in data:\n        if item > 0:\n            result.append(item * 2)\n    return result";
    for operation in ["optimize", "add_typing", "add_tests"] {
        println!("--- {operation}\n{}", functions.code(operation, sample, None).await?);
    }

    println!("\n=== Debug ===");
    let info = ErrorInfo::new("TypeError", "can't multiply sequence by non-int of type 'str'")
        .with_traceback("  File \"script.py\", line 3, in <module>\n    result = [1, 2, 3] * \"2\"")
        .with_code("numbers = [1, 2, 3]\nmultiplier = \"2\"\nresult = numbers * multiplier")
        .with_variable("numbers", "[1, 2, 3]")
        .with_variable("multiplier", "\"2\"");
    print!(
        "{}",
        functions
            .debug(&info, Some("Error occurred during list multiplication"))
            .await?
    );

    if let Some(image) = image {
        println!("\n=== Vision ===");
        for operation in [VisionOperation::Caption, VisionOperation::Analyze] {
            println!("{operation}: {}", functions.vision(&operation, &image, None).await?);
        }
    }

    println!("\n=== Web ===");
    for (operation, content, style) in [
        ("component", "Create a modern social media share button with animation", "modern"),
        ("form", "Create a contact form with name, email, and message", "minimal"),
    ] {
        let component = functions.web(operation, content, Some(style)).await?;
        println!("HTML:\n{}\n\nCSS:\n{}\n", component.html, component.css);
    }

    println!("\n=== Embedding ===");
    let vector = functions
        .embedding("The quick brown fox jumps over the lazy dog")
        .await?;
    println!("{} dimensions", vector.len());
    Ok(())
}

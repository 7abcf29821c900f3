//! lessonkit CLI - lesson-to-deck generation tool

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use lessonkit::{
    allocate, Category, Config, Lessonkit, Pipeline, PipelineOptions, Severity, TableFamily,
    TemplateSet,
};

#[derive(Parser)]
#[command(name = "lessonkit")]
#[command(version)]
#[command(about = "Generate slide decks and question-set plans from lesson documents", long_about = None)]
struct Cli {
    /// Directory of lesson files (*.md)
    #[arg(value_name = "DIR")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate units, manifest and HTML deck
    #[command(alias = "gen")]
    Generate {
        /// Directory of lesson files (*.md)
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// JSON configuration file
        #[arg(short, long, value_name = "FILE", env = "LESSONKIT_CONFIG")]
        config: Option<PathBuf>,

        /// Template directory overlaid on the built-in templates
        #[arg(short, long, value_name = "DIR", env = "LESSONKIT_TEMPLATES")]
        templates: Option<PathBuf>,

        /// Attach speaker notes to every unit
        #[arg(long)]
        notes: bool,

        /// Planning total (estimated from word count if omitted)
        #[arg(long, value_name = "N")]
        total: Option<usize>,

        /// Process documents one at a time
        #[arg(long)]
        sequential: bool,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Skip validation of the generated sequence
        #[arg(long)]
        no_validate: bool,
    },

    /// Classify lesson content
    Classify {
        /// Directory of lesson files (*.md)
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// JSON configuration file
        #[arg(short, long, value_name = "FILE", env = "LESSONKIT_CONFIG")]
        config: Option<PathBuf>,

        /// Print the classification as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show distribution tables
    #[command(alias = "dist")]
    Distribution {
        /// Category label (conceptual, procedural, coding, mixed)
        #[arg(value_name = "CATEGORY")]
        category: Option<String>,

        /// Table family
        #[arg(long, value_enum, default_value = "slides")]
        family: Family,

        /// Allocate this total over the table
        #[arg(long, value_name = "N")]
        total: Option<usize>,

        /// Compare all categories side by side
        #[arg(long)]
        compare: bool,

        /// JSON configuration file
        #[arg(short, long, value_name = "FILE", env = "LESSONKIT_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Recommend a question count and time budget
    Recommend {
        /// Category label
        #[arg(value_name = "CATEGORY")]
        category: String,

        /// Number of concepts covered
        #[arg(long, default_value = "0")]
        concepts: usize,

        /// Number of lessons covered
        #[arg(long, default_value = "1")]
        lessons: usize,

        /// Print the recommendation as JSON
        #[arg(long)]
        json: bool,

        /// JSON configuration file
        #[arg(short, long, value_name = "FILE", env = "LESSONKIT_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Family {
    /// Slide deck tables
    Slides,
    /// Question set tables
    Questions,
}

impl From<Family> for TableFamily {
    fn from(family: Family) -> Self {
        match family {
            Family::Slides => TableFamily::Slides,
            Family::Questions => TableFamily::Questions,
        }
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

struct GenerateArgs {
    config: Option<PathBuf>,
    templates: Option<PathBuf>,
    notes: bool,
    total: Option<usize>,
    sequential: bool,
    compact: bool,
    validate: bool,
}

impl Default for GenerateArgs {
    fn default() -> Self {
        Self {
            config: None,
            templates: None,
            notes: false,
            total: None,
            sequential: false,
            compact: false,
            validate: true,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Generate {
            input,
            output,
            config,
            templates,
            notes,
            total,
            sequential,
            compact,
            no_validate,
        }) => cmd_generate(
            &input,
            output.as_deref(),
            GenerateArgs {
                config,
                templates,
                notes,
                total,
                sequential,
                compact,
                validate: !no_validate,
            },
        ),
        Some(Commands::Classify {
            input,
            config,
            json,
        }) => cmd_classify(&input, config.as_deref(), json),
        Some(Commands::Distribution {
            category,
            family,
            total,
            compare,
            config,
        }) => cmd_distribution(
            category.as_deref(),
            family.into(),
            total,
            compare,
            config.as_deref(),
        ),
        Some(Commands::Recommend {
            category,
            concepts,
            lessons,
            json,
            config,
        }) => cmd_recommend(&category, concepts, lessons, json, config.as_deref()),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: generate if input is provided
            if let Some(input) = cli.input {
                cmd_generate(&input, cli.output.as_deref(), GenerateArgs::default())
            } else {
                println!("{}", "Usage: lessonkit <DIR> [OUTPUT]".yellow());
                println!("       lessonkit --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> lessonkit::Result<Config> {
    match path {
        Some(path) => Config::from_file(path),
        None => Ok(Config::default()),
    }
}

fn cmd_generate(input: &Path, output: Option<&Path>, args: GenerateArgs) -> CliResult {
    let output_dir = output.map(Path::to_path_buf).unwrap_or_else(|| {
        let stem = input.file_name().unwrap_or_default().to_string_lossy();
        PathBuf::from(format!("{}_deck", stem))
    });

    let pb = ProgressBar::new(3);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Loading lessons...");
    let inputs = lessonkit::parser::load_dir(input)?;
    let mut builder = Lessonkit::new().with_config(load_config(args.config.as_deref())?);
    if let Some(dir) = args.templates {
        builder = builder.with_template_dir(dir);
    }
    if args.notes {
        builder = builder.with_speaker_notes();
    }
    if let Some(total) = args.total {
        builder = builder.with_target_total(total);
    }
    if args.sequential {
        builder = builder.sequential();
    }
    pb.inc(1);

    pb.set_message(format!("Generating from {} lessons...", inputs.len()));
    let result = builder.run(&inputs)?;
    pb.inc(1);

    pb.set_message("Writing output...");
    let format = if args.compact {
        lessonkit::JsonFormat::Compact
    } else {
        lessonkit::JsonFormat::Pretty
    };
    let files = result.write(&output_dir, format)?;
    pb.inc(1);

    pb.finish_with_message("Done!");

    let manifest = result.manifest();
    println!("\n{}", "Summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Documents".bold(), manifest.document_count);
    if manifest.skipped_documents > 0 {
        println!("{}: {}", "Skipped".bold(), manifest.skipped_documents.to_string().yellow());
    }
    println!("{}: {}", "Units".bold(), manifest.unit_count);
    println!(
        "{}: {} ({:.1}%)",
        "Content type".bold(),
        manifest.label,
        manifest.confidence
    );

    print_diagnostics(&manifest.diagnostics);

    if args.validate {
        let report = result.validate();
        println!("\n{}", "Validation".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        for finding in &report.findings {
            println!("  {} {}", severity_label(finding.level), finding);
        }
        if report.passed() {
            println!("  {}", "passed".green());
        } else {
            println!("  {}", "failed".red());
        }
    }

    println!("\n{}", "Output files:".green().bold());
    for (i, file) in files.iter().enumerate() {
        let branch = if i + 1 == files.len() { "└─" } else { "├─" };
        let name = file.file_name().unwrap_or_default().to_string_lossy();
        println!("  {} {}", branch.dimmed(), name);
    }

    Ok(())
}

fn cmd_classify(input: &Path, config: Option<&Path>, json: bool) -> CliResult {
    let config = load_config(config)?;
    let pipeline = Pipeline::new(
        config,
        TemplateSet::builtin(),
        PipelineOptions::default(),
    )?;
    let analysis = pipeline.analyze(&lessonkit::parser::load_dir(input)?);

    if json {
        let value = serde_json::json!({
            "documents": analysis.classifications,
            "aggregate": analysis.classification,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", "Document Classification".cyan().bold());
    println!("{}", "─".repeat(60).dimmed());
    for doc in &analysis.classifications {
        let scores = doc.scores.rounded();
        println!(
            "{:<28} {:<11} C {:>5.1}  P {:>5.1}  K {:>5.1}",
            doc.document_id,
            doc.label.as_str(),
            scores.get(Category::Conceptual),
            scores.get(Category::Procedural),
            scores.get(Category::Coding)
        );
    }

    let aggregate = &analysis.classification;
    println!();
    println!("{}", "Aggregate".cyan().bold());
    println!("{}", "─".repeat(60).dimmed());
    println!("{}: {}", "Label".bold(), aggregate.label.as_str().green());
    println!("{}: {:.1}%", "Confidence".bold(), aggregate.rounded_confidence());
    println!("{}: {}", "Documents".bold(), aggregate.document_count);
    println!(
        "{}: {}",
        "Foundational".bold(),
        aggregate.foundational_documents
    );
    for (name, value) in aggregate.totals.entries() {
        println!("  {:<20} {}", name.dimmed(), value);
    }

    print_diagnostics(&analysis.diagnostics);
    Ok(())
}

fn cmd_distribution(
    category: Option<&str>,
    family: TableFamily,
    total: Option<usize>,
    compare: bool,
    config: Option<&Path>,
) -> CliResult {
    let config = load_config(config)?;
    let tables = &config.tables;

    let Some(label) = category.filter(|_| !compare) else {
        println!("{}", tables.compare(family));
        return Ok(());
    };

    let selection = tables.select(family, label)?;
    if let Some(warning) = &selection.warning {
        println!("{} {}", "Warning:".yellow(), warning);
    }
    println!("{}", tables.describe(family, label)?);

    if let Some(total) = total {
        let allocation = allocate(total, selection.distribution)?;
        println!("{}", format!("Allocation of {}", total).cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        for (unit, count) in allocation.iter() {
            println!("  {:<24}{:>4}", unit, count);
        }
    }

    Ok(())
}

fn cmd_recommend(
    category: &str,
    concepts: usize,
    lessons: usize,
    json: bool,
    config: Option<&Path>,
) -> CliResult {
    let config = load_config(config)?;
    let recommendation = config
        .recommend
        .recommend(&config.tables, concepts, lessons, category)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recommendation)?);
        return Ok(());
    }

    println!("{}", "Question Set Recommendation".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Category".bold(), recommendation.category);
    println!("{}: {}", "Questions".bold(), recommendation.total);
    println!(
        "{}: {} min (max {} min)",
        "Time".bold(),
        recommendation.time.estimated_minutes,
        recommendation.time.max_minutes
    );
    println!();
    for (question_type, count) in recommendation.allocation.iter() {
        println!("  {:<28}{:>4}", question_type, count);
    }

    Ok(())
}

fn print_diagnostics(diagnostics: &[lessonkit::Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }
    println!("\n{}", "Diagnostics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for diagnostic in diagnostics {
        println!("  {} {}", severity_label(diagnostic.severity), diagnostic);
    }
}

fn severity_label(severity: Severity) -> colored::ColoredString {
    match severity {
        Severity::Error => "✗".red().bold(),
        Severity::Warning => "⚠".yellow(),
        Severity::Info => "·".dimmed(),
    }
}

fn cmd_version() {
    println!("{} {}", "lessonkit".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Lesson-to-deck generation tool");
    println!();
    println!("License: MIT");
}

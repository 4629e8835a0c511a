//! pdfsift CLI - extract text, tables, and OCR'd image content from a PDF.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfsift::{extract_images, extract_tables, extract_text, ExtractOptions, PdfParser};

#[derive(Parser)]
#[command(name = "pdfsift")]
#[command(version)]
#[command(about = "Extract text, tables, and OCR'd image content from a PDF", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(flatten)]
    options: ExtractArgs,

    /// Print the report as JSON instead of the console format
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options shared by the full pipeline and the per-extractor subcommands.
#[derive(clap::Args)]
struct ExtractArgs {
    /// Directory for table CSVs and extracted images
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Tesseract language code
    #[arg(long, value_name = "LANG", default_value = "eng")]
    lang: String,

    /// Tesseract page segmentation mode
    #[arg(long, value_name = "MODE", default_value = "1")]
    psm: u8,

    /// Skip the OCR pass over extracted images
    #[arg(long)]
    no_ocr: bool,

    /// Record empty text for undecodable pages instead of failing
    #[arg(long)]
    lenient: bool,
}

impl ExtractArgs {
    fn to_options(&self) -> ExtractOptions {
        let mut options = ExtractOptions::new()
            .with_output_dir(&self.output_dir)
            .with_ocr_lang(&self.lang)
            .with_ocr(!self.no_ocr);
        options.ocr.psm = self.psm;
        if self.lenient {
            options = options.lenient();
        }
        options
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Extract per-page plain text
    Text {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        options: ExtractArgs,
    },

    /// Detect tables and write them as CSV files
    Tables {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        options: ExtractArgs,
    },

    /// Extract embedded images and run OCR over them
    Images {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        options: ExtractArgs,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Text { input, options }) => cmd_text(&input, &options.to_options()),
        Some(Commands::Tables { input, options }) => cmd_tables(&input, &options.to_options()),
        Some(Commands::Images { input, options }) => cmd_images(&input, &options.to_options()),
        Some(Commands::Info { input }) => cmd_info(&input),
        None => match cli.input {
            Some(input) => cmd_all(&input, &cli.options.to_options(), cli.json),
            None => {
                println!("{}", "Usage: pdfsift <FILE> [--output-dir DIR]".yellow());
                println!("       pdfsift --help for more information");
                Ok(())
            }
        },
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_all(
    input: &Path,
    options: &ExtractOptions,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = ProgressBar::new(3);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    pb.set_message("Extracting text...");
    let pages = extract_text(input, options)?;
    pb.inc(1);

    pb.set_message("Detecting tables...");
    let tables = extract_tables(input, options)?;
    pb.inc(1);

    pb.set_message("Extracting images and running OCR...");
    let images = extract_images(input, options)?;
    pb.inc(1);

    pb.finish_and_clear();

    let report = pdfsift::ExtractionReport {
        pages,
        tables,
        images,
    };

    if json {
        println!("{}", report.to_json(true)?);
    } else {
        print!("{}", report.render());
    }

    Ok(())
}

fn cmd_text(input: &Path, options: &ExtractOptions) -> Result<(), Box<dyn std::error::Error>> {
    for page in extract_text(input, options)? {
        println!("Page {}:\n{}\n", page.number, page.text);
    }
    Ok(())
}

fn cmd_tables(input: &Path, options: &ExtractOptions) -> Result<(), Box<dyn std::error::Error>> {
    let records = extract_tables(input, options)?;
    for record in &records {
        println!("Table {}:\n{}", record.number, record.table.plain_text());
        println!("{} {}", "Saved to".green(), record.csv_path.display());
        println!();
    }
    println!(
        "{} {} tables detected",
        "Done!".green().bold(),
        records.len()
    );
    Ok(())
}

fn cmd_images(input: &Path, options: &ExtractOptions) -> Result<(), Box<dyn std::error::Error>> {
    let records = extract_images(input, options)?;
    for record in &records {
        println!(
            "Page {} - Image path: {}",
            record.page_number,
            record.image_path.display()
        );
        if !record.ocr_text.is_empty() {
            println!("Text from image:\n{}", record.ocr_text);
        }
        println!();
    }
    println!(
        "{} {} images extracted",
        "Done!".green().bold(),
        records.len()
    );
    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let parser = PdfParser::open(input)?;
    let info = parser.info();

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), info.pdf_version);
    println!("{}: {}", "Pages".bold(), info.page_count);
    println!(
        "{}: {}",
        "Encrypted".bold(),
        if info.encrypted { "Yes" } else { "No" }
    );

    if let Some(ref title) = info.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = info.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref creator) = info.creator {
        println!("{}: {}", "Creator".bold(), creator);
    }
    if let Some(ref producer) = info.producer {
        println!("{}: {}", "Producer".bold(), producer);
    }
    if let Some(ref created) = info.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(ref modified) = info.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }

    Ok(())
}

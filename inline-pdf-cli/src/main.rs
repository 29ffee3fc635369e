use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inline_pdf::{ArchiveReader, ContentOperation, ContentParser, ParseOptions, PdfObject};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "inlinepdf",
    about = "Inspect inline images in PDF content streams",
    version,
    author
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the inline images of a decoded content stream
    Images {
        /// File holding the content stream bytes
        input: PathBuf,

        /// Recover images whose data length does not match their parameters
        #[arg(long, conflicts_with = "strict")]
        lenient: bool,

        /// Reject any deviation from the PDF syntax
        #[arg(long)]
        strict: bool,
    },

    /// Work with zip archives of resources
    Archive {
        #[command(subcommand)]
        command: ArchiveCommands,
    },
}

#[derive(Subcommand)]
enum ArchiveCommands {
    /// List file entries
    List {
        /// Archive path
        archive: PathBuf,
    },

    /// Write one entry to a file or to stdout
    Extract {
        /// Archive path
        archive: PathBuf,

        /// Entry name, with `/` separators
        entry: String,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "inline_pdf=warn,inlinepdf=info",
        1 => "inline_pdf=debug,inlinepdf=debug",
        _ => "inline_pdf=trace,inlinepdf=trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Images {
            input,
            lenient,
            strict,
        } => {
            let options = if lenient {
                ParseOptions::lenient()
            } else if strict {
                ParseOptions::strict()
            } else {
                ParseOptions::default()
            };
            list_images(&input, options)?;
        }

        Commands::Archive { command } => match command {
            ArchiveCommands::List { archive } => {
                let names = ArchiveReader::with_archive(&archive, |reader| reader.entry_names())
                    .with_context(|| format!("Failed to list {}", archive.display()))?;
                for name in names {
                    println!("{name}");
                }
            }

            ArchiveCommands::Extract {
                archive,
                entry,
                output,
            } => {
                let data = ArchiveReader::with_archive(&archive, |reader| {
                    reader.read_entry(Some(&entry))
                })
                .with_context(|| format!("Failed to read {entry} from {}", archive.display()))?;

                match output {
                    Some(path) => {
                        fs::write(&path, &data)
                            .with_context(|| format!("Failed to write {}", path.display()))?;
                        info!(entry = %entry, bytes = data.len(), "extracted to {}", path.display());
                    }
                    None => {
                        use std::io::Write;
                        std::io::stdout().write_all(&data)?;
                    }
                }
            }
        },
    }

    Ok(())
}

fn list_images(input: &Path, options: ParseOptions) -> Result<()> {
    let content =
        fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    debug!(bytes = content.len(), "read content stream");

    let mut parser = ContentParser::new(&content).with_options(options);
    let operations = parser
        .parse_operations()
        .with_context(|| format!("Failed to parse {}", input.display()))?;

    let mut count = 0;
    for operation in &operations {
        if let ContentOperation::InlineImage(image) = operation {
            count += 1;
            let filters = image
                .params
                .filters
                .iter()
                .map(|f| f.name())
                .collect::<Vec<_>>()
                .join(", ");
            println!(
                "Image {count} at offset {}: {}x{}, {}, {} component(s), {} bpc, {} bytes{}",
                image.params.offset,
                image.params.width,
                image.params.height,
                describe_color_space(image.params.color_space.as_ref()),
                image.components,
                image
                    .params
                    .bits_per_component
                    .map_or_else(|| "?".to_string(), |b| b.to_string()),
                image.data.len(),
                if filters.is_empty() {
                    String::new()
                } else {
                    format!(" [{filters}]")
                }
            );
        }
    }

    println!(
        "{count} inline image(s) in {} operation(s)",
        operations.len()
    );
    for warning in parser.warnings() {
        eprintln!("Warning: {warning}");
    }

    Ok(())
}

fn describe_color_space(color_space: Option<&PdfObject>) -> String {
    match color_space {
        None => "default".to_string(),
        Some(PdfObject::Name(name)) => name.to_string(),
        Some(PdfObject::Array(array)) => match array.get(0).and_then(PdfObject::as_name) {
            Some(family) => format!("[{family} ...]"),
            None => "[...]".to_string(),
        },
        Some(other) => format!("{other:?}"),
    }
}

//! imago - assemble IIIF manifests into shareable galleries
//!
//! Thin command layer over `imago-core`: every command routes into the
//! same session operations the library exposes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use imago_core::deeplink::DeepLinkRequest;
use imago_core::image;
use imago_core::metadata::{document_label, page_label};
use imago_core::{
    AddOutcome, Document, ExportArtifact, ExportFormat, ExportOptions, GallerySession,
    IiifVersion, LoadReport, ThumbnailSpec,
};

#[derive(Parser, Debug)]
#[command(name = "imago")]
#[command(about = "Assemble IIIF manifests into shareable gallery collections")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the cards of a saved gallery file
    Show {
        /// Gallery collection JSON file
        file: PathBuf,
    },
    /// Load a gallery from a share link and print its cards
    Open {
        /// Page URL or query string carrying a file= or url= parameter
        link: String,
    },
    /// Build a gallery from saved files and manifest URLs, then export it
    Collect(CollectArgs),
}

#[derive(Args, Debug)]
struct CollectArgs {
    /// Start from a saved gallery file
    #[arg(long, value_name = "FILE")]
    from_file: Option<PathBuf>,

    /// Manifest URL to add; repeatable, comma-separated lists accepted
    #[arg(long = "add", value_name = "URL")]
    add: Vec<String>,

    /// Zero-based pages to keep from every multi-page manifest
    #[arg(long, value_delimiter = ',', value_name = "INDEX")]
    pages: Vec<usize>,

    /// Keep every page of multi-page manifests
    #[arg(long, conflicts_with = "pages")]
    all_pages: bool,

    /// Gallery name; drives the export identifier and filename
    #[arg(long)]
    name: Option<String>,

    /// Export one flattened manifest instead of a collection
    #[arg(long)]
    flatten: bool,

    /// Directory the export is written into
    #[arg(long, default_value = ".")]
    out: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "imago=info".into()))
        .init();

    if let Err(err) = run(Cli::parse()).await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Show { file } => show(&file),
        Command::Open { link } => open(&link).await,
        Command::Collect(args) => collect(args).await,
    }
}

fn show(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let text = fs::read_to_string(file)?;
    let mut session = GallerySession::new();
    let report = session.load_collection_text(&text)?;
    print_gallery(&session, report);
    Ok(())
}

async fn open(link: &str) -> Result<(), Box<dyn std::error::Error>> {
    let request = DeepLinkRequest::from_url(link)
        .or_else(|| DeepLinkRequest::from_query(link))
        .ok_or("link carries no file= or url= parameter")?;
    tracing::info!(url = %request.url, filename = %request.filename, "loading shared gallery");

    let mut session = GallerySession::new();
    let text = session.fetch_text(&request.url).await?;
    let report = session.load_collection_text(&text)?;
    println!("{}", request.filename);
    print_gallery(&session, report);
    Ok(())
}

async fn collect(args: CollectArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = GallerySession::new();

    if let Some(path) = &args.from_file {
        let text = fs::read_to_string(path)?;
        let report = session.load_collection_text(&text)?;
        println!(
            "{}: {} manifest(s), {} page(s)",
            path.display(),
            report.documents,
            report.pages_added
        );
    }

    for input in &args.add {
        let batch = session.add_manifest_list(input).await;
        for (url, outcome) in batch.outcomes {
            match outcome {
                AddOutcome::Added { pages } => println!("added {url} ({pages} page(s))"),
                AddOutcome::NeedsSelection(document) => {
                    offer_selection(&mut session, &document, &args, &url);
                }
            }
        }
        for (url, err) in batch.failures {
            eprintln!("skipped {url}: {err}");
        }
    }

    if session.state().is_empty() {
        return Err("gallery is empty, nothing to export".into());
    }

    let artifact = session.export(&ExportOptions {
        format: if args.flatten {
            ExportFormat::Flattened
        } else {
            ExportFormat::Collection
        },
        name: args.name.clone(),
    })?;
    let path = write_artifact(&artifact, &args.out)?;
    println!(
        "wrote {} ({} manifest(s), {} page(s))",
        path.display(),
        artifact.document_count,
        artifact.page_count
    );
    Ok(())
}

/// Apply the page selection flags to a multi-page manifest, or list its
/// pages when no selection was given so the caller can re-run with one.
fn offer_selection(
    session: &mut GallerySession,
    document: &Document,
    args: &CollectArgs,
    url: &str,
) {
    let total = document.pages().len();
    if args.all_pages || !args.pages.is_empty() {
        let indices: Vec<usize> = if args.all_pages {
            (0..total).collect()
        } else {
            args.pages.clone()
        };
        let added = session.add_selected_pages(document, &indices);
        println!("added {url} ({added} of {total} page(s))");
    } else {
        eprintln!("{url} has {total} pages; pass --pages or --all-pages to pick:");
        eprintln!("  {}", document_label(document));
        for line in selection_lines(document) {
            eprintln!("  {line}");
        }
    }
}

/// One picker line per page: index, label, and the small thumbnail URL
/// when the page has an image service.
fn selection_lines(document: &Document) -> Vec<String> {
    let version = IiifVersion::detect(document);
    document
        .pages()
        .iter()
        .enumerate()
        .map(|(index, page)| {
            let label = page_label(page, index);
            match image::locate(page, version) {
                Some(source) => {
                    format!("[{index}] {label}  {}", source.thumbnail_url(ThumbnailSpec::PICKER))
                }
                None => format!("[{index}] {label}  (no image service)"),
            }
        })
        .collect()
}

fn print_gallery(session: &GallerySession, report: LoadReport) {
    println!(
        "{} manifest(s), {} page(s) shown, {} skipped",
        report.documents, report.pages_added, report.pages_skipped
    );
    for (position, card) in session.state().cards().iter().enumerate() {
        let record = &card.record;
        println!("[{position}] {}", record.title);
        println!("    author:      {}", record.author);
        println!("    date:        {}", record.date);
        println!("    collection:  {}", record.collection);
        println!("    attribution: {}", record.attribution);
        println!("    link:        {}", record.link);
        println!("    image:       {}", record.image_url);
    }
}

fn write_artifact(artifact: &ExportArtifact, out: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(out)?;
    let path = out.join(&artifact.filename);
    fs::write(&path, &artifact.json)?;
    Ok(path)
}

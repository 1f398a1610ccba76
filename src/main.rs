// Command-line front end: resolve the native rasterizer for this machine and
// optionally render a document through it.

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use tracing_subscriber::EnvFilter;
use vectorcanvas::{
    loader::{self, EmbeddedResources},
    Canvas, LoaderConfig, NativeRasterizer,
};

#[derive(Parser, Debug)]
#[command(
    name = "vectorcanvas",
    version,
    about = "Render vector documents with the native rasterizer"
)]
struct Cli {
    /// Document to render.  Without it, only the library is resolved.
    document: Option<PathBuf>,

    /// JSON loader configuration (overrides VECTORCANVAS_LOADER_CONFIG).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory whose ancestors are searched for a development build, in
    /// addition to the executable's directory.
    #[arg(long = "search-root")]
    search_roots: Vec<PathBuf>,

    /// List the artifacts embedded in this binary and exit.
    #[arg(long)]
    list_embedded: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("vectorcanvas: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.list_embedded {
        for path in EmbeddedResources::new().paths() {
            println!("{path}");
        }
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => LoaderConfig::load(path)?,
        None => LoaderConfig::from_env(),
    };
    config.add_search_roots(cli.search_roots);

    if loader::init(config).is_err() {
        return Err("native loader was configured twice".into());
    }
    let library = vectorcanvas::ensure_loaded()?;
    println!("loaded native library for {}", loader::identify());

    let Some(document) = cli.document else {
        return Ok(());
    };
    let rasterizer = NativeRasterizer::from_library(library)?;
    let canvas = Canvas::from_path(rasterizer, &document)?;
    match canvas.preferred_size() {
        Some((w, h)) => println!("{}: {w}x{h}", document.display()),
        None => return Err(format!("{}: nothing rendered", document.display()).into()),
    }
    Ok(())
}

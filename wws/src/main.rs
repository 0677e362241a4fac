use std::{fs, path::PathBuf};

use structopt::StructOpt;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use wws_codegen::{self as codegen, Options};
use wws_wsdl as wsdl;

#[derive(Debug, Error)]
enum Error {
    #[error("Error reading WSDL")]
    Wsdl(#[from] wsdl::error::Error),

    #[error("Error generating client")]
    Codegen(#[from] codegen::error::Error),

    #[error("Unable to write {path}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Generates a typed Workday Web Services client from a WSDL.
#[derive(StructOpt)]
#[structopt(name = "wws")]
struct Args {
    /// Directory the `{Endpoint}Client.rs` file is written to.
    #[structopt(short, long, default_value = ".", parse(from_os_str))]
    output_dir: PathBuf,

    /// Module the generated client takes request and response types from.
    #[structopt(short, long, default_value = "super::types")]
    types_path: String,

    /// WSDL file path or URL.
    input: String,
}

struct Generated {
    client: String,
    path: PathBuf,
    operations: usize,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<Generated, Error> {
    let endpoint = wsdl::parse(&args.input)?;
    let options = Options {
        types_path: args.types_path.clone(),
        ..Options::default()
    };

    let source = codegen::render(&endpoint, &options)?;
    let path = args.output_dir.join(codegen::file_name(&endpoint));

    fs::write(&path, source).map_err(|source| Error::Io {
        path: path.clone(),
        source,
    })?;

    Ok(Generated {
        client: codegen::client_name(&endpoint),
        path,
        operations: endpoint.operations.len(),
    })
}

#[paw::main]
fn main(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let generated = run(&args)?;
    debug!(path = %generated.path.display(), "wrote client");
    println!(
        "{} written with {} operations.",
        generated.client, generated.operations
    );

    Ok(())
}

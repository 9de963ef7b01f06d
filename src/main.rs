use anyhow::{Context as _, Result};
use clap::Parser;
use log::{info, LevelFilter};
use std::fs;
use tinycomponent::{
    binary::module::DEFAULT_MAX_DEPTH, decode_type_section, Decoder, DecoderConfig,
};

/// Decode component-model type definitions and print the resulting tree.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File holding the encoded type definition
    file: String,

    /// Treat the file as a whole type section, `vec(deftype)`
    #[arg(short, long)]
    section: bool,

    /// Maximum nesting depth of type definitions
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: u32,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let bytes = fs::read(&args.file).with_context(|| format!("failed to read {}", args.file))?;
    info!("read {} bytes from {}", bytes.len(), args.file);

    let config = DecoderConfig {
        max_depth: args.max_depth,
    };
    if args.section {
        let types = decode_type_section(&bytes, config)
            .with_context(|| format!("failed to decode type section in {}", args.file))?;
        for (idx, ty) in types.iter().enumerate() {
            println!("type {}: {:#?}", idx, ty);
        }
    } else {
        let mut decoder = Decoder::with_config(&bytes, config);
        let ty = decoder
            .decode_def_type()
            .with_context(|| format!("failed to decode type definition in {}", args.file))?;
        println!("{:#?}", ty);
        if !decoder.is_end() {
            info!("{} trailing bytes ignored", bytes.len() - decoder.offset());
        }
    }
    Ok(())
}

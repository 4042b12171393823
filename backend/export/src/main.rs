use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Record store to read
    data_file: PathBuf,

    /// JSON mission list, built-in missions when omitted
    #[arg(long)]
    missions: Option<PathBuf>,

    /// Output encoding label
    #[arg(long, default_value = "euc-kr")]
    encoding: String,

    /// Exact name to keep, any case
    #[arg(long)]
    name: Option<String>,

    /// Timestamp prefix to keep, e.g. 2024-05-01
    #[arg(long)]
    date: Option<String>,

    /// time or name
    #[arg(long, default_value = "time")]
    sort: String,

    #[arg(long, default_value = "missions.csv")]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();

    let options = export::ExportOptions {
        data_file: args.data_file,
        missions_file: args.missions,
        encoding: args.encoding,
        name: args.name,
        date: args.date,
        sort: args.sort,
        out: args.out,
    };

    let written = export::export_file(&options)?;
    println!("Exported {written} records to {}", options.out.display());

    Ok(())
}

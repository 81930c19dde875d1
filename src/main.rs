use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use itertools::Itertools;
use log::info;

use vcf_sift::pipeline::{FilterConfig, FilterPipeline};
use vcf_sift::reader::VcfRecords;
use vcf_sift::types::{InheritanceModel, Region};

/// Filter variants in a VCF file.
///
/// Header lines pass through unchanged; data lines are written back
/// verbatim, in input order, if and only if they survive every active
/// filter.
#[derive(Parser)]
#[clap(version, about)]
struct Args {
    /// VCF file for processing, plain or gzip-compressed; `-` reads stdin.
    #[clap(short, long, value_name = "vcffile")]
    file: String,

    /// File for output; stdout if omitted.
    #[clap(short, long, value_name = "outfile")]
    out: Option<String>,

    /// Keep only records inside this window, e.g. `chr7:117120016-117308718`.
    #[clap(long, value_name = "CHR:START-END")]
    region: Option<Region>,

    /// Keep only records with QUAL strictly above this value.
    #[clap(long, value_name = "N")]
    min_qual: Option<f64>,

    /// Keep only records where at least this fraction of samples has a
    /// fully-called genotype.
    #[clap(long, value_name = "FRACTION")]
    min_call_rate: Option<f64>,

    /// Do not require `PASS` in the FILTER column.
    #[clap(long)]
    no_qc: bool,

    /// Filter on an INFO field. OP is one of gt, gte, lt, lte, eq, neq,
    /// contains, ncontains. May be given multiple times; filters apply in
    /// the order given.
    #[clap(
        long,
        number_of_values = 3,
        value_names = &["FIELD", "OP", "VALUE"],
        multiple_occurrences = true
    )]
    info_filter: Vec<String>,

    /// Inheritance model all samples must fit: dominant or recessive.
    #[clap(long, value_name = "MODEL")]
    model: Option<InheritanceModel>,

    /// Log progress and per-filter statistics.
    #[clap(short, long)]
    verbose: bool,
}

fn init_logger(verbose: bool) {
    let level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();
}

fn open_input(path: &str) -> anyhow::Result<VcfRecords<BufReader<Box<dyn Read>>>> {
    if path == "-" {
        let stdin: Box<dyn Read> = Box::new(io::stdin());
        VcfRecords::new(BufReader::new(stdin))
    } else {
        VcfRecords::from_path(path).with_context(|| format!("cannot open {}", path))
    }
}

fn open_output(path: Option<&str>) -> anyhow::Result<BufWriter<Box<dyn Write>>> {
    let inner: Box<dyn Write> = match path {
        None | Some("-") => Box::new(io::stdout()),
        Some(path) => {
            Box::new(File::create(path).with_context(|| format!("cannot create {}", path))?)
        }
    };
    Ok(BufWriter::new(inner))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    let config = FilterConfig {
        region: args.region,
        min_qual: args.min_qual,
        min_call_rate: args.min_call_rate,
        require_pass: !args.no_qc,
        info_filters: args
            .info_filter
            .iter()
            .chunks(3)
            .into_iter()
            .map(|mut chunk| chunk.join(" "))
            .collect(),
        model: args.model,
    };
    // a bad expression or model name dies here, before any input is read
    let pipeline = FilterPipeline::build(&config).context("invalid filter configuration")?;
    info!("parameter: file = {}", args.file);
    info!("active filters = {}", pipeline.len());

    let records = open_input(&args.file)?;
    let mut out = open_output(args.out.as_deref())?;

    for line in records.header().lines() {
        writeln!(out, "{}", line)?;
    }

    let mut stats = pipeline.stats();
    for record in records {
        if pipeline.evaluate_recording(&record, &mut stats) {
            writeln!(out, "{}", record.as_line())?;
        }
    }
    out.flush()?;
    stats.report();

    Ok(())
}

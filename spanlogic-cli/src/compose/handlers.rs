use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use spanlogic_compose::columns::parse_columns;
use spanlogic_compose::{ComposeConfig, InMemoryStagingStore, OutputColumn, SpanComposition};
use spanlogic_core::RowSink;
use spanlogic_io::{JsonLinesSink, TsvFeatureSource, TsvSink};

use super::cli::{ANCHOR_ARGS, FORMAT_JSONL};

pub fn run_compose(matches: &ArgMatches) -> Result<()> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => ComposeConfig::try_from(Path::new(path))
            .with_context(|| format!("Failed to load config file: {}", path))?,
        None => ComposeConfig::default(),
    };
    if matches.get_flag("include-unmatched") {
        config.include_unmatched = true;
    }

    let columns = match matches.get_many::<String>("columns") {
        Some(names) => parse_columns(&names.collect::<Vec<_>>())?,
        None => config.default_columns()?,
    };

    let locations = matches
        .get_one::<String>("locations")
        .context("A path to a location table is required.")?;
    let points = matches.get_one::<String>("points");
    let mut source = TsvFeatureSource::open(Path::new(locations), points.map(Path::new))
        .with_context(|| format!("Failed to load feature locations from {}", locations))?;
    if let Some(record_class) = matches.get_one::<String>("record-class") {
        source = source.with_default_record_class(record_class);
    }

    let params = request_params(matches);
    let store = InMemoryStagingStore::new();
    let composition = SpanComposition::new(&source, &store, config);

    let writer: Box<dyn Write> = match matches.get_one::<String>("out") {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create output file: {}", path))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let names: Vec<String> = columns.iter().map(OutputColumn::to_string).collect();
    let mut sink: Box<dyn RowSink> = match matches.get_one::<String>("format").map(String::as_str)
    {
        Some(FORMAT_JSONL) => Box::new(JsonLinesSink::new(writer, names)),
        _ => Box::new(TsvSink::new(writer, names)),
    };

    let written = composition
        .execute(&params, &columns, sink.as_mut())
        .context("Span composition failed")?;
    info!("Wrote {} rows", written);

    Ok(())
}

///
/// Translate command line flags into request parameters.
///
fn request_params(matches: &ArgMatches) -> HashMap<String, String> {
    let mut params = HashMap::new();
    let flags = [
        ("span-a", "span_a"),
        ("span-b", "span_b"),
        ("operation", "span_operation"),
        ("strand", "span_strand"),
        ("output", "span_output"),
    ];
    for (flag, param) in flags.iter().chain(ANCHOR_ARGS.iter()) {
        if let Some(value) = matches.get_one::<String>(flag) {
            params.insert(param.to_string(), value.clone());
        }
    }
    params
}

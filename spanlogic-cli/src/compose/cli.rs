use clap::{Arg, ArgAction, Command, arg};

pub const COMPOSE_CMD: &str = "compose";

pub const FORMAT_TSV: &str = "tsv";
pub const FORMAT_JSONL: &str = "jsonl";

/// Per-side anchoring flags and the request parameter each one feeds.
pub const ANCHOR_ARGS: &[(&str, &str)] = &[
    ("begin-a", "span_begin_a"),
    ("begin-direction-a", "span_begin_direction_a"),
    ("begin-offset-a", "span_begin_offset_a"),
    ("end-a", "span_end_a"),
    ("end-direction-a", "span_end_direction_a"),
    ("end-offset-a", "span_end_offset_a"),
    ("begin-b", "span_begin_b"),
    ("begin-direction-b", "span_begin_direction_b"),
    ("begin-offset-b", "span_begin_offset_b"),
    ("end-b", "span_end_b"),
    ("end-direction-b", "span_end_direction_b"),
    ("end-offset-b", "span_end_offset_b"),
];

pub fn create_compose_cli() -> Command {
    let command = Command::new(COMPOSE_CMD)
        .author("Databio")
        .about("Find the features of one set that overlap, contain or lie inside the features of another")
        .arg_required_else_help(true)
        .arg(arg!(-a --"span-a" <answer> "Answer file of side A").required(true))
        .arg(arg!(-b --"span-b" <answer> "Answer file of side B").required(true))
        .arg(arg!(-l --locations <locations> "Feature location table").required(true))
        .arg(arg!(-p --points <points> "Point location table (needed for point features)"))
        .arg(
            arg!(--operation <operation> "Spatial relation")
                .required(true)
                .value_parser(["overlap", "a_contain_b", "b_contain_a"]),
        )
        .arg(
            arg!(--strand <strand> "Strand filter")
                .value_parser(["both_strands", "same_strand", "opposite_strands"]),
        )
        .arg(arg!(--output <side> "Side whose features are reported").value_parser(["a", "b"]))
        .arg(
            arg!(--columns <columns> "Comma-separated output columns")
                .value_delimiter(','),
        )
        .arg(
            Arg::new("include-unmatched")
                .long("include-unmatched")
                .action(ArgAction::SetTrue)
                .help("Also report output features that matched nothing"),
        )
        .arg(
            arg!(--format <format> "Output format")
                .value_parser([FORMAT_TSV, FORMAT_JSONL])
                .default_value(FORMAT_TSV),
        )
        .arg(arg!(--"record-class" <class> "Record class of answer files without a header"))
        .arg(arg!(-c --config <config> "TOML configuration file"))
        .arg(arg!(-o --out <out> "Output file (stdout when omitted)"));

    ANCHOR_ARGS.iter().fold(command, |command, (flag, param)| {
        command.arg(
            Arg::new(*flag)
                .long(*flag)
                .value_name("VALUE")
                .help(format!("Sets {}", param)),
        )
    })
}

use std::collections::HashMap;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use rstest::*;

use spanlogic_compose::{
    ComposeConfig, ComposeError, InMemoryStagingStore, ModelError, OutputColumn,
    SpanComposition, StagedFeatureSet, StagingError, StagingStore, UserError,
};
use spanlogic_core::{
    Answer, AnswerRecord, FeatureLocation, InMemoryFeatureSource, RowSink, SinkError,
};

const SPANS: &str = "DynSpanRecordClasses.DynSpanRecordClass";
const TRANSCRIPTS: &str = "TranscriptRecordClasses.TranscriptRecordClass";

fn record(id: &str, gene: Option<&str>) -> AnswerRecord {
    AnswerRecord {
        source_id: id.to_string(),
        project_id: "PlasmoDB".to_string(),
        weight: 10,
        gene_source_id: gene.map(String::from),
    }
}

fn spans(ids: &[&str]) -> Answer {
    Answer::new(SPANS, ids.iter().map(|id| record(id, None)).collect())
}

fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn run(
    source: &InMemoryFeatureSource,
    store: &InMemoryStagingStore,
    request: &[(&str, &str)],
    columns: &[OutputColumn],
) -> Result<Vec<Vec<String>>, ComposeError> {
    let composition = SpanComposition::new(source, store, ComposeConfig::default());
    let mut rows: Vec<Vec<String>> = Vec::new();
    composition.execute(&params(request), columns, &mut rows)?;
    Ok(rows)
}

#[fixture]
fn source() -> InMemoryFeatureSource {
    InMemoryFeatureSource::new()
        .with_answer("a", spans(&["chr1:100-200:f"]))
        .with_answer("b", spans(&["chr1:150-160:f"]))
}

#[rstest]
fn test_overlap_same_strand(source: InMemoryFeatureSource) {
    let store = InMemoryStagingStore::new();
    let rows = run(
        &source,
        &store,
        &[
            ("span_operation", "overlap"),
            ("span_strand", "same_strand"),
            ("span_output", "a"),
            ("span_a", "a"),
            ("span_b", "b"),
        ],
        &[OutputColumn::SourceId, OutputColumn::MatchedCount],
    )
    .unwrap();

    assert_eq!(rows, vec![vec!["chr1:100-200:f", "1"]]);
    assert!(store.is_empty());
}

#[rstest]
fn test_overlap_opposite_strands(source: InMemoryFeatureSource) {
    let store = InMemoryStagingStore::new();
    let rows = run(
        &source,
        &store,
        &[
            ("span_operation", "overlap"),
            ("span_strand", "opposite_strands"),
            ("span_a", "a"),
            ("span_b", "b"),
        ],
        &OutputColumn::ALL,
    )
    .unwrap();

    assert!(rows.is_empty());
    assert!(store.is_empty());
}

#[rstest]
fn test_output_b_reports_references_from_a(source: InMemoryFeatureSource) {
    let store = InMemoryStagingStore::new();
    let rows = run(
        &source,
        &store,
        &[
            ("span_operation", "b_contain_a"),
            ("span_output", "b"),
            ("span_a", "b"),
            ("span_b", "a"),
        ],
        &[OutputColumn::SourceId, OutputColumn::MatchedRegions],
    )
    .unwrap();

    assert_eq!(rows, vec![vec!["chr1:100-200:f", "chr1:150-160:f: 150 - 160 (+)"]]);
}

#[rstest]
fn test_transcripts_of_one_gene_match_once() {
    let source = InMemoryFeatureSource::new()
        .with_answer("genome", spans(&["chr1:1000-3000:f"]))
        .with_answer(
            "transcripts",
            Answer::new(
                TRANSCRIPTS,
                vec![
                    record("T1.1", Some("G1")),
                    record("T1.2", Some("G1")),
                    record("T1.3", Some("G1")),
                ],
            ),
        )
        .with_location(FeatureLocation {
            feature_source_id: "G1".to_string(),
            sequence_source_id: "chr1".to_string(),
            start_min: 1200,
            end_max: 2400,
            is_reversed: Some(false),
            is_top_level: true,
            feature_type: "GeneFeature".to_string(),
        });
    let store = InMemoryStagingStore::new();

    let rows = run(
        &source,
        &store,
        &[
            ("span_operation", "a_contain_b"),
            ("span_a", "genome"),
            ("span_b", "transcripts"),
        ],
        &[
            OutputColumn::SourceId,
            OutputColumn::MatchedCount,
            OutputColumn::MatchedRegions,
            OutputColumn::MatchedResult,
        ],
    )
    .unwrap();

    assert_eq!(
        rows,
        vec![vec!["chr1:1000-3000:f", "1", "G1: 1,200 - 2,400 (+)", "Y"]]
    );
}

#[rstest]
fn test_long_matched_regions_are_truncated() {
    let references: Vec<String> = (0..250)
        .map(|i| format!("chr1:{}-{}:f", 10_000 + i, 20_000 + i))
        .collect();
    let references: Vec<&str> = references.iter().map(String::as_str).collect();
    let source = InMemoryFeatureSource::new()
        .with_answer("a", spans(&["chr1:1-100000:f"]))
        .with_answer("b", spans(&references));
    let store = InMemoryStagingStore::new();

    let rows = run(
        &source,
        &store,
        &[("span_operation", "a_contain_b"), ("span_a", "a"), ("span_b", "b")],
        &[OutputColumn::MatchedCount, OutputColumn::MatchedRegions],
    )
    .unwrap();

    assert_eq!(rows[0][0], "250");
    assert_eq!(rows[0][1].chars().count(), 4000);
    assert!(rows[0][1].ends_with("..."));
}

#[rstest]
fn test_unknown_reference(source: InMemoryFeatureSource) {
    let store = InMemoryStagingStore::new();
    let err = run(
        &source,
        &store,
        &[("span_operation", "overlap"), ("span_a", "a"), ("span_b", "gone")],
        &OutputColumn::ALL,
    )
    .unwrap_err();

    assert!(err.is_user_error());
    assert!(matches!(
        err,
        ComposeError::User(UserError::UnknownReference { .. })
    ));
    assert!(store.is_empty());
}

#[rstest]
fn test_unsupported_record_class(mut source: InMemoryFeatureSource) {
    source.insert_answer(
        "pathways",
        Answer::new("PathwayRecordClasses.PathwayRecordClass", vec![record("P1", None)]),
    );
    let store = InMemoryStagingStore::new();
    let err = run(
        &source,
        &store,
        &[("span_operation", "overlap"), ("span_a", "a"), ("span_b", "pathways")],
        &OutputColumn::ALL,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        ComposeError::User(UserError::UnsupportedRecordClass(_))
    ));
    assert!(store.is_empty());
}

#[rstest]
fn test_invalid_direction_names_the_side_b_key(source: InMemoryFeatureSource) {
    let store = InMemoryStagingStore::new();
    let err = run(
        &source,
        &store,
        &[
            ("span_operation", "overlap"),
            ("span_a", "a"),
            ("span_b", "b"),
            ("span_end_direction_b", "sideways"),
        ],
        &OutputColumn::ALL,
    )
    .unwrap_err();

    assert!(err.to_string().contains("span_end_direction_b"));
}

#[rstest]
#[case(true)]
#[case(false)]
fn test_boundary_past_coordinate_range_is_model_error(
    mut source: InMemoryFeatureSource,
    #[case] parallel: bool,
) {
    source.insert_answer(
        "edge",
        spans(&["chr1:9223372036854775000-9223372036854775807:f"]),
    );
    let store = InMemoryStagingStore::new();
    let config = ComposeConfig {
        parallel_staging: parallel,
        ..Default::default()
    };
    let composition = SpanComposition::new(&source, &store, config);

    let mut rows: Vec<Vec<String>> = Vec::new();
    let err = composition
        .execute(
            &params(&[
                ("span_operation", "overlap"),
                ("span_a", "edge"),
                ("span_b", "b"),
                ("span_end_direction_a", "+"),
                ("span_end_offset_a", "1000"),
            ]),
            &OutputColumn::ALL,
            &mut rows,
        )
        .unwrap_err();

    assert!(matches!(
        err,
        ComposeError::Model(ModelError::Extraction { .. })
    ));
    assert!(rows.is_empty());
    assert!(store.is_empty());
}

struct FailingSink;

impl RowSink for FailingSink {
    fn add_row(&mut self, _row: Vec<String>) -> Result<(), SinkError> {
        Err(SinkError::Io(std::io::Error::other("disk full")))
    }
}

#[rstest]
fn test_sink_failure_releases_staged_sets(source: InMemoryFeatureSource) {
    let store = InMemoryStagingStore::new();
    let composition = SpanComposition::new(&source, &store, ComposeConfig::default());

    let err = composition
        .execute(
            &params(&[("span_operation", "overlap"), ("span_a", "a"), ("span_b", "b")]),
            &OutputColumn::ALL,
            &mut FailingSink,
        )
        .unwrap_err();

    assert!(matches!(err, ComposeError::Model(ModelError::Sink(_))));
    assert!(store.is_empty());
}

/// A store whose writes fail after a number of successful creates.
struct FlakyStore {
    inner: InMemoryStagingStore,
    creates_left: std::sync::atomic::AtomicUsize,
}

impl StagingStore for FlakyStore {
    fn create(&self, name: &str, set: Arc<StagedFeatureSet>) -> Result<(), StagingError> {
        use std::sync::atomic::Ordering;
        if self
            .creates_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_err()
        {
            return Err(StagingError::Backend("tablespace full".to_string()));
        }
        self.inner.create(name, set)
    }

    fn fetch(&self, name: &str) -> Result<Arc<StagedFeatureSet>, StagingError> {
        self.inner.fetch(name)
    }

    fn drop_set(&self, name: &str) -> Result<(), StagingError> {
        self.inner.drop_set(name)
    }

    fn contains(&self, name: &str) -> bool {
        self.inner.contains(name)
    }

    fn names(&self) -> Vec<String> {
        self.inner.names()
    }
}

#[rstest]
#[case(true)]
#[case(false)]
fn test_staging_failure_releases_the_other_side(
    source: InMemoryFeatureSource,
    #[case] parallel: bool,
) {
    let store = FlakyStore {
        inner: InMemoryStagingStore::new(),
        creates_left: 1.into(),
    };
    let config = ComposeConfig {
        parallel_staging: parallel,
        ..Default::default()
    };
    let composition = SpanComposition::new(&source, &store, config);

    let mut rows: Vec<Vec<String>> = Vec::new();
    let err = composition
        .execute(
            &params(&[("span_operation", "overlap"), ("span_a", "a"), ("span_b", "b")]),
            &OutputColumn::ALL,
            &mut rows,
        )
        .unwrap_err();

    assert!(!err.is_user_error());
    assert!(store.inner.is_empty());
}

#[rstest]
fn test_concurrent_requests_share_a_store(source: InMemoryFeatureSource) {
    let store = InMemoryStagingStore::new();
    let composition = SpanComposition::new(&source, &store, ComposeConfig::default());
    let request = params(&[("span_operation", "overlap"), ("span_a", "a"), ("span_b", "b")]);

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                let mut rows: Vec<Vec<String>> = Vec::new();
                let written = composition
                    .execute(&request, &OutputColumn::ALL, &mut rows)
                    .unwrap();
                assert_eq!(written, 1);
            });
        }
    });

    assert!(store.is_empty());
}

use std::io::BufRead;
use std::path::{Path, PathBuf};

use fxhash::FxHashMap as HashMap;
use log::debug;

use spanlogic_core::utils::get_dynamic_reader;
use spanlogic_core::{
    Answer, AnswerRecord, FeatureLocation, FeatureSource, PointLocation, SourceError,
};

use crate::consts::*;
use crate::error::{Result, SpanIoError};

///
/// A [`FeatureSource`] over tab-separated files.
///
/// References are paths of answer files, read when the answer is requested. The location
/// catalog (and the optional point catalog) is loaded once when the source is opened.
///
/// Answer files look like:
/// ```text
/// #record_class=TranscriptRecordClasses.TranscriptRecordClass
/// PF3D7_0100100.1	PlasmoDB	10	PF3D7_0100100
/// ```
///
#[derive(Debug, Default)]
pub struct TsvFeatureSource {
    locations: HashMap<String, Vec<FeatureLocation>>,
    points: HashMap<String, PointLocation>,
    default_record_class: String,
}

impl TsvFeatureSource {
    ///
    /// Open a source over a location catalog and an optional point catalog.
    ///
    /// # Arguments
    /// - locations: `feature_source_id, sequence_source_id, start_min, end_max, is_reversed,
    ///   is_top_level, feature_type`
    /// - points: `source_id, sequence_source_id, location`
    pub fn open(locations: &Path, points: Option<&Path>) -> Result<Self> {
        let mut source = TsvFeatureSource {
            default_record_class: DEFAULT_RECORD_CLASS.to_string(),
            ..Default::default()
        };

        for location in read_table(locations, LOCATION_FIELDS, parse_location)? {
            source
                .locations
                .entry(location.feature_source_id.clone())
                .or_default()
                .push(location);
        }
        if let Some(points) = points {
            for point in read_table(points, POINT_FIELDS, parse_point)? {
                source.points.insert(point.source_id.clone(), point);
            }
        }

        debug!(
            "Loaded locations of {} features and {} points",
            source.locations.len(),
            source.points.len()
        );
        Ok(source)
    }

    /// Record class of answer files that carry no `#record_class=` header.
    pub fn with_default_record_class(mut self, record_class: &str) -> Self {
        self.default_record_class = record_class.to_string();
        self
    }

    fn read_answer(&self, path: &Path) -> Result<Answer> {
        let reader = get_dynamic_reader(path)?;
        let mut record_class = self.default_record_class.clone();
        let mut records = Vec::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if let Some(class) = line.strip_prefix(RECORD_CLASS_HEADER) {
                record_class = class.trim().to_string();
                continue;
            }
            if is_skipped(&line) {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < ANSWER_MIN_FIELDS {
                return Err(parse_error(
                    path,
                    i,
                    format!("expected at least {} fields", ANSWER_MIN_FIELDS),
                ));
            }
            let weight = fields[2]
                .trim()
                .parse::<i64>()
                .map_err(|_| parse_error(path, i, format!("invalid weight {}", fields[2])))?;
            let gene_source_id = fields
                .get(3)
                .map(|gene| gene.trim())
                .filter(|gene| !gene.is_empty() && *gene != NO_GENE)
                .map(String::from);

            records.push(AnswerRecord {
                source_id: fields[0].trim().to_string(),
                project_id: fields[1].trim().to_string(),
                weight,
                gene_source_id,
            });
        }

        Ok(Answer {
            record_class,
            records,
        })
    }
}

impl FeatureSource for TsvFeatureSource {
    fn answer(&self, reference: &str) -> std::result::Result<Answer, SourceError> {
        let path = PathBuf::from(reference);
        if !path.is_file() {
            return Err(SourceError::NotFound(reference.to_string()));
        }
        Ok(self.read_answer(&path)?)
    }

    fn feature_locations(
        &self,
        feature_source_id: &str,
    ) -> std::result::Result<Vec<FeatureLocation>, SourceError> {
        Ok(self
            .locations
            .get(feature_source_id)
            .cloned()
            .unwrap_or_default())
    }

    fn point_location(
        &self,
        source_id: &str,
    ) -> std::result::Result<Option<PointLocation>, SourceError> {
        Ok(self.points.get(source_id).cloned())
    }
}

fn is_skipped(line: &str) -> bool {
    line.trim().is_empty() || line.starts_with(COMMENT_PREFIX)
}

fn parse_error(path: &Path, index: usize, reason: String) -> SpanIoError {
    SpanIoError::Parse {
        path: path.display().to_string(),
        line: index + 1,
        reason,
    }
}

///
/// Read every data line of a table, requiring `width` tab-separated fields per line.
///
fn read_table<T>(
    path: &Path,
    width: usize,
    parse: fn(&[&str]) -> std::result::Result<T, String>,
) -> Result<Vec<T>> {
    let reader = get_dynamic_reader(path)?;
    let mut rows = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if is_skipped(&line) {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
        if fields.len() < width {
            return Err(parse_error(
                path,
                i,
                format!("expected {} fields, found {}", width, fields.len()),
            ));
        }
        rows.push(parse(&fields).map_err(|reason| parse_error(path, i, reason))?);
    }
    Ok(rows)
}

fn parse_coordinate(value: &str) -> std::result::Result<i64, String> {
    value
        .parse::<i64>()
        .map_err(|_| format!("invalid coordinate {}", value))
}

fn parse_flag(value: &str) -> std::result::Result<bool, String> {
    match value {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(format!("invalid flag {}", value)),
    }
}

fn parse_location(fields: &[&str]) -> std::result::Result<FeatureLocation, String> {
    let is_reversed = match fields[4] {
        "" => None,
        flag => Some(parse_flag(flag)?),
    };
    Ok(FeatureLocation {
        feature_source_id: fields[0].to_string(),
        sequence_source_id: fields[1].to_string(),
        start_min: parse_coordinate(fields[2])?,
        end_max: parse_coordinate(fields[3])?,
        is_reversed,
        is_top_level: parse_flag(fields[5])?,
        feature_type: fields[6].to_string(),
    })
}

fn parse_point(fields: &[&str]) -> std::result::Result<PointLocation, String> {
    Ok(PointLocation {
        source_id: fields[0].to_string(),
        sequence_source_id: fields[1].to_string(),
        location: parse_coordinate(fields[2])?,
    })
}

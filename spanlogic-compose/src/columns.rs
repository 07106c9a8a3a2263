use std::fmt::{self, Display};
use std::str::FromStr;

use crate::aggregate::AggregatedResult;
use crate::consts::{
    COLUMN_FEATURE_REGION, COLUMN_MATCHED_COUNT, COLUMN_MATCHED_REGIONS, COLUMN_MATCHED_RESULT,
    COLUMN_PROJECT_ID, COLUMN_SOURCE_ID, COLUMN_WDK_WEIGHT,
};
use crate::errors::UserError;

/// A column of the composed result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputColumn {
    ProjectId,
    SourceId,
    Weight,
    FeatureRegion,
    MatchedCount,
    MatchedRegions,
    MatchedResult,
}

impl OutputColumn {
    /// Every column, in the default order.
    pub const ALL: [OutputColumn; 7] = [
        OutputColumn::ProjectId,
        OutputColumn::SourceId,
        OutputColumn::Weight,
        OutputColumn::FeatureRegion,
        OutputColumn::MatchedCount,
        OutputColumn::MatchedRegions,
        OutputColumn::MatchedResult,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OutputColumn::ProjectId => COLUMN_PROJECT_ID,
            OutputColumn::SourceId => COLUMN_SOURCE_ID,
            OutputColumn::Weight => COLUMN_WDK_WEIGHT,
            OutputColumn::FeatureRegion => COLUMN_FEATURE_REGION,
            OutputColumn::MatchedCount => COLUMN_MATCHED_COUNT,
            OutputColumn::MatchedRegions => COLUMN_MATCHED_REGIONS,
            OutputColumn::MatchedResult => COLUMN_MATCHED_RESULT,
        }
    }

    /// The value of this column for one result.
    pub fn value(self, result: &AggregatedResult) -> String {
        match self {
            OutputColumn::ProjectId => result.project_id.clone(),
            OutputColumn::SourceId => result.source_id.clone(),
            OutputColumn::Weight => result.weight.to_string(),
            OutputColumn::FeatureRegion => result.region.clone(),
            OutputColumn::MatchedCount => result.matched_count.to_string(),
            OutputColumn::MatchedRegions => result.matched_regions.clone(),
            OutputColumn::MatchedResult => (if result.matched { "Y" } else { "N" }).to_string(),
        }
    }
}

impl FromStr for OutputColumn {
    type Err = UserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputColumn::ALL
            .into_iter()
            .find(|column| column.as_str() == s.trim())
            .ok_or_else(|| UserError::InvalidColumn(s.to_string()))
    }
}

impl Display for OutputColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

///
/// Parse a list of column names, keeping the caller's order.
///
pub fn parse_columns<S: AsRef<str>>(names: &[S]) -> Result<Vec<OutputColumn>, UserError> {
    names.iter().map(|name| name.as_ref().parse()).collect()
}

/// Lay out one result in the given column order.
pub fn make_row(columns: &[OutputColumn], result: &AggregatedResult) -> Vec<String> {
    columns.iter().map(|column| column.value(result)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn result() -> AggregatedResult {
        AggregatedResult {
            source_id: "PF3D7_0100100".to_string(),
            project_id: "PlasmoDB".to_string(),
            region: "100 - 200 (+)".to_string(),
            weight: 10,
            matched_count: 1,
            matched_regions: "B1: 150 - 160 (+)".to_string(),
            matched: true,
        }
    }

    #[rstest]
    #[case("project_id", OutputColumn::ProjectId)]
    #[case("wdk_weight", OutputColumn::Weight)]
    #[case(" matched_result ", OutputColumn::MatchedResult)]
    fn test_parse_column(#[case] name: &str, #[case] expected: OutputColumn) {
        assert_eq!(name.parse::<OutputColumn>().unwrap(), expected);
    }

    #[rstest]
    fn test_unknown_column() {
        let err = parse_columns(&["source_id", "score"]).unwrap_err();
        assert!(matches!(err, UserError::InvalidColumn(name) if name == "score"));
    }

    #[rstest]
    fn test_row_follows_requested_order(result: AggregatedResult) {
        let columns = parse_columns(&["matched_result", "source_id", "matched_count"]).unwrap();
        assert_eq!(
            make_row(&columns, &result),
            vec!["Y", "PF3D7_0100100", "1"]
        );
    }

    #[rstest]
    fn test_default_order_row(mut result: AggregatedResult) {
        result.matched = false;
        assert_eq!(
            make_row(&OutputColumn::ALL, &result),
            vec![
                "PlasmoDB",
                "PF3D7_0100100",
                "10",
                "100 - 200 (+)",
                "1",
                "B1: 150 - 160 (+)",
                "N"
            ]
        );
    }
}

// request parameters
pub const PARAM_OPERATION: &str = "span_operation";
pub const PARAM_STRAND: &str = "span_strand";
pub const PARAM_OUTPUT: &str = "span_output";
pub const PARAM_SPAN_PREFIX: &str = "span_";
pub const PARAM_BEGIN_PREFIX: &str = "span_begin_";
pub const PARAM_BEGIN_DIRECTION_PREFIX: &str = "span_begin_direction_";
pub const PARAM_BEGIN_OFFSET_PREFIX: &str = "span_begin_offset_";
pub const PARAM_END_PREFIX: &str = "span_end_";
pub const PARAM_END_DIRECTION_PREFIX: &str = "span_end_direction_";
pub const PARAM_END_OFFSET_PREFIX: &str = "span_end_offset_";

// short spellings accepted for the three request-wide parameters
pub const ALIAS_OPERATION: &str = "operation";
pub const ALIAS_STRAND: &str = "strand";
pub const ALIAS_OUTPUT: &str = "output";

// output columns
pub const COLUMN_PROJECT_ID: &str = "project_id";
pub const COLUMN_SOURCE_ID: &str = "source_id";
pub const COLUMN_WDK_WEIGHT: &str = "wdk_weight";
pub const COLUMN_FEATURE_REGION: &str = "feature_region";
pub const COLUMN_MATCHED_COUNT: &str = "matched_count";
pub const COLUMN_MATCHED_REGIONS: &str = "matched_regions";
pub const COLUMN_MATCHED_RESULT: &str = "matched_result";

// staging
pub const DEFAULT_NAME_PREFIX: &str = "spanlogic";
pub const MAX_NAME_ATTEMPTS: usize = 16;

// aggregation
pub const MAX_MATCHED_REGIONS_LEN: usize = 4000;
pub const MATCHED_REGIONS_SEPARATOR: &str = "; ";

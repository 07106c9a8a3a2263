/// Header line of an answer file naming its record class.
pub const RECORD_CLASS_HEADER: &str = "#record_class=";
/// Record class of answer files without a header.
pub const DEFAULT_RECORD_CLASS: &str = "GeneRecordClasses.GeneRecordClass";
pub const COMMENT_PREFIX: char = '#';
pub const NO_GENE: &str = "none";

pub const ANSWER_MIN_FIELDS: usize = 3;
pub const LOCATION_FIELDS: usize = 7;
pub const POINT_FIELDS: usize = 3;

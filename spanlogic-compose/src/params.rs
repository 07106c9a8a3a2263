//! Parsing and validation of the string-keyed request parameters.
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::str::FromStr;

use crate::anchor::{Anchor, AnchorSpec, Direction};
use crate::consts::*;
use crate::errors::UserError;
use crate::evaluate::{Relation, StrandFilter};

/// One of the two input feature collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// Parameter key suffix for this side.
    pub fn suffix(self) -> &'static str {
        match self {
            Side::A => "a",
            Side::B => "b",
        }
    }

    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "a" => Ok(Side::A),
            "b" => Ok(Side::B),
            _ => Err(format!("Invalid side: {}", s)),
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.suffix())
    }
}

///
/// A fully validated span composition request.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanParams {
    pub relation: Relation,
    pub strand: StrandFilter,
    pub output: Side,
    pub span_a: String,
    pub span_b: String,
    pub anchors_a: AnchorSpec,
    pub anchors_b: AnchorSpec,
}

impl SpanParams {
    ///
    /// Validate and parse request parameters.
    ///
    /// Every side is validated under its own keys; defaults are applied for absent optional
    /// parameters.
    ///
    /// # Arguments
    /// - params: the raw request parameters
    ///
    /// # Returns
    /// - the parsed request, or a `UserError` naming the offending parameter and value
    pub fn parse(params: &HashMap<String, String>) -> Result<Self, UserError> {
        let relation = match lookup(params, PARAM_OPERATION, Some(ALIAS_OPERATION)) {
            Some(value) => parse_choice(PARAM_OPERATION, value)?,
            None => return Err(UserError::MissingParameter(PARAM_OPERATION.to_string())),
        };
        let strand = match lookup(params, PARAM_STRAND, Some(ALIAS_STRAND)) {
            Some(value) => parse_choice(PARAM_STRAND, value)?,
            None => StrandFilter::Both,
        };
        let output = match lookup(params, PARAM_OUTPUT, Some(ALIAS_OUTPUT)) {
            Some(value) => parse_choice(PARAM_OUTPUT, value)?,
            None => Side::A,
        };

        Ok(SpanParams {
            relation,
            strand,
            output,
            span_a: required_reference(params, Side::A)?,
            span_b: required_reference(params, Side::B)?,
            anchors_a: parse_anchor_spec(params, Side::A)?,
            anchors_b: parse_anchor_spec(params, Side::B)?,
        })
    }

    pub fn reference(&self, side: Side) -> &str {
        match side {
            Side::A => &self.span_a,
            Side::B => &self.span_b,
        }
    }

    pub fn anchors(&self, side: Side) -> &AnchorSpec {
        match side {
            Side::A => &self.anchors_a,
            Side::B => &self.anchors_b,
        }
    }
}

/// Parameters every request must carry.
pub fn required_parameter_names() -> Vec<String> {
    vec![
        PARAM_OPERATION.to_string(),
        format!("{}{}", PARAM_SPAN_PREFIX, Side::A.suffix()),
        format!("{}{}", PARAM_SPAN_PREFIX, Side::B.suffix()),
    ]
}

fn lookup<'p>(
    params: &'p HashMap<String, String>,
    key: &str,
    alias: Option<&str>,
) -> Option<&'p str> {
    params
        .get(key)
        .or_else(|| alias.and_then(|alias| params.get(alias)))
        .map(|value| value.as_str())
}

fn parse_choice<T: FromStr>(name: &str, value: &str) -> Result<T, UserError> {
    value.trim().parse::<T>().map_err(|_| UserError::InvalidParameter {
        name: name.to_string(),
        value: value.to_string(),
    })
}

fn parse_offset(name: &str, value: &str) -> Result<i64, UserError> {
    value
        .trim()
        .parse::<u32>()
        .map(i64::from)
        .map_err(|_| UserError::InvalidOffset {
            name: name.to_string(),
            value: value.to_string(),
        })
}

fn required_reference(params: &HashMap<String, String>, side: Side) -> Result<String, UserError> {
    let key = format!("{}{}", PARAM_SPAN_PREFIX, side.suffix());
    match params.get(&key) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(UserError::MissingParameter(key)),
    }
}

fn parse_anchor_spec(params: &HashMap<String, String>, side: Side) -> Result<AnchorSpec, UserError> {
    let key = |prefix: &str| format!("{}{}", prefix, side.suffix());
    let defaults = AnchorSpec::default();

    let anchor = |prefix: &str, default: Anchor| -> Result<Anchor, UserError> {
        let name = key(prefix);
        params
            .get(&name)
            .map_or(Ok(default), |value| parse_choice(&name, value))
    };
    let direction = |prefix: &str, default: Direction| -> Result<Direction, UserError> {
        let name = key(prefix);
        params
            .get(&name)
            .map_or(Ok(default), |value| parse_choice(&name, value))
    };
    let offset = |prefix: &str| -> Result<i64, UserError> {
        let name = key(prefix);
        params.get(&name).map_or(Ok(0), |value| parse_offset(&name, value))
    };

    Ok(AnchorSpec {
        begin_anchor: anchor(PARAM_BEGIN_PREFIX, defaults.begin_anchor)?,
        begin_direction: direction(PARAM_BEGIN_DIRECTION_PREFIX, defaults.begin_direction)?,
        begin_offset: offset(PARAM_BEGIN_OFFSET_PREFIX)?,
        end_anchor: anchor(PARAM_END_PREFIX, defaults.end_anchor)?,
        end_direction: direction(PARAM_END_DIRECTION_PREFIX, defaults.end_direction)?,
        end_offset: offset(PARAM_END_OFFSET_PREFIX)?,
    })
}

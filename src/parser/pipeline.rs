// Pipeline parser: one or more views separated by "|"

use super::ast::ViewState;
use super::lexer::ws;
use super::view::parse_view;
use crate::error::{DashboardError, Result};
use nom::{
    bytes::complete::tag,
    combinator::eof,
    multi::separated_list1,
    IResult,
};

/// Parse a complete view selection
/// Format: view | view | ...
pub fn parse_view_list(input: &str) -> IResult<&str, Vec<ViewState>> {
    let (input, views) = separated_list1(ws(tag("|")), parse_view)(input)?;

    // Consume trailing whitespace and ensure end of input
    let (input, _) = ws(eof)(input)?;

    Ok((input, views))
}

pub fn parse_views(input: &str) -> Result<Vec<ViewState>> {
    parse_view_list(input)
        .map(|(_, views)| views)
        .map_err(|e| DashboardError::Parse(e.to_string()))
}

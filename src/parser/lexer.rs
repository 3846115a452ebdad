// Token-level parsers shared by the view DSL

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::multispace0,
    combinator::{value, verify},
    number::complete::double,
    sequence::delimited,
    IResult,
};

/// Wrap a parser so it skips surrounding whitespace
pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

pub fn number_literal(input: &str) -> IResult<&str, f64> {
    double(input)
}

/// A canvas size or radius: finite and not negative
pub fn size_literal(input: &str) -> IResult<&str, f64> {
    verify(number_literal, |v: &f64| v.is_finite() && *v >= 0.0)(input)
}

pub fn bool_literal(input: &str) -> IResult<&str, bool> {
    alt((value(true, tag("true")), value(false, tag("false"))))(input)
}

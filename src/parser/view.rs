// Per-chart view parsers

use super::ast::{QualityBarsView, StressLinesView, SunburstView, TreemapView, ViewState};
use super::lexer::{bool_literal, size_literal, ws};
use crate::series::SeriesMode;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, u64 as u64_literal},
    combinator::{map, value},
    multi::separated_list0,
    sequence::preceded,
    IResult,
};

/// Parse a quality chart view
/// Format: quality_bars() or quality_bars(show_line: false)
pub fn parse_quality_bars(input: &str) -> IResult<&str, ViewState> {
    let (input, _) = ws(tag("quality_bars"))(input)?;
    let (input, _) = ws(char('('))(input)?;

    let (input, args) = separated_list0(
        ws(char(',')),
        preceded(ws(tag("show_line:")), ws(bool_literal)),
    )(input)?;

    let (input, _) = ws(char(')'))(input)?;

    let mut view = QualityBarsView::default();
    if let Some(show_line) = args.last() {
        view.show_line = *show_line;
    }

    Ok((input, ViewState::QualityBars(view)))
}

fn series_mode(input: &str) -> IResult<&str, SeriesMode> {
    alt((
        value(SeriesMode::Compare, tag("compare")),
        value(SeriesMode::Aggregate, tag("aggregate")),
    ))(input)
}

/// Parse a stress chart view
/// Format: stress_lines() or stress_lines(mode: aggregate)
pub fn parse_stress_lines(input: &str) -> IResult<&str, ViewState> {
    let (input, _) = ws(tag("stress_lines"))(input)?;
    let (input, _) = ws(char('('))(input)?;

    let (input, args) = separated_list0(
        ws(char(',')),
        preceded(ws(tag("mode:")), ws(series_mode)),
    )(input)?;

    let (input, _) = ws(char(')'))(input)?;

    let mut view = StressLinesView::default();
    if let Some(mode) = args.last() {
        view.mode = *mode;
    }

    Ok((input, ViewState::StressLines(view)))
}

enum TreemapArg {
    MinSample(usize),
    Width(f64),
    Height(f64),
}

/// Parse an occupation treemap view
/// Format: occupation_treemap() or occupation_treemap(min_sample: 5, width: 900, height: 520)
pub fn parse_occupation_treemap(input: &str) -> IResult<&str, ViewState> {
    let (input, _) = ws(tag("occupation_treemap"))(input)?;
    let (input, _) = ws(char('('))(input)?;

    let (input, args) = separated_list0(
        ws(char(',')),
        alt((
            map(
                preceded(ws(tag("min_sample:")), ws(u64_literal)),
                |n| TreemapArg::MinSample(n as usize),
            ),
            map(
                preceded(ws(tag("width:")), ws(size_literal)),
                TreemapArg::Width,
            ),
            map(
                preceded(ws(tag("height:")), ws(size_literal)),
                TreemapArg::Height,
            ),
        )),
    )(input)?;

    let (input, _) = ws(char(')'))(input)?;

    let mut view = TreemapView::default();
    for arg in args {
        match arg {
            TreemapArg::MinSample(n) => view.min_sample = n,
            TreemapArg::Width(w) => view.width = Some(w),
            TreemapArg::Height(h) => view.height = Some(h),
        }
    }

    Ok((input, ViewState::OccupationTreemap(view)))
}

/// Parse a BMI sunburst view
/// Format: bmi_sunburst() or bmi_sunburst(radius: 250)
pub fn parse_bmi_sunburst(input: &str) -> IResult<&str, ViewState> {
    let (input, _) = ws(tag("bmi_sunburst"))(input)?;
    let (input, _) = ws(char('('))(input)?;

    let (input, args) = separated_list0(
        ws(char(',')),
        preceded(ws(tag("radius:")), ws(size_literal)),
    )(input)?;

    let (input, _) = ws(char(')'))(input)?;

    let view = SunburstView {
        radius: args.last().copied(),
    };

    Ok((input, ViewState::BmiSunburst(view)))
}

/// Parse any view
pub fn parse_view(input: &str) -> IResult<&str, ViewState> {
    alt((
        parse_quality_bars,
        parse_stress_lines,
        parse_occupation_treemap,
        parse_bmi_sunburst,
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quality_bars_default() {
        let (_, view) = parse_quality_bars("quality_bars()").unwrap();
        assert_eq!(view, ViewState::QualityBars(QualityBarsView { show_line: true }));
    }

    #[test]
    fn test_parse_quality_bars_hide_line() {
        let (_, view) = parse_quality_bars("quality_bars( show_line: false )").unwrap();
        assert_eq!(view, ViewState::QualityBars(QualityBarsView { show_line: false }));
    }

    #[test]
    fn test_parse_stress_lines_mode() {
        let (_, view) = parse_stress_lines("stress_lines(mode: aggregate)").unwrap();
        match view {
            ViewState::StressLines(v) => assert_eq!(v.mode, SeriesMode::Aggregate),
            _ => panic!("Expected StressLines view"),
        }
        assert!(parse_stress_lines("stress_lines(mode: sideways)").is_err());
    }

    #[test]
    fn test_parse_treemap_args() {
        let (_, view) = parse_occupation_treemap("occupation_treemap(min_sample: 5, width: 640.5)").unwrap();
        match view {
            ViewState::OccupationTreemap(v) => {
                assert_eq!(v.min_sample, 5);
                assert_eq!(v.width, Some(640.5));
                assert_eq!(v.height, None);
            }
            _ => panic!("Expected OccupationTreemap view"),
        }
    }

    #[test]
    fn test_parse_treemap_rejects_fractional_min_sample() {
        assert!(parse_occupation_treemap("occupation_treemap(min_sample: 2.5)").is_err());
    }

    #[test]
    fn test_parse_sunburst() {
        let (_, view) = parse_bmi_sunburst("bmi_sunburst(radius: 120)").unwrap();
        assert_eq!(view, ViewState::BmiSunburst(SunburstView { radius: Some(120.0) }));
    }

    #[test]
    fn test_parse_sizes_must_be_finite_and_non_negative() {
        assert!(parse_bmi_sunburst("bmi_sunburst(radius: inf)").is_err());
        assert!(parse_bmi_sunburst("bmi_sunburst(radius: -40)").is_err());
        assert!(parse_bmi_sunburst("bmi_sunburst(radius: NaN)").is_err());
        assert!(parse_occupation_treemap("occupation_treemap(width: inf)").is_err());
        assert!(parse_occupation_treemap("occupation_treemap(height: -1)").is_err());

        let (_, view) = parse_bmi_sunburst("bmi_sunburst(radius: 0)").unwrap();
        assert_eq!(view, ViewState::BmiSunburst(SunburstView { radius: Some(0.0) }));
    }

    #[test]
    fn test_parse_view_dispatch() {
        assert!(matches!(parse_view("bmi_sunburst()"), Ok((_, ViewState::BmiSunburst(_)))));
        assert!(parse_view("pie_chart()").is_err());
    }
}

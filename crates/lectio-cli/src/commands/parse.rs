//! `lectio parse`: run the citation grammar without loading any text.

use serde::Serialize;

use lectio_core::domain::{
    ComplexReference, NormalizedRange, ReferenceStyle, SubRange, format_complex_reference,
    format_reference, normalize_range_order, parse_complex_reference, parse_reference,
};
use lectio_core::error::LectioError;

use crate::{cli::ParseArgs, error::CliResult, output::OutputManager};

/// A citation and its canonical rendering; exactly one of `range` and
/// `complex` is set.
#[derive(Debug, Serialize)]
struct Parsed {
    canonical: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    range: Option<NormalizedRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    complex: Option<ComplexReference>,
}

pub fn execute(args: ParseArgs, output: OutputManager) -> CliResult<()> {
    let parsed = parse(&args.reference, args.normalize, args.style.into())?;

    if output.is_json() {
        output.json(&parsed)?;
        return Ok(());
    }

    output.result(&parsed.canonical)?;
    Ok(())
}

fn parse(input: &str, normalize: bool, style: ReferenceStyle) -> Result<Parsed, LectioError> {
    if let Some(mut reference) = parse_complex_reference(input) {
        if normalize {
            reference.ranges = reference.ranges.iter().map(ordered).collect();
        }
        return Ok(Parsed {
            canonical: format_complex_reference(&reference, style),
            range: None,
            complex: Some(reference),
        });
    }

    let mut range = parse_reference(input)?;
    if normalize {
        range = normalize_range_order(range);
    }
    Ok(Parsed {
        canonical: format_reference(&range, style),
        range: Some(range),
        complex: None,
    })
}

fn ordered(sub: &SubRange) -> SubRange {
    if (sub.start_chapter, sub.start_verse) <= (sub.end_chapter, sub.end_verse) {
        *sub
    } else {
        SubRange::new(sub.end_chapter, sub.end_verse, sub.start_chapter, sub.start_verse)
    }
}

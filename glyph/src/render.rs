//! Prompt layout

use crate::InfoLocation;

/// Join the non-blank segments with `separator`.
pub fn join_info<I>(segments: I, separator: &str) -> String
where
    I: IntoIterator<Item = String>,
{
    segments
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Place `info` relative to `glyph`.
///
/// | location | output |
/// |----------|--------|
/// | suppressed, or empty info | `"{glyph} "` |
/// | inline | `" {info} {glyph} "` |
/// | above | `" {info}\n {glyph} "` |
pub fn layout(location: InfoLocation, glyph: &str, info: &str) -> String {
    if info.is_empty() {
        return format!("{glyph} ");
    }
    match location {
        InfoLocation::Suppressed => format!("{glyph} "),
        InfoLocation::Inline => format!(" {info} {glyph} "),
        InfoLocation::Above => format!(" {info}\n {glyph} "),
    }
}

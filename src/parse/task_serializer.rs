use crate::model::task::ParsedLine;

/// Serialize parsed lines back into a document.
///
/// Lines are emitted verbatim from their source text, so an unmodified parse
/// round-trips byte for byte.
pub fn serialize_document(lines: &[ParsedLine]) -> String {
    lines
        .iter()
        .map(ParsedLine::raw_text)
        .collect::<Vec<_>>()
        .join("\n")
}

//! Source-annotated rendering of parse errors.

use ariadne::{Config, Label, Report, ReportKind, Source};

use crate::ParseError;

const SOURCE_ID: &str = "<program>";

/// Render a parse error as an annotated snippet of `source`.
///
/// Colors are disabled so the output is stable across terminals.
pub fn render_parse_error(err: &ParseError, source: &str) -> String {
    // ariadne counts in chars, the parser in bytes.
    let to_chars = |byte: usize| {
        source
            .char_indices()
            .take_while(|(i, _)| *i < byte)
            .count()
    };
    let total = source.chars().count();

    let mut builder = Report::build(ReportKind::Error, SOURCE_ID, 0)
        .with_config(Config::default().with_color(false))
        .with_message(&err.message);

    if total > 0 {
        let start = to_chars(err.offset).min(total - 1);
        let end = to_chars(err.offset + err.len).clamp(start + 1, total);
        builder = builder.with_label(Label::new((SOURCE_ID, start..end)).with_message("here"));
    }

    let mut out = Vec::new();
    if builder
        .finish()
        .write((SOURCE_ID, Source::from(source)), &mut out)
        .is_err()
    {
        return err.message.clone();
    }
    String::from_utf8_lossy(&out).into_owned()
}

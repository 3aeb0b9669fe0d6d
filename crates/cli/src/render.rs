//! Terminal and JSON output for diagnostics.
//!
//! Findings with a span become ariadne reports on stderr, underlining the
//! offending bytes of the logical command; spanless findings print as plain
//! lines. JSON mode serializes the findings array to stdout instead, for
//! editor and CI consumers.

use std::io::{self, IsTerminal};

use ariadne::{Color, Config, Fmt, Label, Report, ReportKind, Source};
use cl_toolchain_diagnostics::{Diagnostic, Severity, Span};

/// How command output is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Coloured, source-annotated terminal output.
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Pick a format from the `--output` flag, falling back to pretty on an
    /// interactive terminal and JSON when stdout is piped.
    pub(crate) fn resolve_or_detect(flag: Option<&str>) -> Self {
        match flag {
            Some("pretty") => Format::Pretty,
            Some("json") => Format::Json,
            _ if io::stdout().is_terminal() => Format::Pretty,
            _ => Format::Json,
        }
    }
}

/// ariadne report kind and highlight colour for a severity.
///
/// `Severity` is non-exhaustive; anything new renders as a warning until
/// this mapping learns about it.
fn style(severity: Severity) -> (ReportKind<'static>, Color) {
    match severity {
        Severity::Error => (ReportKind::Error, Color::Red),
        Severity::Info => (ReportKind::Advice, Color::Blue),
        _ => (ReportKind::Warning, Color::Yellow),
    }
}

/// Render `diagnostics` against the logical command text they refer to.
///
/// Pretty output goes to stderr so stdout stays free for command payloads;
/// JSON goes to stdout as one array.
pub(crate) fn render_diagnostics(
    source: &str,
    filename: &str,
    diagnostics: &[Diagnostic],
    format: Format,
) {
    if diagnostics.is_empty() {
        return;
    }
    match format {
        Format::Json => {
            match serde_json::to_string_pretty(diagnostics) {
                Ok(json) => println!("{json}"),
                Err(err) => eprintln!("diagnostic serialization failed: {err}"),
            }
        }
        Format::Pretty => {
            let mut cache = (filename, Source::from(source));
            for diag in diagnostics {
                match diag.span {
                    Some(span) => eprint_report(source, filename, diag, span, &mut cache),
                    None => eprint_plain(diag),
                }
            }
        }
    }
}

fn eprint_report<'a>(
    source: &str,
    filename: &'a str,
    diag: &Diagnostic,
    span: Span,
    cache: &mut (&'a str, Source<&'a str>),
) {
    // Truncated input must not push the underline past the source.
    let start = span.start.min(source.len());
    let end = span.end.clamp(start, source.len());
    let (kind, color) = style(diag.severity);

    let mut report = Report::build(kind, (filename, start..end))
        .with_code(diag.id.as_ref())
        .with_message(&diag.message)
        .with_config(Config::default().with_compact(false))
        .with_label(
            Label::new((filename, start..end))
                .with_message(&diag.message)
                .with_color(color),
        );
    if let Some(ctx) = &diag.context {
        report = report.with_note(
            ctx.iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(", "),
        );
    }
    if let Some(help) = diag.explain() {
        report = report.with_help(help);
    }
    report.finish().eprint(cache).ok();
}

fn eprint_plain(diag: &Diagnostic) {
    eprintln!("{diag}");
    if let Some(help) = diag.explain() {
        eprintln!("  = help: {help}");
    }
}

/// One-line coloured count of findings by severity, e.g. `1 error, 2 warnings`.
/// Prints nothing when there is nothing to count.
pub(crate) fn print_summary(diagnostics: &[Diagnostic]) {
    let mut counts = [0usize; 3];
    for d in diagnostics {
        let slot = match d.severity {
            Severity::Error => 0,
            Severity::Info => 2,
            _ => 1,
        };
        counts[slot] += 1;
    }

    let mut parts = Vec::new();
    for (count, noun, color) in [
        (counts[0], "error", Color::Red),
        (counts[1], "warning", Color::Yellow),
        (counts[2], "info", Color::Blue),
    ] {
        if count == 0 {
            continue;
        }
        let plural = if count != 1 && noun != "info" { "s" } else { "" };
        parts.push(format!("{}", format!("{count} {noun}{plural}").fg(color)));
    }
    if !parts.is_empty() {
        eprintln!("{}", parts.join(", "));
    }
}

mod records;
mod render;

use std::fs;
use std::io::Read;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cl_toolchain_core::grammar::parser::{ParseError, parse_command};
use cl_toolchain_core::grammar::source::extract_label;
use cl_toolchain_core::layout::{LayoutConfig, reflow};
use cl_toolchain_diagnostics::{self as diag, Diagnostic, Span, codes};

use crate::records::{Record, join_records};
use crate::render::{Format, print_summary, render_diagnostics};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "clfmt",
    version,
    about = "CL toolchain — parse, check, and reflow-format IBM i CL command source"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Parse a CL source file and print the command ASTs.
    Parse {
        /// Source file, or `-` for stdin.
        file: String,
    },

    /// Syntax-check a CL source file (exit 1 on any error).
    Check {
        /// Source file, or `-` for stdin.
        file: String,
    },

    /// Reflow a CL source file to fixed column positions.
    Format {
        /// Source file, or `-` for stdin.
        file: String,
        /// Maximum line length.
        #[arg(long, default_value_t = 80)]
        right_margin: usize,
        /// Column where the command name starts.
        #[arg(long, default_value_t = 0)]
        left_margin: usize,
        /// Column where the first parameter starts (0 = one blank after the
        /// command name).
        #[arg(long, default_value_t = 0)]
        kwd_position: usize,
        /// Column where continuation lines resume.
        #[arg(long, default_value_t = 13)]
        indent: usize,
        /// Column where a leading label starts.
        #[arg(long, default_value_t = 0)]
        label_position: usize,
        /// Write formatted output back to the file (in-place).
        #[arg(long, short, conflicts_with = "check")]
        write: bool,
        /// Check if the file is already formatted (exit 1 if not). For CI.
        #[arg(long, conflicts_with = "write")]
        check: bool,
    },

    /// Explain a diagnostic ID (e.g. CL1101).
    Explain { id: String },
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let format = Format::resolve_or_detect(cli.output.as_deref());

    match cli.cmd {
        Cmd::Parse { file } => cmd_parse(&file, format)?,
        Cmd::Check { file } => cmd_check(&file, format)?,
        Cmd::Format {
            file,
            right_margin,
            left_margin,
            kwd_position,
            indent,
            label_position,
            write,
            check,
        } => {
            let layout = LayoutConfig {
                left_margin,
                right_margin,
                kwd_position,
                cont_indent: indent,
                label_position,
                continuation_char: '+',
            };
            cmd_format(&file, &layout, write, check, format)?;
        }
        Cmd::Explain { id } => cmd_explain(&id, format)?,
    }

    Ok(())
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_parse(file: &str, format: Format) -> Result<()> {
    let input = read_input(file)?;
    let mut had_errors = false;
    let mut entries = Vec::new();

    for record in active_records(&input) {
        match parse_command(&record.text) {
            Ok(res) => {
                had_errors |= has_errors(&res.diagnostics);
                if format == Format::Pretty {
                    println!("{}", cl_toolchain_core::to_pretty_json(&res.node));
                    render_record_diagnostics(&record, file, &res.diagnostics, format);
                } else {
                    entries.push(serde_json::json!({
                        "line": record.line,
                        "ast": res.node,
                        "diagnostics": res.diagnostics,
                    }));
                }
            }
            Err(err) => {
                had_errors = true;
                let d = fatal_diagnostic(&err);
                if format == Format::Pretty {
                    render_record_diagnostics(&record, file, std::slice::from_ref(&d), format);
                } else {
                    entries.push(serde_json::json!({
                        "line": record.line,
                        "diagnostics": [d],
                    }));
                }
            }
        }
    }

    if format == Format::Json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    }
    if had_errors {
        process::exit(1);
    }
    Ok(())
}

fn cmd_check(file: &str, format: Format) -> Result<()> {
    let input = read_input(file)?;
    let mut all: Vec<Diagnostic> = Vec::new();
    let mut entries = Vec::new();

    for record in active_records(&input) {
        let diags = match parse_command(&record.text) {
            Ok(res) => res.diagnostics,
            Err(err) => vec![fatal_diagnostic(&err)],
        };
        if diags.is_empty() {
            continue;
        }
        match format {
            Format::Pretty => render_record_diagnostics(&record, file, &diags, format),
            Format::Json => entries.push(serde_json::json!({
                "line": record.line,
                "diagnostics": diags,
            })),
        }
        all.extend(diags);
    }

    let ok = !has_errors(&all);
    match format {
        Format::Json => {
            let out = serde_json::json!({ "ok": ok, "records": entries });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            print_summary(&all);
            if ok {
                eprintln!("syntax ok");
            }
        }
    }

    if !ok {
        process::exit(1);
    }
    Ok(())
}

fn cmd_format(
    file: &str,
    layout: &LayoutConfig,
    write: bool,
    check: bool,
    format: Format,
) -> Result<()> {
    let input = read_input(file)?;
    let mut out_lines: Vec<String> = Vec::new();

    for record in join_records(&input, layout.continuation_char) {
        if is_passthrough(&record) {
            out_lines.push(record.raw.clone());
            continue;
        }
        // Stdout carries the formatted text, so diagnostics always render
        // in pretty form on stderr here.
        match parse_command(&record.text) {
            Ok(res) => {
                if !res.diagnostics.is_empty() {
                    render_record_diagnostics(&record, file, &res.diagnostics, Format::Pretty);
                }
                let (label, _) = extract_label(&record.text);
                out_lines.push(reflow(&res.node, label.as_deref(), layout));
            }
            Err(err) => {
                // A record that does not parse is left exactly as written.
                render_record_diagnostics(
                    &record,
                    file,
                    std::slice::from_ref(&fatal_diagnostic(&err)),
                    Format::Pretty,
                );
                out_lines.push(record.raw.clone());
            }
        }
    }

    let mut formatted = out_lines.join("\n");
    formatted.push('\n');
    let unchanged = formatted == input;

    if check {
        report_status(
            format,
            if unchanged { "already formatted" } else { "not formatted" },
            file,
        );
        if !unchanged {
            process::exit(1);
        }
    } else if write {
        if file == "-" {
            anyhow::bail!("--write requires a file path, not stdin");
        }
        if !unchanged {
            fs::write(file, &formatted)
                .with_context(|| format!("failed to write '{file}'"))?;
        }
        report_status(
            format,
            if unchanged { "already formatted" } else { "formatted" },
            file,
        );
    } else {
        print!("{formatted}");
    }

    Ok(())
}

fn cmd_explain(id: &str, format: Format) -> Result<()> {
    let explanation = diag::explain(id);
    if format == Format::Json {
        let out = serde_json::json!({ "id": id, "explanation": explanation });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    match explanation {
        Some(text) => {
            use ariadne::Fmt;
            println!("{}", id.fg(ariadne::Color::Cyan));
            println!("  {text}");
        }
        None => println!("{id}: no explanation available"),
    }
    Ok(())
}

/// One status line for `format --check` / `format --write`.
fn report_status(format: Format, status: &str, file: &str) {
    if format == Format::Json {
        println!("{}", serde_json::json!({ "status": status, "file": file }));
    } else {
        eprintln!("{status}: {file}");
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn read_input(file: &str) -> Result<String> {
    if file == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        Ok(buf)
    } else {
        fs::read_to_string(file).with_context(|| format!("failed to read '{file}'"))
    }
}

/// Records that carry a command to parse (blank and comment-only records
/// are layout, not commands).
fn active_records(input: &str) -> impl Iterator<Item = Record> {
    join_records(input, '+')
        .into_iter()
        .filter(|r| !is_passthrough(r))
}

/// Blank lines and comment-only records pass through parsing untouched.
fn is_passthrough(record: &Record) -> bool {
    let trimmed = record.text.trim();
    trimmed.is_empty() || trimmed.starts_with("/*")
}

fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(|d| d.severity.is_error())
}

fn render_record_diagnostics(
    record: &Record,
    file: &str,
    diagnostics: &[Diagnostic],
    format: Format,
) {
    let label = format!("{file}:{}", record.line);
    render_diagnostics(&record.text, &label, diagnostics, format);
}

/// Convert a fatal [`ParseError`] into a renderable diagnostic.
fn fatal_diagnostic(err: &ParseError) -> Diagnostic {
    match err {
        ParseError::UnterminatedString { pos } => Diagnostic::error(
            codes::LEX_UNTERMINATED_STRING,
            err.to_string(),
            Some(Span::new(*pos, *pos + 1)),
        ),
        ParseError::MissingCommand => {
            Diagnostic::error(codes::PARSER_MISSING_COMMAND, err.to_string(), None)
        }
        ParseError::UnbalancedParens { pos } => Diagnostic::error(
            codes::PARSER_UNBALANCED_PARENS,
            err.to_string(),
            Some(Span::new(*pos, *pos + 1)),
        ),
    }
}

//! Round-trip tests for the decompose → edit → reassemble pipeline.
//!
//! Gold-standard guarantee: decomposing a command against its schema and
//! reassembling the untouched values reproduces an equivalent command
//! string, with defaults suppressed and QUAL names restored to
//! `library/object` order.

mod common;

use std::collections::HashSet;

use common::{def, diag_codes, elem, qual, typed};
use cl_toolchain_core::compose::decompose::decompose_command;
use cl_toolchain_core::compose::reassemble::reassemble;
use cl_toolchain_core::grammar::ast::Value;
use cl_toolchain_core::grammar::parser::parse_command;
use cl_toolchain_diagnostics::codes;
use cl_toolchain_schema::{CommandDef, DataType, ParamDef};

fn roundtrip(input: &str, schema: &CommandDef) -> String {
    let parsed = parse_command(input).unwrap();
    let decomposed = decompose_command(&parsed.node, schema);
    assert!(
        decomposed.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        decomposed.diagnostics
    );
    reassemble(
        &parsed.node.name,
        &decomposed.values,
        schema,
        &HashSet::new(),
    )
}

fn crtpf_def() -> CommandDef {
    def(
        "CRTPF",
        vec![
            qual("FILE", 2),
            typed("RCDLEN", DataType::Dec),
            ParamDef {
                default: Some("*BLANK".into()),
                ..typed("TEXT", DataType::Char)
            },
            ParamDef {
                allowed: vec!["*ALL".into(), "*USE".into(), "*EXCLUDE".into()],
                default: Some("*LIBCRTAUT".into()),
                ..typed("AUT", DataType::Char)
            },
        ],
    )
}

// ─── Basic round-trips ───────────────────────────────────────────────────────

#[test]
fn qualified_name_round_trips() {
    let out = roundtrip("CRTPF FILE(QGPL/MYFILE) RCDLEN(80)", &crtpf_def());
    assert_eq!(out, "CRTPF FILE(QGPL/MYFILE) RCDLEN(80)");
}

#[test]
fn unqualified_name_round_trips_without_slash() {
    let out = roundtrip("CRTPF FILE(MYFILE) RCDLEN(80)", &crtpf_def());
    assert_eq!(out, "CRTPF FILE(MYFILE) RCDLEN(80)");
}

#[test]
fn quoted_text_round_trips() {
    let out = roundtrip(
        "CRTPF FILE(QGPL/MYFILE) RCDLEN(80) TEXT('My master file')",
        &crtpf_def(),
    );
    assert_eq!(
        out,
        "CRTPF FILE(QGPL/MYFILE) RCDLEN(80) TEXT('My master file')"
    );
}

#[test]
fn untouched_default_suppressed() {
    let out = roundtrip(
        "CRTPF FILE(QGPL/MYFILE) RCDLEN(80) AUT(*LIBCRTAUT)",
        &crtpf_def(),
    );
    assert_eq!(out, "CRTPF FILE(QGPL/MYFILE) RCDLEN(80)");
}

#[test]
fn touched_default_kept() {
    let parsed = parse_command("CRTPF FILE(QGPL/MYFILE) AUT(*LIBCRTAUT)").unwrap();
    let schema = crtpf_def();
    let decomposed = decompose_command(&parsed.node, &schema);
    let touched: HashSet<String> = ["AUT".to_string()].into();
    let out = reassemble(&parsed.node.name, &decomposed.values, &schema, &touched);
    assert_eq!(out, "CRTPF FILE(QGPL/MYFILE) AUT(*LIBCRTAUT)");
}

#[test]
fn non_default_value_always_kept() {
    let out = roundtrip("CRTPF FILE(QGPL/MYFILE) AUT(*EXCLUDE)", &crtpf_def());
    assert_eq!(out, "CRTPF FILE(QGPL/MYFILE) AUT(*EXCLUDE)");
}

#[test]
fn libl_prefix_stripped_from_command_name() {
    let out = roundtrip("*LIBL/CRTPF FILE(MYFILE)", &crtpf_def());
    assert_eq!(out, "CRTPF FILE(MYFILE)");
}

// ─── Decomposed shapes ───────────────────────────────────────────────────────

#[test]
fn qual_decomposes_reversed_and_padded() {
    let parsed = parse_command("CRTPF FILE(QGPL/MYFILE)").unwrap();
    let decomposed = decompose_command(&parsed.node, &crtpf_def());
    let (kwd, value) = &decomposed.values[0];
    assert_eq!(kwd, "FILE");
    assert_eq!(
        *value,
        Value::Group {
            items: vec![Value::scalar("MYFILE"), Value::scalar("QGPL")],
        }
    );
}

#[test]
fn unknown_keyword_reported_not_fatal() {
    let parsed = parse_command("CRTPF FILE(MYFILE) BOGUS(1)").unwrap();
    let decomposed = decompose_command(&parsed.node, &crtpf_def());
    assert_eq!(
        diag_codes(&decomposed.diagnostics),
        [codes::DECOMPOSE_UNKNOWN_KEYWORD]
    );
    // The known sibling still decomposes.
    assert_eq!(decomposed.values.len(), 1);
}

// ─── ELEM parameters ─────────────────────────────────────────────────────────

#[test]
fn elem_round_trips_and_trims_trailing_defaults() {
    let schema = def(
        "SBMJOB",
        vec![
            typed("JOB", DataType::Name),
            elem(
                "LOG",
                vec![
                    ParamDef::default(),
                    ParamDef::default(),
                    ParamDef::default(),
                ],
            ),
        ],
    );
    let out = roundtrip("SBMJOB JOB(NIGHTLY) LOG(4 00 *NOLIST)", &schema);
    assert_eq!(out, "SBMJOB JOB(NIGHTLY) LOG(4 00 *NOLIST)");

    let out = roundtrip("SBMJOB JOB(NIGHTLY) LOG(4)", &schema);
    assert_eq!(out, "SBMJOB JOB(NIGHTLY) LOG(4)");
}

#[test]
fn elem_with_qual_part() {
    let schema = def(
        "OVRDBF",
        vec![
            typed("FILE", DataType::Name),
            elem("TOFILE", vec![qual_part(2), ParamDef::default()]),
        ],
    );
    let out = roundtrip("OVRDBF FILE(INPUT) TOFILE(QGPL/MASTER MBR1)", &schema);
    assert_eq!(out, "OVRDBF FILE(INPUT) TOFILE(QGPL/MASTER MBR1)");
}

fn qual_part(arity: usize) -> ParamDef {
    ParamDef {
        shape: cl_toolchain_schema::Shape::Qual {
            parts: (0..arity).map(|_| ParamDef::default()).collect(),
        },
        ..ParamDef::default()
    }
}

// ─── Multi-instance parameters ───────────────────────────────────────────────

#[test]
fn multi_instance_normalizes_to_wrapped_instances() {
    let schema = def(
        "CALL",
        vec![
            typed("PGM", DataType::Name),
            ParamDef {
                max: 5,
                ..typed("PARM", DataType::Char)
            },
        ],
    );
    let out = roundtrip("CALL PGM(MYPGM) PARM('A' 'B')", &schema);
    assert_eq!(out, "CALL PGM(MYPGM) PARM(('A') ('B'))");
}

// ─── Nested commands ─────────────────────────────────────────────────────────

#[test]
fn cmd_parameter_round_trips_unquoted() {
    let schema = def(
        "SBMJOB",
        vec![typed("CMD", DataType::Cmd), typed("JOB", DataType::Name)],
    );
    let out = roundtrip(
        "SBMJOB CMD(DSPJOB JOB(063459/COZZI/THREADS) DUPJOBOPT(*MSG)) JOB(IBMIRD)",
        &schema,
    );
    assert_eq!(
        out,
        "SBMJOB CMD(DSPJOB JOB(063459/COZZI/THREADS) DUPJOBOPT(*MSG)) JOB(IBMIRD)"
    );
}

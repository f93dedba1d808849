//! Reader and writer for saved card designs.
//!
//! One comma-separated record per line:
//!
//! ```text
//! id,colorIndex,frontText,insideText[,side,x,y]*
//! ```
//!
//! Text fields hold one or more lines separated by `|`. Each trailing
//! `side,x,y` triplet places a tree; `side` is `front` for the front side
//! and anything else for the back.
//!
//! Built on `winnow` 0.7: the line is split into fields, then numeric
//! fields are parsed in full with `dec_uint` / `float`.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use winnow::ascii::{dec_uint, float};
use winnow::combinator::separated;
use winnow::error::ContextError;
use winnow::prelude::*;
use winnow::token::take_till;

/// Which side of a card something sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Front,
    Back,
}

impl Side {
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Side::Front => Side::Back,
            Side::Back => Side::Front,
        }
    }

    /// `front` is the front side; any other token means the back.
    pub fn from_token(token: &str) -> Self {
        if token.trim() == "front" {
            Side::Front
        } else {
            Side::Back
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Side::Front => "front",
            Side::Back => "back",
        }
    }
}

/// A tree placement in card-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub side: Side,
    pub x: f32,
    pub y: f32,
}

/// Everything needed to rebuild a card's design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    pub id: u32,
    pub color_index: usize,
    pub front_text: Vec<String>,
    pub inside_text: Vec<String>,
    pub placements: Vec<Placement>,
}

#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("record is missing the `{0}` field")]
    MissingField(&'static str),

    #[error("`{value}` is not a valid {field}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("placement {index} is incomplete (expected side,x,y)")]
    IncompletePlacement { index: usize },

    #[error("text line {0:?} contains a field or line separator")]
    UnencodableText(String),
}

const TEXT_SEPARATOR: char = '|';

// ─── Parsing ─────────────────────────────────────────────────────────────

fn fields<'a>(input: &mut &'a str) -> ModalResult<Vec<&'a str>> {
    separated(1.., take_till(0.., ','), ',').parse_next(input)
}

fn parse_uint(field: &'static str, value: &str) -> Result<u32, RecordError> {
    dec_uint::<_, u32, ContextError>
        .parse(value.trim())
        .map_err(|_| RecordError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

fn parse_float(field: &'static str, value: &str) -> Result<f32, RecordError> {
    float::<_, f32, ContextError>
        .parse(value.trim())
        .map_err(|_| RecordError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

fn parse_text(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(TEXT_SEPARATOR).map(str::to_string).collect()
}

/// Parse one record line.
pub fn parse_record(line: &str) -> Result<CardRecord, RecordError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let fields = match fields.parse(line) {
        Ok(fields) => fields,
        Err(_) => return Err(RecordError::MissingField("id")),
    };
    let field = |i: usize, name: &'static str| -> Result<&str, RecordError> {
        fields.get(i).copied().ok_or(RecordError::MissingField(name))
    };

    let id = parse_uint("id", field(0, "id")?)?;
    let color_index = parse_uint("color index", field(1, "color index")?)? as usize;
    let front_text = parse_text(field(2, "front text")?);
    let inside_text = parse_text(field(3, "inside text")?);

    let rest = &fields[4..];
    if rest.len() % 3 != 0 {
        return Err(RecordError::IncompletePlacement {
            index: rest.len() / 3,
        });
    }
    let placements = rest
        .chunks_exact(3)
        .map(|triplet| {
            Ok(Placement {
                side: Side::from_token(triplet[0]),
                x: parse_float("x offset", triplet[1])?,
                y: parse_float("y offset", triplet[2])?,
            })
        })
        .collect::<Result<Vec<_>, RecordError>>()?;

    Ok(CardRecord {
        id,
        color_index,
        front_text,
        inside_text,
        placements,
    })
}

/// Parse every non-blank line. Each result carries its 1-based line number
/// so a loader can report and skip a bad card without losing the rest.
pub fn parse_records(text: &str) -> Vec<(usize, Result<CardRecord, RecordError>)> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| (i + 1, parse_record(line)))
        .collect()
}

// ─── Emitting ────────────────────────────────────────────────────────────

fn emit_text(lines: &[String], out: &mut String) -> Result<(), RecordError> {
    // An empty field already reads back as no lines at all.
    if let [only] = lines
        && only.is_empty()
    {
        return Err(RecordError::UnencodableText(String::new()));
    }
    for (i, line) in lines.iter().enumerate() {
        if line.contains([',', TEXT_SEPARATOR, '\n', '\r']) {
            return Err(RecordError::UnencodableText(line.clone()));
        }
        if i > 0 {
            out.push(TEXT_SEPARATOR);
        }
        out.push_str(line);
    }
    Ok(())
}

/// Write a record as a single line (no trailing newline).
pub fn emit_record(record: &CardRecord) -> Result<String, RecordError> {
    let mut out = format!("{},{},", record.id, record.color_index);
    emit_text(&record.front_text, &mut out)?;
    out.push(',');
    emit_text(&record.inside_text, &mut out)?;
    for p in &record.placements {
        out.push_str(&format!(",{},{},{}", p.side.token(), p.x, p.y));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_full_record() {
        let rec = parse_record("417,2,Happy|Holidays,Warm wishes,front,0.5,0.2,back,0.1,0.35").unwrap();
        assert_eq!(
            rec,
            CardRecord {
                id: 417,
                color_index: 2,
                front_text: vec!["Happy".into(), "Holidays".into()],
                inside_text: vec!["Warm wishes".into()],
                placements: vec![
                    Placement {
                        side: Side::Front,
                        x: 0.5,
                        y: 0.2
                    },
                    Placement {
                        side: Side::Back,
                        x: 0.1,
                        y: 0.35
                    },
                ],
            }
        );
    }

    #[test]
    fn any_other_side_token_means_back() {
        let rec = parse_record("1,0,a,b,inside,0.1,0.1,Front,0.2,0.2").unwrap();
        assert!(rec.placements.iter().all(|p| p.side == Side::Back));
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            parse_record("12,3,only front"),
            Err(RecordError::MissingField("inside text"))
        );
        assert_eq!(
            parse_record("x1,0,a,b"),
            Err(RecordError::InvalidNumber {
                field: "id",
                value: "x1".into()
            })
        );
        assert_eq!(
            parse_record("1,0,a,b,front,0.5"),
            Err(RecordError::IncompletePlacement { index: 0 })
        );
        assert_eq!(
            parse_record("1,0,a,b,front,0.5,high"),
            Err(RecordError::InvalidNumber {
                field: "y offset",
                value: "high".into()
            })
        );
    }

    #[test]
    fn emit_then_parse_keeps_the_design() {
        let rec = CardRecord {
            id: 7,
            color_index: 5,
            front_text: vec!["Season's".into(), "Greetings".into()],
            inside_text: vec![],
            placements: vec![Placement {
                side: Side::Back,
                x: 0.25,
                y: 0.5,
            }],
        };
        let line = emit_record(&rec).unwrap();
        assert_eq!(line, "7,5,Season's|Greetings,,back,0.25,0.5");
        assert_eq!(parse_record(&line).unwrap(), rec);
    }

    #[test]
    fn separators_in_text_are_rejected() {
        let rec = CardRecord {
            id: 1,
            color_index: 0,
            front_text: vec!["a, b".into()],
            inside_text: vec![],
            placements: vec![],
        };
        assert_eq!(
            emit_record(&rec),
            Err(RecordError::UnencodableText("a, b".into()))
        );
    }
}

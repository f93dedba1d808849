//! Integration tests: reading a whole shelf file of saved card designs.

use cr_core::record::{RecordError, Side, emit_record, parse_record, parse_records};
use pretty_assertions::assert_eq;

const SHELF: &str = include_str!("fixtures/shelf.csv");

#[test]
fn bad_lines_are_reported_with_their_line_numbers() {
    let results = parse_records(SHELF);
    let lines: Vec<usize> = results.iter().map(|(line, _)| *line).collect();
    assert_eq!(lines, [1, 2, 4, 5, 6]);

    let failures: Vec<(usize, &RecordError)> = results
        .iter()
        .filter_map(|(line, r)| r.as_ref().err().map(|e| (*line, e)))
        .collect();
    assert_eq!(
        failures,
        [
            (
                4,
                &RecordError::InvalidNumber {
                    field: "id",
                    value: "not-a-number".into()
                }
            ),
            (5, &RecordError::IncompletePlacement { index: 0 }),
        ]
    );
}

#[test]
fn good_lines_keep_their_placements() {
    let cards: Vec<_> = parse_records(SHELF)
        .into_iter()
        .filter_map(|(_, r)| r.ok())
        .collect();
    let ids: Vec<u32> = cards.iter().map(|c| c.id).collect();
    assert_eq!(ids, [101, 102, 104]);

    let first = &cards[0];
    assert_eq!(first.front_text, ["Merry", "Christmas"]);
    assert_eq!(first.placements.len(), 3);
    assert_eq!(first.placements[2].side, Side::Back);

    let second = &cards[1];
    assert!(second.inside_text.is_empty());
}

#[test]
fn emitted_lines_read_back_identically() {
    for (_, result) in parse_records(SHELF) {
        let Ok(card) = result else { continue };
        let line = emit_record(&card).unwrap();
        assert_eq!(parse_record(&line).unwrap(), card);
    }
}

#[test]
fn a_single_blank_line_cannot_be_saved() {
    let mut card = parse_record("9,0,Hi,There").unwrap();
    card.front_text = vec![String::new()];
    assert_eq!(emit_record(&card), Err(RecordError::UnencodableText(String::new())));

    // Blank lines between others survive.
    card.front_text = vec!["Hi".into(), String::new(), "There".into()];
    let line = emit_record(&card).unwrap();
    assert_eq!(parse_record(&line).unwrap(), card);
}

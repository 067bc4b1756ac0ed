//! Short algebraic text for played moves.
//!
//! The text is built from the [`MoveRecord`] alone: there is no
//! disambiguation between like pieces and no check suffix.

use crate::{CastleSide, MoveFlag, MoveRecord};
use chess_core::PieceKind;
use std::fmt::Write;

/// Renders a played move, e.g. `e4`, `Nxf7`, `exd6`, `e8=Q`, `O-O-O`.
pub fn record_to_text(record: &MoveRecord) -> String {
    if let MoveFlag::Castle(side) = record.flag {
        return match side {
            CastleSide::Kingside => "O-O".to_string(),
            CastleSide::Queenside => "O-O-O".to_string(),
        };
    }

    let mut text = String::with_capacity(7);
    if record.piece.kind == PieceKind::Pawn {
        if record.is_capture() {
            text.push(record.mv.from.file_char());
        }
    } else {
        text.push(record.piece.kind.to_char().to_ascii_uppercase());
    }
    if record.is_capture() {
        text.push('x');
    }
    text.push_str(&record.mv.to.to_algebraic());
    if let Some(kind) = record.mv.promotion {
        text.push('=');
        text.push(kind.to_char().to_ascii_uppercase());
    }
    text
}

/// Numbers moves in pairs: `1. e4 e5 2. Nf3`.
///
/// `first_fullmove` is the move number of the first record and `black_first`
/// marks a history that starts with black to move, which is shown as `1... e5`.
pub fn move_list(history: &[MoveRecord], first_fullmove: u32, black_first: bool) -> String {
    let mut out = String::new();
    let mut number = first_fullmove;
    let mut records = history.iter();

    if black_first {
        if let Some(record) = records.next() {
            let _ = write!(out, "{}... {}", number, record_to_text(record));
            number += 1;
        }
    }

    let rest: Vec<&MoveRecord> = records.collect();
    for pair in rest.chunks(2) {
        if !out.is_empty() {
            out.push(' ');
        }
        let _ = write!(out, "{}. {}", number, record_to_text(pair[0]));
        if let Some(reply) = pair.get(1) {
            out.push(' ');
            out.push_str(&record_to_text(reply));
        }
        number += 1;
    }
    out
}

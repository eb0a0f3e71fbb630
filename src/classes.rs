//! Lambda nodes for shorthand classes and zero-width anchors.

use crate::alphabet::Input;
use crate::ast::{AnchorKind, ShorthandKind};
use crate::node::Lambda;

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

fn is_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n' | '\x0b' | '\x0c')
}

/// Check if a character matches a shorthand class.
pub fn shorthand_matches(ch: char, kind: ShorthandKind) -> bool {
    match kind {
        ShorthandKind::Digit => ch.is_ascii_digit(),
        ShorthandKind::NonDigit => !ch.is_ascii_digit(),
        ShorthandKind::Word => is_word_char(ch),
        ShorthandKind::NonWord => !is_word_char(ch),
        ShorthandKind::Space => is_space(ch),
        ShorthandKind::NonSpace => !is_space(ch),
    }
}

/// Check if `input` sits at a word boundary.
fn is_word_boundary(input: Input<'_, char>) -> bool {
    let before = input.previous().is_some_and(is_word_char);
    let after = !input.is_eof() && is_word_char(input.peek());
    before != after
}

fn name(kind: ShorthandKind) -> &'static str {
    match kind {
        ShorthandKind::Digit => "Digit",
        ShorthandKind::NonDigit => "NonDigit",
        ShorthandKind::Word => "Word",
        ShorthandKind::NonWord => "NonWord",
        ShorthandKind::Space => "WhiteSpace",
        ShorthandKind::NonSpace => "NonWhiteSpace",
    }
}

/// A node consuming one character of the given shorthand class.
pub fn shorthand(kind: ShorthandKind) -> Lambda<char> {
    Lambda::new(name(kind), move |input: Input<'_, char>, _| {
        (!input.is_eof() && shorthand_matches(input.peek(), kind)).then_some(1)
    })
}

/// A zero-width node asserting the given anchor.
pub fn anchor(kind: AnchorKind) -> Lambda<char> {
    match kind {
        AnchorKind::Start => Lambda::new("Start", |_: Input<'_, char>, consumed| {
            (consumed == 0).then_some(0)
        }),
        AnchorKind::End => {
            Lambda::new("End", |input: Input<'_, char>, _| input.is_eof().then_some(0))
        }
        AnchorKind::WordBoundary => Lambda::new("WordBoundary", |input: Input<'_, char>, _| {
            is_word_boundary(input).then_some(0)
        }),
        AnchorKind::NonWordBoundary => {
            Lambda::new("NonWordBoundary", |input: Input<'_, char>, _| {
                (!is_word_boundary(input)).then_some(0)
            })
        }
    }
}

//! Compiler: lowers the AST into builder calls over an automaton.

use log::{debug, warn};

use crate::ast::*;
use crate::automaton::Automaton;
use crate::builder::Builder;
use crate::classes;
use crate::error::PatternError;
use crate::node::{Behavior, Macro};

/// Compile an AST into an automaton, without optimizing it.
pub fn compile(ast: &AstNode) -> Result<Automaton<char>, PatternError> {
    let mut automaton = Automaton::new();
    let mut builder = automaton.builder();
    emit(&mut builder, ast)?;
    builder.finish()?;
    debug!(
        "compiled {} nodes and {} edges",
        automaton.len(),
        automaton.edge_count()
    );
    Ok(automaton)
}

fn emit(builder: &mut Builder<'_, char>, node: &AstNode) -> Result<(), PatternError> {
    match node {
        AstNode::Literal(ch) => {
            builder.push_atom(Behavior::Symbol(*ch));
        }
        AstNode::Dot => {
            builder.push_atom(Behavior::Any);
        }
        AstNode::Concat(nodes) => {
            for n in nodes {
                emit(builder, n)?;
            }
        }
        AstNode::Alternation(branches) => {
            // a|b|c within the innermost group:
            //   G: <a> -> E
            //   G: <b> -> E
            //   G: <c>      (closed by the group's end)
            for (i, branch) in branches.iter().enumerate() {
                if i > 0 {
                    builder.branch();
                }
                emit(builder, branch)?;
            }
        }
        AstNode::Quantifier { node: sub, kind } => {
            emit_quantifier(builder, sub, *kind)?;
        }
        AstNode::CharClass { items, negated } => {
            emit_class(builder, items, *negated)?;
        }
        AstNode::ShorthandClass(kind) => {
            builder.push_atom(Behavior::Lambda(classes::shorthand(*kind)));
        }
        AstNode::Anchor(kind) => {
            builder.push_atom(Behavior::Lambda(classes::anchor(*kind)));
        }
        AstNode::Group(sub) => {
            builder.begin_group()?;
            emit(builder, sub)?;
            builder.end_group()?;
        }
        AstNode::Lookahead { node: sub, positive } => {
            // The sub-pattern gets an automaton of its own
            let sub = compile(sub)?;
            let lookahead = if *positive {
                Macro::positive(sub)
            } else {
                Macro::negative(sub)
            };
            builder.push_atom(Behavior::Macro(lookahead));
        }
    }
    Ok(())
}

/// Emit a node so that it ends up as the builder's last unit, wrapping it
/// in a group unless it already is a single atom or group.
fn emit_unit(builder: &mut Builder<'_, char>, node: &AstNode) -> Result<(), PatternError> {
    match node {
        AstNode::Literal(_)
        | AstNode::Dot
        | AstNode::ShorthandClass(_)
        | AstNode::Anchor(_)
        | AstNode::Lookahead { .. }
        | AstNode::Group(_) => emit(builder, node),
        _ => {
            builder.begin_group()?;
            emit(builder, node)?;
            builder.end_group()?;
            Ok(())
        }
    }
}

fn emit_quantifier(
    builder: &mut Builder<'_, char>,
    sub: &AstNode,
    kind: QuantifierKind,
) -> Result<(), PatternError> {
    // A nullable body under an unbounded repetition would close a cycle of
    // nodes that consume nothing.
    if kind.is_unbounded() && sub.is_nullable() {
        return Err(PatternError::EmptyRepetition);
    }

    match kind {
        QuantifierKind::Plus => {
            emit_unit(builder, sub)?;
            builder.jump()?;
        }
        QuantifierKind::Star => {
            emit_unit(builder, sub)?;
            builder.skip()?.jump()?;
        }
        QuantifierKind::Question => {
            emit_unit(builder, sub)?;
            builder.skip()?;
        }
        QuantifierKind::Exact(n) => {
            builder.begin_group()?;
            for _ in 0..n {
                emit(builder, sub)?;
            }
            builder.end_group()?;
        }
        QuantifierKind::AtLeast(0) => {
            emit_quantifier(builder, sub, QuantifierKind::Star)?;
        }
        QuantifierKind::AtLeast(n) => {
            builder.begin_group()?;
            for _ in 1..n {
                emit(builder, sub)?;
            }
            emit_unit(builder, sub)?;
            builder.jump()?;
            builder.end_group()?;
        }
        QuantifierKind::Range(n, m) => {
            builder.begin_group()?;
            // First n required, then up to (m - n) optional
            for _ in 0..n {
                emit(builder, sub)?;
            }
            for _ in n..m {
                emit_unit(builder, sub)?;
                builder.skip()?;
            }
            builder.end_group()?;
        }
    }
    Ok(())
}

fn emit_class(
    builder: &mut Builder<'_, char>,
    items: &[ClassItem],
    negated: bool,
) -> Result<(), PatternError> {
    match (items.is_empty(), negated) {
        (true, false) => {
            warn!("ignoring empty character class");
            return Ok(());
        }
        // `[^]` is equivalent to `.`
        (true, true) => {
            builder.push_atom(Behavior::Any);
            return Ok(());
        }
        _ => {}
    }

    builder.begin_group()?;
    if negated {
        // [^abc] lowers to (?![abc]).
        let mut class = Automaton::new();
        let mut sub = class.builder();
        emit_class(&mut sub, items, false)?;
        sub.finish()?;
        builder.push_atom(Behavior::Macro(Macro::negative(class)));
        builder.push_atom(Behavior::Any);
    } else {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                builder.branch();
            }
            let behavior = match *item {
                ClassItem::Literal(ch) => Behavior::Symbol(ch),
                ClassItem::Range(lo, hi) => Behavior::Range(lo, hi),
                ClassItem::Shorthand(kind) => Behavior::Lambda(classes::shorthand(kind)),
            };
            builder.push_atom(behavior);
        }
    }
    builder.end_group()?;
    Ok(())
}

//! AST types for the pattern front end.

/// A single node in the pattern AST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstNode {
    /// Matches a single literal character.
    Literal(char),
    /// Matches any character.
    Dot,
    /// Concatenation of nodes (implicit in `ab`). Empty for an empty branch.
    Concat(Vec<AstNode>),
    /// Alternation (`a|b`).
    Alternation(Vec<AstNode>),
    /// Quantifier applied to a sub-expression.
    Quantifier {
        node: Box<AstNode>,
        kind: QuantifierKind,
    },
    /// Character class like `[abc]`, `[a-z]`, `[^abc]`.
    CharClass {
        items: Vec<ClassItem>,
        negated: bool,
    },
    /// Shorthand class: `\d`, `\w`, `\s` and their negations.
    ShorthandClass(ShorthandKind),
    /// Anchor: `^`, `$`, `\b`, `\B`.
    Anchor(AnchorKind),
    /// Group `(...)` or `(?:...)`. Groups never capture.
    Group(Box<AstNode>),
    /// Lookahead `(?=...)` or `(?!...)`.
    Lookahead {
        node: Box<AstNode>,
        positive: bool,
    },
}

impl AstNode {
    /// Whether the node can match without consuming any character.
    pub fn is_nullable(&self) -> bool {
        match self {
            AstNode::Literal(_) | AstNode::Dot | AstNode::ShorthandClass(_) => false,
            AstNode::CharClass { items, negated } => !*negated && items.is_empty(),
            AstNode::Anchor(_) | AstNode::Lookahead { .. } => true,
            AstNode::Concat(nodes) => nodes.iter().all(AstNode::is_nullable),
            AstNode::Alternation(branches) => branches.iter().any(AstNode::is_nullable),
            AstNode::Quantifier { node, kind } => kind.min() == 0 || node.is_nullable(),
            AstNode::Group(node) => node.is_nullable(),
        }
    }
}

/// Kind of quantifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantifierKind {
    /// `*`: zero or more.
    Star,
    /// `+`: one or more.
    Plus,
    /// `?`: zero or one.
    Question,
    /// `{n}`: exactly n.
    Exact(usize),
    /// `{n,}`: at least n.
    AtLeast(usize),
    /// `{n,m}`: between n and m inclusive.
    Range(usize, usize),
}

impl QuantifierKind {
    /// Minimum number of repetitions.
    pub fn min(self) -> usize {
        match self {
            QuantifierKind::Star | QuantifierKind::Question => 0,
            QuantifierKind::Plus => 1,
            QuantifierKind::Exact(n)
            | QuantifierKind::AtLeast(n)
            | QuantifierKind::Range(n, _) => n,
        }
    }

    /// Whether there is no upper bound.
    pub fn is_unbounded(self) -> bool {
        matches!(self, QuantifierKind::Star | QuantifierKind::Plus | QuantifierKind::AtLeast(_))
    }
}

/// Item within a character class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassItem {
    /// Single character.
    Literal(char),
    /// Character range `a-z`.
    Range(char, char),
    /// Shorthand within a class, e.g. `[\d]`.
    Shorthand(ShorthandKind),
}

/// Shorthand character class kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShorthandKind {
    /// `\d`: digits.
    Digit,
    /// `\D`: non-digits.
    NonDigit,
    /// `\w`: word characters.
    Word,
    /// `\W`: non-word characters.
    NonWord,
    /// `\s`: whitespace.
    Space,
    /// `\S`: non-whitespace.
    NonSpace,
}

/// Anchor kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorKind {
    /// `^`: start of string.
    Start,
    /// `$`: end of string.
    End,
    /// `\b`: word boundary.
    WordBoundary,
    /// `\B`: non-word boundary.
    NonWordBoundary,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quantified(node: AstNode, kind: QuantifierKind) -> AstNode {
        AstNode::Quantifier {
            node: Box::new(node),
            kind,
        }
    }

    #[test]
    fn nullability() {
        assert!(!AstNode::Literal('a').is_nullable());
        assert!(AstNode::Concat(vec![]).is_nullable());
        assert!(AstNode::Anchor(AnchorKind::Start).is_nullable());
        assert!(quantified(AstNode::Dot, QuantifierKind::Star).is_nullable());
        assert!(!quantified(AstNode::Dot, QuantifierKind::Plus).is_nullable());
        assert!(quantified(AstNode::Dot, QuantifierKind::Range(0, 3)).is_nullable());
        assert!(
            AstNode::Alternation(vec![AstNode::Literal('a'), AstNode::Concat(vec![])]).is_nullable()
        );
        assert!(
            !AstNode::CharClass {
                items: vec![],
                negated: true
            }
            .is_nullable()
        );
    }
}

//! Pattern parser: converts a pattern string into an AST.

use crate::ast::*;
use crate::error::PatternError;

pub struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    pub fn new(pattern: &str) -> Self {
        Parser {
            chars: pattern.chars().collect(),
            pos: 0,
        }
    }

    /// Parse the full pattern and return an AST node.
    pub fn parse(&mut self) -> Result<AstNode, PatternError> {
        let node = self.parse_alternation()?;
        if let Some(ch) = self.peek() {
            return Err(PatternError::UnexpectedChar { ch, pos: self.pos });
        }
        Ok(node)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn expect(&mut self, expected: char) -> Result<(), PatternError> {
        let pos = self.pos;
        match self.advance() {
            Some(c) if c == expected => Ok(()),
            Some(_) => Err(PatternError::Expected { expected, pos }),
            None => Err(PatternError::UnexpectedEnd),
        }
    }

    /// Parse alternation: `a|b|c`
    fn parse_alternation(&mut self) -> Result<AstNode, PatternError> {
        let mut branches = vec![self.parse_concat()?];
        while self.peek() == Some('|') {
            self.advance(); // consume '|'
            branches.push(self.parse_concat()?);
        }
        if branches.len() == 1 {
            Ok(branches.remove(0))
        } else {
            Ok(AstNode::Alternation(branches))
        }
    }

    /// Parse concatenation: `abc`
    fn parse_concat(&mut self) -> Result<AstNode, PatternError> {
        let mut nodes = Vec::new();
        while let Some(ch) = self.peek() {
            if ch == ')' || ch == '|' {
                break;
            }
            nodes.push(self.parse_quantified()?);
        }
        if nodes.len() == 1 {
            Ok(nodes.remove(0))
        } else {
            Ok(AstNode::Concat(nodes))
        }
    }

    /// Parse an atom followed by any number of quantifiers (`a{3}+`).
    fn parse_quantified(&mut self) -> Result<AstNode, PatternError> {
        let mut node = self.parse_atom()?;
        loop {
            let kind = match self.peek() {
                Some('*') => {
                    self.advance();
                    QuantifierKind::Star
                }
                Some('+') => {
                    self.advance();
                    QuantifierKind::Plus
                }
                Some('?') => {
                    self.advance();
                    QuantifierKind::Question
                }
                Some('{') => match self.parse_brace_quantifier()? {
                    Some(kind) => kind,
                    None => break,
                },
                _ => break,
            };
            // Laziness doesn't change whole-string acceptance.
            if self.peek() == Some('?') {
                self.advance();
            }
            node = AstNode::Quantifier {
                node: Box::new(node),
                kind,
            };
        }
        Ok(node)
    }

    /// Parse `{n}`, `{n,}`, `{n,m}` quantifier. Returns `None`, with the
    /// position untouched, when the brace is a literal.
    fn parse_brace_quantifier(&mut self) -> Result<Option<QuantifierKind>, PatternError> {
        let save_pos = self.pos;
        self.advance(); // consume '{'

        match self.try_parse_brace_contents() {
            Some(QuantifierKind::Range(min, max)) if max < min => {
                Err(PatternError::InvalidRepetition { min, max })
            }
            Some(kind) => Ok(Some(kind)),
            None => {
                // Not a quantifier, so the '{' is a literal
                self.pos = save_pos;
                Ok(None)
            }
        }
    }

    fn try_parse_brace_contents(&mut self) -> Option<QuantifierKind> {
        let n = self.parse_number()?;
        let kind = if self.peek() == Some(',') {
            self.advance(); // consume ','
            while self.peek() == Some(' ') {
                self.advance();
            }
            if self.peek() == Some('}') {
                QuantifierKind::AtLeast(n)
            } else {
                QuantifierKind::Range(n, self.parse_number()?)
            }
        } else {
            QuantifierKind::Exact(n)
        };
        (self.advance() == Some('}')).then_some(kind)
    }

    fn parse_number(&mut self) -> Option<usize> {
        let start = self.pos;
        while self.peek().is_some_and(|ch| ch.is_ascii_digit()) {
            self.advance();
        }
        let digits: String = self.chars[start..self.pos].iter().collect();
        digits.parse().ok()
    }

    /// Parse a single atom (literal, class, group, anchor, etc.)
    fn parse_atom(&mut self) -> Result<AstNode, PatternError> {
        match self.peek() {
            None => Err(PatternError::UnexpectedEnd),
            Some('(') => self.parse_group(),
            Some('[') => self.parse_char_class(),
            Some('.') => {
                self.advance();
                Ok(AstNode::Dot)
            }
            Some('^') => {
                self.advance();
                Ok(AstNode::Anchor(AnchorKind::Start))
            }
            Some('$') => {
                self.advance();
                Ok(AstNode::Anchor(AnchorKind::End))
            }
            Some('\\') => self.parse_escape(),
            Some(ch @ ('*' | '+' | '?')) => Err(PatternError::UnexpectedChar { ch, pos: self.pos }),
            Some(ch) => {
                self.advance();
                Ok(AstNode::Literal(ch))
            }
        }
    }

    /// Parse an escape sequence.
    fn parse_escape(&mut self) -> Result<AstNode, PatternError> {
        self.advance(); // consume '\\'
        match self.advance() {
            None => Err(PatternError::UnexpectedEnd),
            Some('b') => Ok(AstNode::Anchor(AnchorKind::WordBoundary)),
            Some('B') => Ok(AstNode::Anchor(AnchorKind::NonWordBoundary)),
            Some(ch) if ch.is_ascii_digit() && ch != '0' => {
                Err(PatternError::Unsupported("backreference"))
            }
            Some(ch) => Ok(match shorthand(ch) {
                Some(kind) => AstNode::ShorthandClass(kind),
                None => AstNode::Literal(control(ch)),
            }),
        }
    }

    /// Parse a group: `(...)`, `(?:...)`, `(?=...)`, `(?!...)`.
    fn parse_group(&mut self) -> Result<AstNode, PatternError> {
        self.advance(); // consume '('

        let lookahead = if self.peek() == Some('?') {
            let pos = self.pos;
            self.advance(); // consume '?'
            match self.advance() {
                Some(':') => None,
                Some('=') => Some(true),
                Some('!') => Some(false),
                Some('<') if matches!(self.peek(), Some('=' | '!')) => {
                    return Err(PatternError::Unsupported("lookbehind"));
                }
                Some(_) => return Err(PatternError::InvalidGroup { pos }),
                None => return Err(PatternError::UnexpectedEnd),
            }
        } else {
            None
        };

        let node = Box::new(self.parse_alternation()?);
        self.expect(')')?;
        Ok(match lookahead {
            Some(positive) => AstNode::Lookahead { node, positive },
            None => AstNode::Group(node),
        })
    }

    /// Parse a character class: `[abc]`, `[a-z]`, `[^abc]`.
    fn parse_char_class(&mut self) -> Result<AstNode, PatternError> {
        self.advance(); // consume '['
        let negated = if self.peek() == Some('^') {
            self.advance();
            true
        } else {
            false
        };

        let mut items = Vec::new();
        while self.peek() != Some(']') {
            let item = match self.advance() {
                None => return Err(PatternError::UnexpectedEnd),
                Some('\\') => match self.advance() {
                    None => return Err(PatternError::UnexpectedEnd),
                    Some(ch) => match shorthand(ch) {
                        Some(kind) => ClassItem::Shorthand(kind),
                        None => ClassItem::Literal(control(ch)),
                    },
                },
                Some(ch) => ClassItem::Literal(ch),
            };

            // Check for range like a-z
            match item {
                ClassItem::Literal(lo)
                    if self.peek() == Some('-') && !matches!(self.peek_at(1), Some(']') | None) =>
                {
                    self.advance(); // consume '-'
                    let hi = match self.advance() {
                        Some('\\') => self
                            .advance()
                            .map(control)
                            .ok_or(PatternError::UnexpectedEnd)?,
                        Some(c) => c,
                        None => return Err(PatternError::UnexpectedEnd),
                    };
                    if hi < lo {
                        return Err(PatternError::InvalidRange { lo, hi });
                    }
                    items.push(ClassItem::Range(lo, hi));
                }
                item => items.push(item),
            }
        }
        self.advance(); // consume ']'
        Ok(AstNode::CharClass { items, negated })
    }
}

fn shorthand(ch: char) -> Option<ShorthandKind> {
    match ch {
        'd' => Some(ShorthandKind::Digit),
        'D' => Some(ShorthandKind::NonDigit),
        'w' => Some(ShorthandKind::Word),
        'W' => Some(ShorthandKind::NonWord),
        's' => Some(ShorthandKind::Space),
        'S' => Some(ShorthandKind::NonSpace),
        _ => None,
    }
}

/// Maps control escapes (`\n`, `\t`, ...) to their character; everything
/// else escapes to itself.
fn control(ch: char) -> char {
    match ch {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'f' => '\x0c',
        'v' => '\x0b',
        ch => ch,
    }
}

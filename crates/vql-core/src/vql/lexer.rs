use crate::vql::{
    ast::{CompareOp, Operand, Term, is_field_name},
    error::{Expected, ParseError},
};

///
/// TokenKind
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum TokenKind {
    LParen,
    RParen,
    Or,
    And,
    Not,
    Term(Term),
}

impl TokenKind {
    // Tokens that may begin a unary expression (and so continue an implicit AND).
    pub(crate) const fn starts_unary(&self) -> bool {
        matches!(self, Self::LParen | Self::Not | Self::Term(_))
    }
}

///
/// Token
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) position: usize,
}

///
/// Lexer
///
/// Pull-based tokenizer over VQL source. Positions are character offsets so
/// errors point at what the caller typed, not at UTF-8 byte indexes.
///

pub(crate) struct Lexer {
    input: Vec<char>,
    pos: usize,
}

impl Lexer {
    pub(crate) fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
        }
    }

    /// Character count; the position reported for errors at end of input.
    pub(crate) const fn end(&self) -> usize {
        self.input.len()
    }

    pub(crate) fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        self.skip_whitespace();

        let position = self.pos;
        let Some(ch) = self.peek() else {
            return Ok(None);
        };

        let kind = match ch {
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '|' => self.single(TokenKind::Or),
            '&' => self.single(TokenKind::And),
            '-' | '!' => self.single(TokenKind::Not),
            '"' => TokenKind::Term(self.read_quoted_token()?),
            ':' | '<' | '>' => return Err(ParseError::new(position, Expected::FieldName)),
            _ => TokenKind::Term(self.read_word_term()?),
        };

        Ok(Some(Token { kind, position }))
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.pos += 1;
        kind
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn read_while(&mut self, predicate: impl Fn(&Self, char) -> bool) -> String {
        let mut out = String::new();
        while let Some(ch) = self.peek() {
            if !predicate(self, ch) {
                break;
            }
            out.push(ch);
            self.pos += 1;
        }

        out
    }

    // `"..."` with `\` escaping the next character; the opening quote is current.
    fn read_quoted(&mut self) -> Result<String, ParseError> {
        self.advance();

        let mut out = String::new();
        loop {
            match self.advance() {
                Some('"') => return Ok(out),
                Some('\\') => match self.advance() {
                    Some(ch) => out.push(ch),
                    None => break,
                },
                Some(ch) => out.push(ch),
                None => break,
            }
        }

        Err(ParseError::new(self.end(), Expected::ClosingQuote))
    }

    fn take_star(&mut self) -> bool {
        if self.peek() == Some('*') {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn read_quoted_token(&mut self) -> Result<Term, ParseError> {
        let text = self.read_quoted()?;
        let op = if self.take_star() {
            CompareOp::Prefix
        } else {
            CompareOp::Eq
        };

        Ok(Term::bare(op, Operand::Quoted(text)))
    }

    fn read_word_term(&mut self) -> Result<Term, ParseError> {
        let start = self.pos;
        let word = self.read_while(|lexer, ch| !ends_word(lexer, ch));

        match self.read_operator() {
            Some(op) => {
                if !is_field_name(&word) {
                    return Err(ParseError::new(start, Expected::FieldName));
                }
                self.read_field_value(word, op)
            }
            None => bare_word(word, start),
        }
    }

    fn read_operator(&mut self) -> Option<CompareOp> {
        let (op, width) = match (self.peek()?, self.peek_at(1)) {
            (':', _) => (CompareOp::Eq, 1),
            ('!', Some('=')) => (CompareOp::Ne, 2),
            ('>', Some('=')) => (CompareOp::Gte, 2),
            ('>', _) => (CompareOp::Gt, 1),
            ('<', Some('=')) => (CompareOp::Lte, 2),
            ('<', _) => (CompareOp::Lt, 1),
            _ => return None,
        };
        self.pos += width;

        Some(op)
    }

    fn read_field_value(&mut self, field: String, op: CompareOp) -> Result<Term, ParseError> {
        let start = self.pos;

        let (value, star_at) = if self.peek() == Some('"') {
            let text = self.read_quoted()?;
            let star_at = self.pos;
            let starred = self.take_star();

            (Operand::Quoted(text), starred.then_some(star_at))
        } else {
            let mut text = self.read_while(|_, ch| !ch.is_whitespace() && !ends_value(ch));
            if text.is_empty() {
                return Err(ParseError::new(start, Expected::Value));
            }

            let star_at = if text.ends_with('*') {
                text.pop();
                if text.is_empty() {
                    return Err(ParseError::new(start, Expected::Value));
                }
                Some(self.pos - 1)
            } else {
                None
            };

            (Operand::Raw(text), star_at)
        };

        let op = match (star_at, op) {
            (None, op) => op,
            (Some(_), CompareOp::Eq) => CompareOp::Prefix,
            (Some(position), _) => {
                return Err(ParseError::new(position, Expected::ColonBeforeWildcard));
            }
        };

        Ok(Term::with_field(field, op, value))
    }
}

// Characters that end an unquoted value or bare word.
const fn ends_value(ch: char) -> bool {
    matches!(ch, '(' | ')' | '|' | '&' | '"')
}

fn ends_word(lexer: &Lexer, ch: char) -> bool {
    ch.is_whitespace()
        || ends_value(ch)
        || matches!(ch, ':' | '<' | '>')
        || (ch == '!' && lexer.peek_at(1) == Some('='))
}

fn bare_word(mut word: String, start: usize) -> Result<Term, ParseError> {
    let op = if word.ends_with('*') {
        word.pop();
        CompareOp::Prefix
    } else {
        CompareOp::Eq
    };

    if word.is_empty() {
        return Err(ParseError::new(start, Expected::Value));
    }

    Ok(Term::bare(op, Operand::Raw(word)))
}

///
/// TESTS
///

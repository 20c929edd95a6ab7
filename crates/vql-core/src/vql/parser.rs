use crate::vql::{
    ast::{Group, GroupOp, Node},
    error::{Expected, ParseError},
    lexer::{Lexer, Token, TokenKind},
};

/// Default bound on nested groups and negations accepted by `parse`.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Parse VQL source; empty or whitespace-only input is the empty filter.
pub fn parse(source: &str) -> Result<Option<Node>, ParseError> {
    parse_with_limits(source, DEFAULT_MAX_DEPTH)
}

/// Parse VQL source, rejecting groups and negations nested past `max_depth`.
pub fn parse_with_limits(source: &str, max_depth: usize) -> Result<Option<Node>, ParseError> {
    tracing::trace!(len = source.len(), max_depth, "parsing vql filter");

    let mut parser = Parser::new(source, max_depth)?;
    if parser.peek().is_none() {
        return Ok(None);
    }

    let node = parser.parse_expr()?;
    if let Some(token) = parser.peek() {
        return Err(ParseError::new(token.position, Expected::EndOfInput));
    }

    Ok(Some(node))
}

///
/// Parser
///
/// Recursive descent over a one-token lookahead:
///
///   expr    := and ('|' and)*
///   and     := unary ('&'? unary)*
///   unary   := ('-' | '!') unary | primary
///   primary := '(' expr ')' | term
///

struct Parser {
    lexer: Lexer,
    lookahead: Option<Token>,
    depth: usize,
    max_depth: usize,
}

impl Parser {
    fn new(source: &str, max_depth: usize) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let lookahead = lexer.next_token()?;

        Ok(Self {
            lexer,
            lookahead,
            depth: 0,
            max_depth,
        })
    }

    const fn peek(&self) -> Option<&Token> {
        self.lookahead.as_ref()
    }

    fn advance(&mut self) -> Result<Option<Token>, ParseError> {
        let next = self.lexer.next_token()?;

        Ok(std::mem::replace(&mut self.lookahead, next))
    }

    fn position(&self) -> usize {
        self.peek()
            .map_or_else(|| self.lexer.end(), |token| token.position)
    }

    fn at(&self, kind: &TokenKind) -> bool {
        self.peek().is_some_and(|token| &token.kind == kind)
    }

    fn enter(&mut self, position: usize) -> Result<(), ParseError> {
        if self.depth >= self.max_depth {
            return Err(ParseError::new(
                position,
                Expected::Nesting {
                    max: self.max_depth,
                },
            ));
        }
        self.depth += 1;

        Ok(())
    }

    const fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_expr(&mut self) -> Result<Node, ParseError> {
        let mut args = vec![self.parse_and()?];
        while self.at(&TokenKind::Or) {
            self.advance()?;
            args.push(self.parse_and()?);
        }

        Ok(collect(GroupOp::Or, args))
    }

    fn parse_and(&mut self) -> Result<Node, ParseError> {
        let mut args = vec![self.parse_unary()?];
        loop {
            if self.at(&TokenKind::And) {
                self.advance()?;
            } else if !self.peek().is_some_and(|token| token.kind.starts_unary()) {
                break;
            }
            args.push(self.parse_unary()?);
        }

        Ok(collect(GroupOp::And, args))
    }

    fn parse_unary(&mut self) -> Result<Node, ParseError> {
        if !self.at(&TokenKind::Not) {
            return self.parse_primary();
        }

        let position = self.position();
        self.enter(position)?;
        self.advance()?;
        let inner = self.parse_unary()?;
        self.leave();

        Ok(Node::Not(Box::new(inner)))
    }

    fn parse_primary(&mut self) -> Result<Node, ParseError> {
        let position = self.position();

        match self.advance()? {
            Some(Token {
                kind: TokenKind::Term(term),
                ..
            }) => Ok(Node::Term(term)),
            Some(Token {
                kind: TokenKind::LParen,
                ..
            }) => {
                self.enter(position)?;
                let group = self.parse_group_body()?;
                self.leave();

                Ok(group)
            }
            _ => Err(ParseError::new(position, Expected::Term)),
        }
    }

    // Contents of `( ... )`; the opening parenthesis is already consumed.
    fn parse_group_body(&mut self) -> Result<Node, ParseError> {
        let inner = self.parse_expr()?;
        if !self.at(&TokenKind::RParen) {
            return Err(ParseError::new(self.position(), Expected::CloseParen));
        }
        self.advance()?;

        let group = match inner {
            Node::Group(group) if !group.is_grouped() => {
                let (op, args, _) = group.into_parts();
                Group::from_parts(op, args, true)
            }
            other => Group::from_parts(GroupOp::And, vec![other], true),
        };

        Ok(Node::Group(group))
    }
}

fn collect(op: GroupOp, mut args: Vec<Node>) -> Node {
    if args.len() == 1
        && let Some(node) = args.pop()
    {
        return node;
    }

    Node::Group(Group::from_parts(op, args, false))
}

use std::iter::Peekable;
use std::str::CharIndices;

use super::{Error, Position, Span};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TokenKind<'a> {
    /// A proposition or action name, or one word of a multi-word label.
    Word(&'a str),
    /// A word immediately followed by `:`. The colon is not part of the slice.
    Label(&'a str),
    Newline,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Token<'a> {
    pub span: Span,
    pub kind: TokenKind<'a>,
}

pub struct Lexer<'a> {
    text: &'a str,
    it: Peekable<CharIndices<'a>>,
    line: usize, // current source line, used for error reporting by Tokens
    col: usize,  // current source column, used for error reporting by Tokens
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            it: text.char_indices().peekable(),
            line: 1,
            col: 1,
        }
    }

    fn word(&mut self, offset: usize) -> Token<'a> {
        let mut len = 1;
        while self.it.next_if(|(_, c)| !c.is_whitespace() && *c != ':' && *c != '#').is_some() {
            len += 1;
        }
        let end = self.it.peek().map(|(i, _)| *i).unwrap_or_else(|| self.text.len());
        let slice = &self.text[offset..end];
        let span = Span::new(self.line, self.col, len);
        self.col += len;
        if self.it.next_if(|(_, c)| *c == ':').is_some() {
            self.col += 1;
            Token { span, kind: TokenKind::Label(slice) }
        } else {
            Token { span, kind: TokenKind::Word(slice) }
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (offset, c) = self.it.next()?;
            match c {
                '\n' => {
                    let t = Token {
                        span: Span::new(self.line, self.col, 1),
                        kind: TokenKind::Newline,
                    };
                    self.line += 1;
                    self.col = 1;
                    return Some(Ok(t));
                }
                // Comments run to the end of the line but leave the newline in place.
                '#' => while self.it.next_if(|(_, c)| *c != '\n').is_some() {},
                ':' => {
                    let e = Error::new(
                        Position::Span(Span::new(self.line, self.col, 1)),
                        "Unexpected ':' without a label.",
                    );
                    self.col += 1;
                    return Some(Err(e));
                }
                c if c.is_whitespace() => self.col += 1,
                _ => return Some(Ok(self.word(offset))),
            }
        }
    }
}

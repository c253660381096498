//! Reader for the line oriented domain/problem text format.
//!
//! A line holding a label (a word glued to a `:`) opens a section. Words written
//! before the label on that line belong to the label (`Initial state:`), words
//! after it and on the following unlabelled lines are the section's items.

pub mod ast;
pub mod lexer;

use std::fmt;

use thiserror::Error;

use lexer::{Lexer, Token, TokenKind};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    pub line: usize,
    pub col: usize,
    pub len: usize,
}

impl Span {
    pub fn new(line: usize, col: usize, len: usize) -> Self {
        Self { line, col, len }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Position {
    Span(Span),
    Eof,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Span(span) => write!(f, "line:{} col:{}", span.line, span.col),
            Position::Eof => write!(f, "end of file:"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
#[error("{pos} {message}")]
pub struct Error {
    pub pos: Position,
    pub message: String,
}

impl Error {
    pub fn new(pos: Position, message: &str) -> Self {
        Self { pos, message: message.to_owned() }
    }

    fn at(span: Span, message: String) -> Self {
        Self { pos: Position::Span(span), message }
    }
}

/// One labelled block of the file.
#[derive(Debug)]
struct Section<'a> {
    label: String,
    span: Span,
    items: Vec<ast::Name<'a>>,
}

impl<'a> Section<'a> {
    fn expect_no_items(&self) -> Result<(), Error> {
        match self.items.first() {
            Some(item) => Err(Error::at(
                item.span,
                format!("Unexpected '{}' after '{}:'.", item.text, self.label),
            )),
            None => Ok(()),
        }
    }

    fn expect_single_item(&self) -> Result<ast::Name<'a>, Error> {
        match self.items.as_slice() {
            [item] => Ok(*item),
            [] => Err(Error::at(self.span, format!("Expected a name after '{}:'.", self.label))),
            [_, extra, ..] => Err(Error::at(
                extra.span,
                format!("Expected a single name after '{}:'.", self.label),
            )),
        }
    }
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(code: &'a str) -> Self {
        Self { lexer: Lexer::new(code) }
    }

    fn sections(&mut self) -> Result<Vec<Section<'a>>, Error> {
        let mut sections: Vec<Section<'a>> = Vec::new();
        // words on the current line not yet assigned to a label or a section
        let mut pending: Vec<ast::Name<'a>> = Vec::new();
        let mut labelled_line = false;
        fn flush<'a>(
            sections: &mut Vec<Section<'a>>,
            pending: &mut Vec<ast::Name<'a>>,
        ) -> Result<(), Error> {
            if pending.is_empty() {
                return Ok(());
            }
            match sections.last_mut() {
                Some(section) => {
                    section.items.append(pending);
                    Ok(())
                }
                None => Err(Error::at(
                    pending[0].span,
                    format!("Expected a section label before '{}'.", pending[0].text),
                )),
            }
        }
        for token in self.lexer.by_ref() {
            let Token { span, kind } = token?;
            match kind {
                TokenKind::Word(text) => {
                    let name = ast::Name { text, span };
                    match sections.last_mut() {
                        Some(section) if labelled_line => section.items.push(name),
                        _ => pending.push(name),
                    }
                }
                TokenKind::Label(text) => {
                    if labelled_line {
                        return Err(Error::at(
                            span,
                            format!("Unexpected label '{}:', one label per line.", text),
                        ));
                    }
                    let label_span = pending.first().map(|n| n.span).unwrap_or(span);
                    let label = pending
                        .drain(..)
                        .map(|n| n.text)
                        .chain(std::iter::once(text))
                        .collect::<Vec<_>>()
                        .join(" ")
                        .to_lowercase();
                    sections.push(Section { label, span: label_span, items: Vec::new() });
                    labelled_line = true;
                }
                TokenKind::Newline => {
                    flush(&mut sections, &mut pending)?;
                    labelled_line = false;
                }
            }
        }
        flush(&mut sections, &mut pending)?;
        Ok(sections)
    }

    /// Parses a domain file: the proposition universe followed by the actions.
    pub fn domain(mut self) -> Result<ast::Domain<'a>, Error> {
        let mut propositions = Vec::new();
        let mut actions: Vec<ast::Action<'a>> = Vec::new();
        let mut seen_actions = false;
        // which lists of the current action were already given
        let mut given = [false; 3];
        for section in self.sections()? {
            match section.label.as_str() {
                "propositions" => {
                    if seen_actions {
                        return Err(Error::at(
                            section.span,
                            String::from("'Propositions:' must come before 'Actions:'."),
                        ));
                    }
                    propositions.extend(section.items);
                }
                "actions" => {
                    section.expect_no_items()?;
                    seen_actions = true;
                }
                "name" => {
                    if !seen_actions {
                        return Err(Error::at(
                            section.span,
                            String::from("Expected 'Actions:' before the first 'Name:'."),
                        ));
                    }
                    let name = section.expect_single_item()?;
                    actions.push(ast::Action {
                        name,
                        preconditions: Vec::new(),
                        add: Vec::new(),
                        delete: Vec::new(),
                    });
                    given = [false; 3];
                }
                label @ ("pre" | "precondition" | "preconditions" | "add" | "delete" | "del") => {
                    let action = match actions.last_mut() {
                        Some(action) => action,
                        None => {
                            let message = format!("'{}:' must follow 'Name:'.", label);
                            return Err(Error::at(section.span, message));
                        }
                    };
                    let (slot, list) = match label {
                        "add" => (1, &mut action.add),
                        "delete" | "del" => (2, &mut action.delete),
                        _ => (0, &mut action.preconditions),
                    };
                    if given[slot] {
                        return Err(Error::at(
                            section.span,
                            format!("'{}:' given twice for action '{}'.", label, action.name.text),
                        ));
                    }
                    given[slot] = true;
                    list.extend(section.items);
                }
                other => {
                    return Err(Error::at(section.span, format!("Unknown section '{}:'.", other)))
                }
            }
        }
        if !seen_actions {
            return Err(Error::new(Position::Eof, "Missing 'Actions:' section."));
        }
        Ok(ast::Domain { propositions, actions })
    }

    /// Parses a problem file: the initial and goal states.
    pub fn problem(mut self) -> Result<ast::Problem<'a>, Error> {
        let mut initial = None;
        let mut goal = None;
        for section in self.sections()? {
            let slot = match section.label.as_str() {
                "initial state" | "init" => &mut initial,
                "goal state" | "goal" => &mut goal,
                other => {
                    return Err(Error::at(section.span, format!("Unknown section '{}:'.", other)))
                }
            };
            if slot.is_some() {
                return Err(Error::at(
                    section.span,
                    format!("Section '{}:' given twice.", section.label),
                ));
            }
            *slot = Some(section.items);
        }
        match (initial, goal) {
            (Some(initial), Some(goal)) => Ok(ast::Problem { initial, goal }),
            (None, _) => Err(Error::new(Position::Eof, "Missing 'Initial state:' section.")),
            (_, None) => Err(Error::new(Position::Eof, "Missing 'Goal state:' section.")),
        }
    }
}

//! Markup tokenizer

use crate::cursor::{is_whitespace, Cursor};
use crate::error::{ParseError, ParseErrorKind, Pos, Span};
use crate::escape::{self, is_name_char, is_name_start};
use crate::tree::Attributes;

/// A lexical unit of markup
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    StartTag {
        name: String,
        attributes: Attributes,
        self_closing: bool,
    },
    EndTag {
        name: String,
    },
    /// Entity-decoded character data
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction {
        target: String,
        data: String,
    },
    Doctype(String),
}

/// Splits markup bytes into tokens
#[derive(Debug)]
pub struct Tokenizer<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Tokenizer<'a> {
    pub const fn new(input: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(input),
        }
    }

    pub const fn position(&self) -> Pos {
        self.cursor.position()
    }

    /// Next token and its span, `None` at end of input
    pub fn next_token(&mut self) -> Result<Option<(Token, Span)>, ParseError> {
        if self.cursor.is_eof() {
            return Ok(None);
        }

        let start = self.cursor.position();
        let token = if self.cursor.current() == Some(b'<') {
            self.markup()?
        } else {
            self.text()?
        };
        Ok(Some((token, Span::new(start, self.cursor.position()))))
    }

    fn markup(&mut self) -> Result<Token, ParseError> {
        if self.cursor.eat(b"<!--") {
            let body = self.take_until(b"-->", "comment")?;
            return Ok(Token::Comment(body));
        }
        if self.cursor.eat(b"<![CDATA[") {
            let body = self.take_until(b"]]>", "cdata section")?;
            return Ok(Token::CData(body));
        }
        if self.cursor.eat(b"<!DOCTYPE") {
            return self.doctype();
        }
        if self.cursor.eat(b"<?") {
            return self.processing_instruction();
        }
        if self.cursor.eat(b"</") {
            let name = self.name()?;
            self.cursor.skip_whitespace();
            self.expect(b'>')?;
            return Ok(Token::EndTag { name });
        }

        self.expect(b'<')?;
        self.start_tag()
    }

    fn start_tag(&mut self) -> Result<Token, ParseError> {
        let name = self.name()?;
        let mut attributes = Attributes::new();

        loop {
            let had_space = self.skip_whitespace();
            match self.cursor.current() {
                Some(b'>') => {
                    self.cursor.advance();
                    return Ok(Token::StartTag {
                        name,
                        attributes,
                        self_closing: false,
                    });
                }
                Some(b'/') => {
                    self.cursor.advance();
                    self.expect(b'>')?;
                    return Ok(Token::StartTag {
                        name,
                        attributes,
                        self_closing: true,
                    });
                }
                Some(_) if !had_space => {
                    return Err(self.error_here(ParseErrorKind::InvalidAttribute));
                }
                Some(_) => {}
                None => return Err(self.error_here(ParseErrorKind::UnexpectedEof)),
            }

            let attr_pos = self.cursor.position();
            let attr_name = self.name()?;
            self.cursor.skip_whitespace();
            if !self.cursor.eat(b"=") {
                return Err(self.error_here(ParseErrorKind::InvalidAttribute));
            }
            self.cursor.skip_whitespace();
            let value = self.attribute_value()?;

            if attributes.contains_key(&attr_name) {
                return Err(ParseError::at(
                    ParseErrorKind::DuplicateAttribute { name: attr_name },
                    attr_pos,
                ));
            }
            attributes.insert(attr_name, value);
        }
    }

    fn attribute_value(&mut self) -> Result<String, ParseError> {
        let quote = match self.cursor.current() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => {
                return Err(ParseError::with_message(
                    ParseErrorKind::InvalidAttribute,
                    Span::at(self.cursor.position()),
                    "expected quoted attribute value",
                ))
            }
        };
        self.cursor.advance();

        let value_pos = self.cursor.position();
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = to_str(self.cursor.slice_from(start), value_pos)?;
                self.cursor.advance();
                return decode(raw, value_pos);
            }
            if b == b'<' {
                return Err(ParseError::with_message(
                    ParseErrorKind::InvalidAttribute,
                    Span::at(self.cursor.position()),
                    "`<` is not allowed in attribute values",
                ));
            }
            self.cursor.advance();
        }

        Err(ParseError::at(
            ParseErrorKind::Unterminated {
                construct: "attribute value",
            },
            value_pos,
        ))
    }

    fn text(&mut self) -> Result<Token, ParseError> {
        let text_pos = self.cursor.position();
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let raw = to_str(self.cursor.slice_from(start), text_pos)?;
        Ok(Token::Text(decode(raw, text_pos)?))
    }

    fn processing_instruction(&mut self) -> Result<Token, ParseError> {
        let target = self.name()?;
        if self.cursor.eat(b"?>") {
            return Ok(Token::ProcessingInstruction {
                target,
                data: String::new(),
            });
        }
        if !self.skip_whitespace() {
            return Err(self.error_here(ParseErrorKind::UnexpectedToken));
        }
        let data = self.take_until(b"?>", "processing instruction")?;
        Ok(Token::ProcessingInstruction { target, data })
    }

    /// Body of `<!DOCTYPE ...>`; an internal subset in `[...]` may contain `>`
    fn doctype(&mut self) -> Result<Token, ParseError> {
        let doctype_pos = self.cursor.position();
        if !self.skip_whitespace() {
            return Err(self.error_here(ParseErrorKind::UnexpectedToken));
        }

        let start = self.cursor.pos();
        let mut depth = 0usize;
        let mut quote: Option<u8> = None;
        while let Some(b) = self.cursor.current() {
            match (quote, b) {
                (Some(q), _) if b == q => quote = None,
                (Some(_), _) => {}
                (None, b'"' | b'\'') => quote = Some(b),
                (None, b'[') => depth += 1,
                (None, b']') => depth = depth.saturating_sub(1),
                (None, b'>') if depth == 0 => {
                    let body = to_str(self.cursor.slice_from(start), doctype_pos)?;
                    self.cursor.advance();
                    return Ok(Token::Doctype(body.trim_end().to_string()));
                }
                (None, _) => {}
            }
            self.cursor.advance();
        }

        Err(ParseError::at(
            ParseErrorKind::Unterminated {
                construct: "doctype",
            },
            doctype_pos,
        ))
    }

    fn name(&mut self) -> Result<String, ParseError> {
        let name_pos = self.cursor.position();
        let start = self.cursor.pos();

        match self.cursor.current() {
            Some(first) if is_name_start(first) => self.cursor.advance(),
            Some(_) => return Err(ParseError::at(ParseErrorKind::InvalidName, name_pos)),
            None => return Err(ParseError::at(ParseErrorKind::UnexpectedEof, name_pos)),
        }
        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        to_str(self.cursor.slice_from(start), name_pos).map(str::to_string)
    }

    fn take_until(&mut self, pattern: &[u8], construct: &'static str) -> Result<String, ParseError> {
        let start = self.cursor.position();
        let body = self
            .cursor
            .take_until(pattern)
            .ok_or_else(|| ParseError::at(ParseErrorKind::Unterminated { construct }, start))?;
        to_str(body, start).map(str::to_string)
    }

    /// Skip whitespace, reporting whether any was present
    fn skip_whitespace(&mut self) -> bool {
        let skipped = self.cursor.current().is_some_and(is_whitespace);
        self.cursor.skip_whitespace();
        skipped
    }

    fn expect(&mut self, expected: u8) -> Result<(), ParseError> {
        match self.cursor.current() {
            Some(b) if b == expected => {
                self.cursor.advance();
                Ok(())
            }
            Some(_) => Err(self.error_here(ParseErrorKind::UnexpectedToken)),
            None => Err(self.error_here(ParseErrorKind::UnexpectedEof)),
        }
    }

    fn error_here(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::at(kind, self.cursor.position())
    }
}

fn to_str(bytes: &[u8], pos: Pos) -> Result<&str, ParseError> {
    std::str::from_utf8(bytes).map_err(|_| ParseError::at(ParseErrorKind::InvalidUtf8, pos))
}

fn decode(raw: &str, pos: Pos) -> Result<String, ParseError> {
    escape::decode(raw)
        .map(|text| text.into_owned())
        .map_err(|entity| ParseError::at(ParseErrorKind::InvalidEntity { entity }, pos))
}

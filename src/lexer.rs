use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    TagOpen(String),      // <name
    CloseTagOpen(String), // </name
    Ident(String),        // attribute name
    Str(String),          // attribute value, decoded
    Text(String),         // character data, decoded (CDATA included)

    Eq,         // =
    TagEnd,     // >
    EmptyTagEnd, // />

    Eof,
}

#[derive(Debug, thiserror::Error)]
pub enum LexError {
    #[error("Unexpected character: {0:?}")]
    UnexpectedChar(char),
    #[error("Unterminated string")]
    UnterminatedString,
    #[error("Unterminated {0}")]
    Unterminated(&'static str),
    #[error("Unknown entity: &{0};")]
    UnknownEntity(String),
    #[error("Invalid character reference: &{0};")]
    InvalidCharRef(String),
}

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    in_tag: bool,
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == ':'
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_alphanumeric() || c == '-' || c == '.'
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut chars = input.chars().peekable();
        // Byte order mark
        if chars.peek() == Some(&'\u{feff}') {
            chars.next();
        }
        Self {
            chars,
            in_tag: false,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() {
                self.chars.next();
            } else {
                break;
            }
        }
    }

    /// Consume input up to and including `terminator`.
    fn skip_until(&mut self, terminator: &str, what: &'static str) -> Result<String, LexError> {
        let mut s = String::new();
        loop {
            match self.chars.next() {
                Some(c) => {
                    s.push(c);
                    if s.ends_with(terminator) {
                        s.truncate(s.len() - terminator.len());
                        return Ok(s);
                    }
                }
                None => return Err(LexError::Unterminated(what)),
            }
        }
    }

    fn expect_literal(&mut self, literal: &str) -> Result<(), LexError> {
        for expected in literal.chars() {
            match self.chars.next() {
                Some(c) if c == expected => {}
                Some(c) => return Err(LexError::UnexpectedChar(c)),
                None => return Err(LexError::Unterminated("markup declaration")),
            }
        }
        Ok(())
    }

    fn skip_doctype(&mut self) -> Result<(), LexError> {
        // Internal subsets may contain '>' inside brackets.
        let mut depth = 0usize;
        loop {
            match self.chars.next() {
                Some('[') => depth += 1,
                Some(']') => depth = depth.saturating_sub(1),
                Some('>') if depth == 0 => return Ok(()),
                Some(_) => {}
                None => return Err(LexError::Unterminated("DOCTYPE")),
            }
        }
    }

    fn read_name(&mut self, first: char) -> String {
        let mut s = String::from(first);
        while let Some(&c) = self.chars.peek() {
            if is_name_char(c) {
                s.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        s
    }

    fn expect_name(&mut self) -> Result<String, LexError> {
        match self.chars.next() {
            Some(c) if is_name_start(c) => Ok(self.read_name(c)),
            Some(c) => Err(LexError::UnexpectedChar(c)),
            None => Err(LexError::Unterminated("tag")),
        }
    }

    fn read_entity(&mut self) -> Result<char, LexError> {
        let mut name = String::new();
        loop {
            match self.chars.next() {
                Some(';') => break,
                Some(c) if c == '#' || is_name_char(c) => name.push(c),
                Some(c) => return Err(LexError::UnexpectedChar(c)),
                None => return Err(LexError::Unterminated("entity reference")),
            }
        }

        match name.as_str() {
            "lt" => Ok('<'),
            "gt" => Ok('>'),
            "amp" => Ok('&'),
            "quot" => Ok('"'),
            "apos" => Ok('\''),
            _ => {
                let Some(num) = name.strip_prefix('#') else {
                    return Err(LexError::UnknownEntity(name));
                };
                let code = match num.strip_prefix('x') {
                    Some(hex) => u32::from_str_radix(hex, 16),
                    None => num.parse(),
                };
                code.ok()
                    .and_then(char::from_u32)
                    .ok_or(LexError::InvalidCharRef(name))
            }
        }
    }

    fn read_string(&mut self, quote: char) -> Result<String, LexError> {
        let mut s = String::new();
        loop {
            match self.chars.next() {
                Some(c) if c == quote => return Ok(s),
                Some('&') => s.push(self.read_entity()?),
                Some('<') => return Err(LexError::UnexpectedChar('<')),
                // Attribute value normalization; a CRLF pair is one line break
                Some('\r') => {
                    self.chars.next_if_eq(&'\n');
                    s.push(' ');
                }
                Some('\n' | '\t') => s.push(' '),
                Some(c) => s.push(c),
                None => return Err(LexError::UnterminatedString),
            }
        }
    }

    fn read_text(&mut self, first: char) -> Result<String, LexError> {
        let mut s = String::new();
        if first == '&' {
            s.push(self.read_entity()?);
        } else {
            s.push(first);
        }
        while let Some(&c) = self.chars.peek() {
            match c {
                '<' => break,
                '&' => {
                    self.chars.next();
                    s.push(self.read_entity()?);
                }
                _ => {
                    s.push(c);
                    self.chars.next();
                }
            }
        }
        Ok(s)
    }

    fn next_tag_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        let c = match self.chars.next() {
            Some(c) => c,
            None => return Err(LexError::Unterminated("tag")),
        };

        let tok = match c {
            '>' => {
                self.in_tag = false;
                Token::TagEnd
            }
            '/' => {
                self.expect_literal(">")?;
                self.in_tag = false;
                Token::EmptyTagEnd
            }
            '=' => Token::Eq,
            '"' | '\'' => Token::Str(self.read_string(c)?),
            c if is_name_start(c) => Token::Ident(self.read_name(c)),
            _ => return Err(LexError::UnexpectedChar(c)),
        };

        Ok(tok)
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        if self.in_tag {
            return self.next_tag_token();
        }

        loop {
            let c = match self.chars.next() {
                Some(c) => c,
                None => return Ok(Token::Eof),
            };

            if c != '<' {
                return Ok(Token::Text(self.read_text(c)?));
            }

            match self.chars.next() {
                Some('?') => {
                    self.skip_until("?>", "processing instruction")?;
                }
                Some('!') => match self.chars.peek() {
                    Some('-') => {
                        self.expect_literal("--")?;
                        self.skip_until("-->", "comment")?;
                    }
                    Some('[') => {
                        self.expect_literal("[CDATA[")?;
                        return Ok(Token::Text(self.skip_until("]]>", "CDATA section")?));
                    }
                    _ => {
                        self.expect_literal("DOCTYPE")?;
                        self.skip_doctype()?;
                    }
                },
                Some('/') => {
                    let name = self.expect_name()?;
                    self.in_tag = true;
                    return Ok(Token::CloseTagOpen(name));
                }
                Some(c) if is_name_start(c) => {
                    let name = self.read_name(c);
                    self.in_tag = true;
                    return Ok(Token::TagOpen(name));
                }
                Some(c) => return Err(LexError::UnexpectedChar(c)),
                None => return Err(LexError::Unterminated("tag")),
            }
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            if tok == Token::Eof {
                tokens.push(tok);
                break;
            }
            tokens.push(tok);
        }
        Ok(tokens)
    }
}

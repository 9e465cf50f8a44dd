use crate::ast::Schema;
use crate::dom::{Document, Element};
use crate::lexer::{LexError, Lexer, Token};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Lex error: {0}")]
    Lex(#[from] LexError),
    #[error("Unexpected token: {0:?}, expected {1}")]
    Unexpected(Token, &'static str),
    #[error("Unexpected end of input")]
    UnexpectedEof,
    #[error("Mismatched closing tag: expected </{expected}>, found </{found}>")]
    MismatchedTag { expected: String, found: String },
    #[error("Duplicate attribute {attr} on <{element}>")]
    DuplicateAttribute { element: String, attr: String },
    #[error("Document has no root element")]
    MissingRoot,
    #[error("Content after the root element")]
    TrailingContent,
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(input: &str) -> Result<Self, ParseError> {
        let tokens = Lexer::new(input).tokenize()?;
        Ok(Self { tokens, pos: 0 })
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> &Token {
        let tok = self.tokens.get(self.pos).unwrap_or(&Token::Eof);
        self.pos += 1;
        tok
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        let tok = self.advance().clone();
        if tok == expected {
            Ok(())
        } else if tok == Token::Eof {
            Err(ParseError::UnexpectedEof)
        } else {
            Err(ParseError::Unexpected(tok, "specific token"))
        }
    }

    /// Skip whitespace-only text; anything else outside the root is an error.
    fn skip_misc(&mut self) -> Result<(), ParseError> {
        while let Token::Text(text) = self.peek() {
            if !text.trim().is_empty() {
                return Err(ParseError::Unexpected(self.peek().clone(), "element"));
            }
            self.advance();
        }
        Ok(())
    }

    pub fn parse(&mut self) -> Result<Document, ParseError> {
        self.skip_misc()?;

        let root = match self.peek().clone() {
            Token::TagOpen(name) => {
                self.advance();
                self.parse_element(name)?
            }
            Token::Eof => return Err(ParseError::MissingRoot),
            tok => return Err(ParseError::Unexpected(tok, "root element")),
        };

        self.skip_misc().map_err(|_| ParseError::TrailingContent)?;
        if *self.peek() != Token::Eof {
            return Err(ParseError::TrailingContent);
        }

        Ok(Document { root })
    }

    /// Parse the attributes of a start tag whose `<name` has already been
    /// consumed. Returns the element and whether the tag was self-closing.
    fn parse_start_tag(&mut self, name: String) -> Result<(Element, bool), ParseError> {
        let mut element = Element::new(name);

        loop {
            match self.advance().clone() {
                Token::Ident(attr) => {
                    self.expect(Token::Eq)?;
                    let value = match self.advance().clone() {
                        Token::Str(s) => s,
                        Token::Eof => return Err(ParseError::UnexpectedEof),
                        tok => return Err(ParseError::Unexpected(tok, "quoted attribute value")),
                    };
                    if element.attr(&attr).is_some() {
                        return Err(ParseError::DuplicateAttribute {
                            element: element.name.clone(),
                            attr,
                        });
                    }
                    element.attributes.push((attr, value));
                }
                Token::EmptyTagEnd => return Ok((element, true)),
                Token::TagEnd => return Ok((element, false)),
                Token::Eof => return Err(ParseError::UnexpectedEof),
                tok => return Err(ParseError::Unexpected(tok, "attribute or end of tag")),
            }
        }
    }

    /// Parse an element whose `<name` has already been consumed.
    ///
    /// Open elements live on an explicit stack, so nesting depth is bounded
    /// by memory rather than by the call stack.
    fn parse_element(&mut self, name: String) -> Result<Element, ParseError> {
        let (root, empty) = self.parse_start_tag(name)?;
        if empty {
            return Ok(root);
        }

        let mut open = vec![root];
        while let Some(current) = open.last_mut() {
            match self.advance().clone() {
                Token::Text(text) => current.text.push_str(&text),
                Token::TagOpen(child) => {
                    let (child, empty) = self.parse_start_tag(child)?;
                    if empty {
                        current.children.push(child);
                    } else {
                        open.push(child);
                    }
                }
                Token::CloseTagOpen(found) => {
                    if found != current.name {
                        return Err(ParseError::MismatchedTag {
                            expected: current.name.clone(),
                            found,
                        });
                    }
                    self.expect(Token::TagEnd)?;
                    let Some(done) = open.pop() else { break };
                    match open.last_mut() {
                        Some(parent) => parent.children.push(done),
                        None => return Ok(done),
                    }
                }
                Token::Eof => return Err(ParseError::UnexpectedEof),
                tok => return Err(ParseError::Unexpected(tok, "content or closing tag")),
            }
        }
        Err(ParseError::UnexpectedEof)
    }
}

/// Parse XML text into the generic element tree.
pub fn parse_document(input: &str) -> Result<Document, ParseError> {
    Parser::new(input)?.parse()
}

/// Parse XML text straight into the typed schema model.
pub fn parse_schema(input: &str) -> Result<Schema, ParseError> {
    let document = parse_document(input)?;
    Ok(Schema::from_document(&document))
}

//! Declaration-level reading of Java compilation units
//!
//! Only what hierarchy resolution needs is kept: the package, imports, and for
//! every type its name, kind, superclass and field visibilities. Method bodies,
//! initializers, generics and annotations are skipped.

use crate::error::{ResolveError, ResolveResult};
use crate::lexer::{LexError, Token, tokenize_with_lines};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// A compilation unit that could not be read, with the 1-based line of the failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            line: err.line,
            message: err.message,
        }
    }
}

/// Declared access level of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Protected,
    #[serde(alias = "package-private")]
    Package,
    Private,
}

impl Visibility {
    /// Private or protected members cannot be touched directly from generated mappers.
    pub fn is_restricted(self) -> bool {
        matches!(self, Visibility::Private | Visibility::Protected)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    pub path: String,
    pub is_static: bool,
    pub is_wildcard: bool,
}

impl ImportDecl {
    /// Simple name bound by a single-type import
    pub fn simple_name(&self) -> Option<&str> {
        if self.is_wildcard || self.is_static {
            return None;
        }
        self.path.rsplit('.').next()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub name: String,
    pub kind: TypeKind,
    /// Superclass as written, without type arguments
    pub extends: Option<String>,
    pub fields: Vec<FieldDecl>,
    pub nested: Vec<TypeDecl>,
}

impl TypeDecl {
    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A parsed `.java` file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilationUnit {
    pub package: Option<String>,
    pub imports: Vec<ImportDecl>,
    pub types: Vec<TypeDecl>,
}

impl CompilationUnit {
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let tokens = tokenize_with_lines(source)?;
        Parser::new(tokens).compilation_unit()
    }

    pub fn parse_file(path: &Path) -> ResolveResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| ResolveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&source).map_err(|err| ResolveError::MalformedSource {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
    }

    /// Top-level type declared under `name`
    pub fn find_type(&self, name: &str) -> Option<&TypeDecl> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Fully qualified name bound to `simple` by a single-type import
    pub fn import_for(&self, simple: &str) -> Option<&str> {
        self.imports
            .iter()
            .find(|i| i.simple_name() == Some(simple))
            .map(|i| i.path.as_str())
    }
}

#[derive(Debug, Clone, Copy)]
struct Modifiers {
    visibility: Option<Visibility>,
    is_static: bool,
}

const MODIFIERS: &[&str] = &[
    "abstract",
    "final",
    "static",
    "transient",
    "volatile",
    "synchronized",
    "native",
    "strictfp",
    "default",
    "sealed",
];

struct Parser {
    tokens: Vec<Token>,
    lines: Vec<usize>,
    pos: usize,
}

impl Parser {
    fn new(spanned: Vec<(Token, usize)>) -> Self {
        let (tokens, lines) = spanned.into_iter().unzip();
        Self {
            tokens,
            lines,
            pos: 0,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn at(&self, token: &Token) -> bool {
        self.peek() == Some(token)
    }

    fn at_keyword(&self, word: &str) -> bool {
        self.peek().is_some_and(|t| t.is_ident(word))
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.at(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, word: &str) -> bool {
        if self.at_keyword(word) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        let line = self
            .lines
            .get(self.pos)
            .or_else(|| self.lines.last())
            .copied()
            .unwrap_or(1);
        ParseError {
            line,
            message: message.into(),
        }
    }

    fn expect(&mut self, token: &Token) -> Result<(), ParseError> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(format!("expected {token:?}, found {:?}", self.peek())))
        }
    }

    fn ident(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Some(Token::Ident(name)) => {
                let name = name.clone();
                self.pos += 1;
                Ok(name)
            }
            other => Err(self.error(format!("expected identifier, found {other:?}"))),
        }
    }

    fn qualified_name(&mut self) -> Result<String, ParseError> {
        let mut name = self.ident()?;
        while self.at(&Token::Dot) && matches!(self.peek_at(1), Some(Token::Ident(_))) {
            self.pos += 1;
            name.push('.');
            name.push_str(&self.ident()?);
        }
        Ok(name)
    }

    fn compilation_unit(mut self) -> Result<CompilationUnit, ParseError> {
        let mut unit = CompilationUnit::default();

        self.modifiers()?;
        if self.eat_keyword("package") {
            unit.package = Some(self.qualified_name()?);
            self.expect(&Token::Semi)?;
        }

        while self.eat_keyword("import") {
            let is_static = self.eat_keyword("static");
            let path = self.qualified_name()?;
            let is_wildcard = self.eat(&Token::Dot) && self.eat(&Token::Other('*'));
            self.expect(&Token::Semi)?;
            unit.imports.push(ImportDecl {
                path,
                is_static,
                is_wildcard,
            });
        }

        while self.peek().is_some() {
            if self.eat(&Token::Semi) {
                continue;
            }
            self.modifiers()?;
            let decl = self.type_decl()?;
            unit.types.push(decl);
        }

        Ok(unit)
    }

    fn modifiers(&mut self) -> Result<Modifiers, ParseError> {
        let mut modifiers = Modifiers {
            visibility: None,
            is_static: false,
        };
        loop {
            match self.peek() {
                Some(Token::At) if self.peek_at(1).is_some_and(|t| t.is_ident("interface")) => {
                    break;
                }
                Some(Token::At) => self.annotation()?,
                Some(Token::Ident(word)) => {
                    let word = word.clone();
                    match word.as_str() {
                        "public" => modifiers.visibility = Some(Visibility::Public),
                        "protected" => modifiers.visibility = Some(Visibility::Protected),
                        "private" => modifiers.visibility = Some(Visibility::Private),
                        "static" => modifiers.is_static = true,
                        "non"
                            if self.peek_at(1) == Some(&Token::Other('-'))
                                && self.peek_at(2).is_some_and(|t| t.is_ident("sealed")) =>
                        {
                            self.pos += 2;
                        }
                        w if MODIFIERS.contains(&w) => {}
                        _ => break,
                    }
                    self.pos += 1;
                }
                _ => break,
            }
        }
        Ok(modifiers)
    }

    fn annotation(&mut self) -> Result<(), ParseError> {
        self.expect(&Token::At)?;
        self.qualified_name()?;
        if self.at(&Token::LParen) {
            self.skip_balanced(&Token::LParen, &Token::RParen)?;
        }
        Ok(())
    }

    fn at_type_decl(&self) -> bool {
        match self.peek() {
            Some(Token::At) => self.peek_at(1).is_some_and(|t| t.is_ident("interface")),
            Some(Token::Ident(word)) => {
                matches!(word.as_str(), "class" | "interface" | "enum")
                    || (word == "record"
                        && matches!(self.peek_at(1), Some(Token::Ident(_)))
                        && matches!(self.peek_at(2), Some(Token::LParen | Token::Lt)))
            }
            _ => false,
        }
    }

    fn type_decl(&mut self) -> Result<TypeDecl, ParseError> {
        let kind = match self.bump() {
            Some(Token::At) => {
                self.bump();
                TypeKind::Annotation
            }
            Some(Token::Ident(word)) => match word.as_str() {
                "class" => TypeKind::Class,
                "interface" => TypeKind::Interface,
                "enum" => TypeKind::Enum,
                "record" => TypeKind::Record,
                other => return Err(self.error(format!("expected type declaration, found {other}"))),
            },
            other => return Err(self.error(format!("expected type declaration, found {other:?}"))),
        };
        let name = self.ident()?;
        if self.at(&Token::Lt) {
            self.skip_balanced(&Token::Lt, &Token::Gt)?;
        }

        let mut fields = Vec::new();
        if kind == TypeKind::Record {
            fields = self.record_components()?;
        }

        let mut extends = None;
        if kind == TypeKind::Class && self.eat_keyword("extends") {
            extends = Some(self.type_name()?);
        }

        // implements / permits / interface extends lists
        while !self.at(&Token::LBrace) {
            if self.bump().is_none() {
                return Err(self.error(format!("missing body for type {name}")));
            }
        }

        let mut nested = Vec::new();
        self.type_body(kind, &name, &mut fields, &mut nested)?;

        Ok(TypeDecl {
            name,
            kind,
            extends,
            fields,
            nested,
        })
    }

    fn record_components(&mut self) -> Result<Vec<FieldDecl>, ParseError> {
        self.expect(&Token::LParen)?;
        let mut fields = Vec::new();
        while !self.eat(&Token::RParen) {
            self.modifiers()?;
            self.type_name()?;
            let name = self.ident()?;
            fields.push(FieldDecl {
                name,
                visibility: Visibility::Private,
                is_static: false,
            });
            if !self.eat(&Token::Comma) {
                self.expect(&Token::RParen)?;
                break;
            }
        }
        Ok(fields)
    }

    /// Type reference without type arguments or array dimensions
    fn type_name(&mut self) -> Result<String, ParseError> {
        self.modifiers()?;
        let name = self.qualified_name()?;
        if self.at(&Token::Lt) {
            self.skip_balanced(&Token::Lt, &Token::Gt)?;
        }
        // Type arguments on an outer type: Outer<T>.Inner
        let mut name = name;
        while self.at(&Token::Dot) && matches!(self.peek_at(1), Some(Token::Ident(_))) {
            self.pos += 1;
            name.push('.');
            name.push_str(&self.ident()?);
            if self.at(&Token::Lt) {
                self.skip_balanced(&Token::Lt, &Token::Gt)?;
            }
        }
        self.array_dims();
        // varargs
        while self.eat(&Token::Dot) {}
        Ok(name)
    }

    fn array_dims(&mut self) {
        while self.at(&Token::LBracket) && self.peek_at(1) == Some(&Token::RBracket) {
            self.pos += 2;
        }
    }

    fn type_body(
        &mut self,
        kind: TypeKind,
        type_name: &str,
        fields: &mut Vec<FieldDecl>,
        nested: &mut Vec<TypeDecl>,
    ) -> Result<(), ParseError> {
        self.expect(&Token::LBrace)?;

        if kind == TypeKind::Enum && self.enum_constants()? {
            return Ok(());
        }

        loop {
            match self.peek() {
                None => return Err(self.error("unterminated type body")),
                Some(Token::RBrace) => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(Token::Semi) => self.pos += 1,
                Some(Token::LBrace) => self.skip_balanced(&Token::LBrace, &Token::RBrace)?,
                Some(_) => self.member(kind, type_name, fields, nested)?,
            }
        }
    }

    /// Skips enum constants; returns true if the body closed with them.
    fn enum_constants(&mut self) -> Result<bool, ParseError> {
        loop {
            match self.peek() {
                None => return Err(self.error("unterminated enum body")),
                Some(Token::Semi) => {
                    self.pos += 1;
                    return Ok(false);
                }
                Some(Token::RBrace) => {
                    self.pos += 1;
                    return Ok(true);
                }
                Some(Token::LParen) => self.skip_balanced(&Token::LParen, &Token::RParen)?,
                Some(Token::LBrace) => self.skip_balanced(&Token::LBrace, &Token::RBrace)?,
                Some(_) => self.pos += 1,
            }
        }
    }

    fn member(
        &mut self,
        kind: TypeKind,
        type_name: &str,
        fields: &mut Vec<FieldDecl>,
        nested: &mut Vec<TypeDecl>,
    ) -> Result<(), ParseError> {
        let modifiers = self.modifiers()?;

        // static or instance initializer
        if self.at(&Token::LBrace) {
            return self.skip_balanced(&Token::LBrace, &Token::RBrace);
        }

        // compact canonical constructor: `Name { ... }`
        if kind == TypeKind::Record
            && self.at_keyword(type_name)
            && self.peek_at(1) == Some(&Token::LBrace)
        {
            self.pos += 1;
            return self.skip_balanced(&Token::LBrace, &Token::RBrace);
        }

        if self.at_type_decl() {
            nested.push(self.type_decl()?);
            return Ok(());
        }

        // generic method type parameters
        if self.at(&Token::Lt) {
            self.skip_balanced(&Token::Lt, &Token::Gt)?;
        }

        self.type_name()?;
        if self.at(&Token::LParen) {
            // constructor
            self.skip_balanced(&Token::LParen, &Token::RParen)?;
            return self.skip_method_rest();
        }

        let mut name = self.ident()?;
        if self.at(&Token::LParen) {
            self.skip_balanced(&Token::LParen, &Token::RParen)?;
            return self.skip_method_rest();
        }

        let visibility = if kind == TypeKind::Interface || kind == TypeKind::Annotation {
            Visibility::Public
        } else {
            modifiers.visibility.unwrap_or(Visibility::Package)
        };
        let is_static = modifiers.is_static || kind == TypeKind::Interface;

        loop {
            self.array_dims();
            if self.eat(&Token::Eq) {
                self.skip_initializer()?;
            }
            fields.push(FieldDecl {
                name,
                visibility,
                is_static,
            });
            if self.eat(&Token::Comma) {
                name = self.ident()?;
                continue;
            }
            return self.expect(&Token::Semi);
        }
    }

    /// Throws clause, annotation default value, then a body or `;`.
    fn skip_method_rest(&mut self) -> Result<(), ParseError> {
        loop {
            match self.peek() {
                None => return Err(self.error("unterminated method declaration")),
                Some(Token::Semi) => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(Token::LBrace) => return self.skip_balanced(&Token::LBrace, &Token::RBrace),
                Some(Token::LParen) => self.skip_balanced(&Token::LParen, &Token::RParen)?,
                Some(_) => self.pos += 1,
            }
        }
    }

    /// Consumes a field initializer up to the next declarator or the closing `;`.
    ///
    /// A comma only ends the initializer when it is followed by what looks like
    /// another declarator, so `new HashMap<K, V>()` stays in one piece.
    fn skip_initializer(&mut self) -> Result<(), ParseError> {
        loop {
            match self.peek() {
                None => return Err(self.error("unterminated field initializer")),
                Some(Token::Semi) => return Ok(()),
                Some(Token::Comma) if self.at_declarator(1) => return Ok(()),
                Some(Token::LParen) => self.skip_balanced(&Token::LParen, &Token::RParen)?,
                Some(Token::LBrace) => self.skip_balanced(&Token::LBrace, &Token::RBrace)?,
                Some(Token::LBracket) => {
                    self.skip_balanced(&Token::LBracket, &Token::RBracket)?
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn at_declarator(&self, offset: usize) -> bool {
        matches!(self.peek_at(offset), Some(Token::Ident(_)))
            && matches!(
                self.peek_at(offset + 1),
                Some(Token::Eq | Token::Comma | Token::Semi | Token::LBracket)
            )
    }

    fn skip_balanced(&mut self, open: &Token, close: &Token) -> Result<(), ParseError> {
        self.expect(open)?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.bump() {
                None => return Err(self.error(format!("unbalanced {open:?}"))),
                Some(token) if token == *open => depth += 1,
                Some(token) if token == *close => depth -= 1,
                Some(_) => {}
            }
        }
        Ok(())
    }
}

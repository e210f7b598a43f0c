//! Java code fragments

use serde::Serialize;
use std::fmt;

const INDENT: &str = "    ";

/// A generated Java fragment, either an expression or a complete statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "form", content = "code", rename_all = "snake_case")]
pub enum CodeBlock {
    Expression(String),
    Statement(String),
}

impl CodeBlock {
    pub fn expression(code: impl Into<String>) -> Self {
        CodeBlock::Expression(code.into())
    }

    /// A statement; a trailing `;` is added unless the code ends a block
    pub fn statement(code: impl Into<String>) -> Self {
        let mut code = code.into();
        if !code.ends_with(';') && !code.ends_with('}') {
            code.push(';');
        }
        CodeBlock::Statement(code)
    }

    /// `if (<condition>) { <body> }` with the body indented one level
    pub fn guarded(condition: &str, body: CodeBlock) -> Self {
        let body = match body {
            CodeBlock::Expression(code) => CodeBlock::statement(code),
            statement => statement,
        };

        let mut code = format!("if ({condition}) {{\n");
        for line in body.code().lines() {
            code.push_str(INDENT);
            code.push_str(line);
            code.push('\n');
        }
        code.push('}');
        CodeBlock::Statement(code)
    }

    pub fn code(&self) -> &str {
        match self {
            CodeBlock::Expression(code) | CodeBlock::Statement(code) => code,
        }
    }

    pub fn is_statement(&self) -> bool {
        matches!(self, CodeBlock::Statement(_))
    }
}

impl fmt::Display for CodeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

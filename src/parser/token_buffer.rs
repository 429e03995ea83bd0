use crate::lexer::{SpannedToken, Token};

/// Random access over a fully lexed token stream. Peeking past the end yields `Eof`.
pub struct TokenBuffer {
    tokens: Vec<SpannedToken>,
    position: usize,
    eof: Token,
}

impl TokenBuffer {
    pub fn new(tokens: Vec<SpannedToken>) -> Self {
        Self {
            tokens,
            position: 0,
            eof: Token::Eof,
        }
    }

    pub fn peek(&self, offset: usize) -> &Token {
        self.tokens
            .get(self.position + offset)
            .map(|t| &t.token)
            .unwrap_or(&self.eof)
    }

    /// The line of the current token, or of the last token once exhausted.
    pub fn line(&self) -> usize {
        self.tokens
            .get(self.position)
            .or_else(|| self.tokens.last())
            .map(|t| t.line)
            .unwrap_or(1)
    }

    pub fn consume(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }
}

use std::slice::Iter;

use crate::parser::types::Statement;

/// A sequence of statements: a module body or the body of any block.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Ast(Vec<Statement>);

impl Ast {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self(statements)
    }

    pub fn push(&mut self, statement: Statement) {
        self.0.push(statement);
    }

    pub fn iter(&self) -> Iter<'_, Statement> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&Statement> {
        self.0.first()
    }
}

impl<'a> IntoIterator for &'a Ast {
    type Item = &'a Statement;
    type IntoIter = Iter<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

macro_rules! ast {
    ($($stmt:expr),* $(,)?) => {
        $crate::parser::types::Ast::new(vec![$($stmt),*])
    };
}

pub(crate) use ast;

use crate::{
    domain::{FromImportPath, Identifier, ModulePath},
    lexer::Token,
    parser::{
        types::{FromImportItem, FromImportMode, RegularImport, StatementKind},
        Parser, ParserError,
    },
};

impl Parser {
    pub fn parse_module_path(&mut self) -> Result<ModulePath, ParserError> {
        let mut path = vec![self.parse_identifier()?];
        while self.consume_optional(&Token::Dot) {
            path.push(self.parse_identifier()?);
        }
        Ok(ModulePath::new(path))
    }

    pub fn parse_import_path(&mut self) -> Result<FromImportPath, ParserError> {
        let mut levels = 0;
        loop {
            match self.current_token() {
                Token::Dot => levels += 1,
                Token::Ellipsis => levels += 3,
                _ => break,
            }
            self.consume_current();
        }

        if levels == 0 {
            return Ok(FromImportPath::Absolute(self.parse_module_path()?));
        }

        let path = if self.current_token() == &Token::Import {
            ModulePath::new(vec![])
        } else {
            self.parse_module_path()?
        };
        Ok(FromImportPath::Relative(levels, path))
    }

    pub fn parse_optional_alias(&mut self) -> Result<Option<Identifier>, ParserError> {
        if self.consume_optional(&Token::As) {
            Ok(Some(self.parse_identifier()?))
        } else {
            Ok(None)
        }
    }

    pub(super) fn parse_regular_import(&mut self) -> Result<StatementKind, ParserError> {
        self.consume(&Token::Import)?;

        let mut imports = vec![];
        loop {
            let module_path = self.parse_module_path()?;
            let alias = self.parse_optional_alias()?;
            imports.push(RegularImport { module_path, alias });

            if !self.consume_optional(&Token::Comma) {
                break;
            }
        }

        Ok(StatementKind::RegularImport(imports))
    }

    pub(super) fn parse_selective_import(&mut self) -> Result<StatementKind, ParserError> {
        self.consume(&Token::From)?;
        let import_path = self.parse_import_path()?;
        self.consume(&Token::Import)?;

        if self.consume_optional(&Token::Asterisk) {
            return Ok(StatementKind::SelectiveImport {
                import_path,
                mode: FromImportMode::All,
            });
        }

        let parenthesized = self.consume_optional(&Token::LParen);
        let mut items = vec![];
        loop {
            if parenthesized && self.current_token() == &Token::RParen {
                break;
            }

            let identifier = self.parse_identifier()?;
            let alias = self.parse_optional_alias()?;
            items.push(FromImportItem { identifier, alias });

            if !self.consume_optional(&Token::Comma) {
                break;
            }
        }
        if parenthesized {
            self.consume(&Token::RParen)?;
        }

        if items.is_empty() {
            return Err(ParserError::syntax_error("invalid syntax"));
        }

        Ok(StatementKind::SelectiveImport {
            import_path,
            mode: FromImportMode::List(items),
        })
    }
}

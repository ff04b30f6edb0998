//! Markdown parser for glossary files.
//!
//! # Format
//! ```markdown
//! ID: 1
//! T: ISO 13485
//! D: Norme internationale pour les systèmes de management de la qualité.
//!
//! ID: 2
//! T: CAPA
//! D: Actions correctives et préventives.
//! Multiple lines are supported.
//! ```

use crate::error::GlossaryError;
use crate::types::Pair;
use std::collections::HashSet;

/// Parse markdown content into glossary pairs, in file order.
pub fn parse(content: &str) -> Result<Vec<Pair>, GlossaryError> {
    let mut pairs = Vec::new();
    if content.trim().is_empty() {
        return Ok(pairs);
    }

    let mut seen_ids = HashSet::new();
    let mut parser = Parser::new();

    for (idx, line) in content.lines().enumerate() {
        let line_num = idx + 1;
        if let Some(done) = parser.process_line(line, line_num)? {
            push_unique(&mut pairs, &mut seen_ids, done)?;
        }
    }

    if let Some(last) = parser.finish()? {
        push_unique(&mut pairs, &mut seen_ids, last)?;
    }
    Ok(pairs)
}

fn push_unique(
    pairs: &mut Vec<Pair>,
    seen_ids: &mut HashSet<i64>,
    (pair, line): (Pair, usize),
) -> Result<(), GlossaryError> {
    if !seen_ids.insert(pair.id) {
        return Err(GlossaryError::DuplicateId { id: pair.id, line });
    }
    pairs.push(pair);
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Term,
    Definition,
}

struct PairBuilder {
    id: Option<i64>,
    term: Option<String>,
    definition: Option<String>,
    start_line: usize,
}

impl PairBuilder {
    fn new(start_line: usize) -> Self {
        Self {
            id: None,
            term: None,
            definition: None,
            start_line,
        }
    }

    fn build(self) -> Result<(Pair, usize), GlossaryError> {
        let line = self.start_line;
        let id = self.id.ok_or(GlossaryError::MissingId { line })?;
        let term = self.term.ok_or(GlossaryError::MissingTerm { line })?;
        let definition = self
            .definition
            .ok_or(GlossaryError::MissingDefinition { line })?;

        Ok((
            Pair {
                id,
                term: term.trim().to_string(),
                definition: definition.trim().to_string(),
            },
            line,
        ))
    }
}

struct Parser {
    current: Option<PairBuilder>,
    current_field: Option<Field>,
    buffer: Vec<String>,
}

impl Parser {
    fn new() -> Self {
        Self {
            current: None,
            current_field: None,
            buffer: Vec::new(),
        }
    }

    /// Feed one line; returns a finished pair when an `ID:` line closes the previous block.
    fn process_line(
        &mut self,
        line: &str,
        line_num: usize,
    ) -> Result<Option<(Pair, usize)>, GlossaryError> {
        match Self::parse_line(line) {
            LineType::Id(id_str) => return self.handle_id(id_str, line_num),
            LineType::Term(text) => self.handle_field(Field::Term, text, line_num),
            LineType::Definition(text) => self.handle_field(Field::Definition, text, line_num),
            LineType::Text(text) => self.buffer.push(text.to_string()),
            LineType::Empty => self.buffer.push(String::new()),
        }
        Ok(None)
    }

    fn parse_line(line: &str) -> LineType<'_> {
        let trimmed = line.trim();

        if let Some(rest) = trimmed.strip_prefix("ID:") {
            LineType::Id(rest.trim())
        } else if let Some(rest) = trimmed.strip_prefix("T:") {
            LineType::Term(rest.trim())
        } else if let Some(rest) = trimmed.strip_prefix("D:") {
            LineType::Definition(rest.trim())
        } else if trimmed.is_empty() {
            LineType::Empty
        } else {
            LineType::Text(line)
        }
    }

    fn handle_id(
        &mut self,
        id_str: &str,
        line_num: usize,
    ) -> Result<Option<(Pair, usize)>, GlossaryError> {
        let id = id_str.parse::<i64>().map_err(|_| GlossaryError::InvalidId {
            line: line_num,
            value: id_str.to_string(),
        })?;

        let finished = self.finish()?;

        let mut builder = PairBuilder::new(line_num);
        builder.id = Some(id);
        self.current = Some(builder);
        Ok(finished)
    }

    fn handle_field(&mut self, field: Field, text: &str, line_num: usize) {
        self.flush_buffer();

        // A field before any ID still opens a block so the missing ID is reported
        if self.current.is_none() {
            self.current = Some(PairBuilder::new(line_num));
        }

        self.current_field = Some(field);
        self.buffer.push(text.to_string());
    }

    fn flush_buffer(&mut self) {
        if self.buffer.is_empty() {
            return;
        }

        let content = self.buffer.join("\n");
        self.buffer.clear();

        if let Some(ref mut pair) = self.current {
            match self.current_field {
                Some(Field::Term) => pair.term = Some(content),
                Some(Field::Definition) => pair.definition = Some(content),
                None => {}
            }
        }
    }

    fn finish(&mut self) -> Result<Option<(Pair, usize)>, GlossaryError> {
        self.flush_buffer();
        self.current_field = None;
        self.current.take().map(PairBuilder::build).transpose()
    }
}

enum LineType<'a> {
    Id(&'a str),
    Term(&'a str),
    Definition(&'a str),
    Text(&'a str),
    Empty,
}

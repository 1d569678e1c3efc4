//! Reading DIMACS CNF files and writing DIMACS style results.
//!
//! The accepted format is line oriented: comment lines start with `c`,
//! blank lines are ignored, exactly one `p cnf <vars> <clauses>` problem
//! line precedes all clauses, and every clause is a single line of
//! whitespace separated integer literals terminated by `0`. The declared
//! clause count is accepted but not enforced.

use std::io::{self, BufRead, BufReader, Read, Write};

use thiserror::Error;

use crate::formula::{Formula, Value};
use crate::lit::{Lit, Var};
use crate::search::Verdict;

/// Error while parsing a DIMACS CNF file.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Error while parsing an input line.
    #[error("{line}: {message}")]
    Syntax {
        /// Line number where the error was encountered.
        line: usize,
        /// Description of the encountered error.
        message: String,
    },
    /// IO error while reading the input file.
    #[error(transparent)]
    Io(#[from] io::Error),
}

fn syntax(line: usize, message: impl Into<String>) -> ParseError {
    ParseError::Syntax {
        line,
        message: message.into(),
    }
}

/// Header data of a DIMACS CNF file.
#[derive(Copy, Clone, Debug)]
pub struct Header {
    /// Declared number of variables; literals must stay within it.
    pub var_count: usize,
    /// Declared number of clauses, informational only.
    pub clause_count: usize,
}

/// Pull parser for the DIMACS CNF format.
///
/// Clauses are returned one at a time from a reused buffer.
pub struct Parser<R> {
    reader: R,
    buf: String,
    line: usize,
    header: Option<Header>,
    clause: Vec<Lit>,
}

impl<R: BufRead> Parser<R> {
    /// Initializes a parser from a buffered reader.
    pub fn new(reader: R) -> Self {
        Parser {
            reader,
            buf: String::new(),
            line: 0,
            header: None,
            clause: vec![],
        }
    }

    /// Parses and returns the problem line, skipping comments and blank
    /// lines before it.
    ///
    /// The result is cached, so this can be called at any point during
    /// parsing.
    pub fn header(&mut self) -> Result<Header, ParseError> {
        if let Some(header) = self.header {
            return Ok(header);
        }
        if !self.next_content_line()? {
            return Err(syntax(
                self.line + 1,
                "unexpected end of file, expected problem line",
            ));
        }
        let line = self.line;
        let mut tokens = self.buf.split_whitespace();
        match tokens.next() {
            Some("p") => {}
            Some(token) => {
                return Err(syntax(
                    line,
                    format!("unexpected {}, expected problem line", token),
                ))
            }
            None => unreachable!("content lines are not blank"),
        }
        match tokens.next() {
            Some("cnf") => {}
            Some(token) => {
                return Err(syntax(line, format!("unexpected {}, expected \"cnf\"", token)))
            }
            None => return Err(syntax(line, "unexpected end of line, expected \"cnf\"")),
        }
        let var_count = match tokens.next() {
            Some(token) => match token.parse::<usize>() {
                Ok(count) if count <= Var::MAX_VAR_COUNT => count,
                Ok(_) => {
                    return Err(syntax(line, format!("unsupported variable count {}", token)))
                }
                Err(_) => return Err(syntax(line, format!("invalid variable count {}", token))),
            },
            None => {
                return Err(syntax(line, "unexpected end of line, expected variable count"))
            }
        };
        let clause_count = match tokens.next() {
            Some(token) => match token.parse::<usize>() {
                Ok(count) => count,
                Err(_) => return Err(syntax(line, format!("invalid clause count {}", token))),
            },
            None => return Err(syntax(line, "unexpected end of line, expected clause count")),
        };
        if let Some(token) = tokens.next() {
            return Err(syntax(
                line,
                format!("unexpected {}, expected end of line", token),
            ));
        }
        let header = Header {
            var_count,
            clause_count,
        };
        self.header = Some(header);
        Ok(header)
    }

    /// Parses and returns the next clause, or `None` at the end of the
    /// file.
    ///
    /// The returned slice borrows the parser's clause buffer and is only
    /// valid until the next call.
    pub fn next_clause(&mut self) -> Result<Option<&[Lit]>, ParseError> {
        let header = self.header()?;
        self.clause.clear();
        if !self.next_content_line()? {
            return Ok(None);
        }
        let line = self.line;
        let mut terminated = false;
        for token in self.buf.split_whitespace() {
            if terminated {
                return Err(syntax(
                    line,
                    format!("unexpected {} after clause terminator", token),
                ));
            }
            let value: i64 = token
                .parse()
                .map_err(|_| syntax(line, format!("unexpected {}, expected literal", token)))?;
            if value == 0 {
                terminated = true;
                continue;
            }
            if value.unsigned_abs() > header.var_count as u64 {
                return Err(syntax(
                    line,
                    format!("literal {} outside specified range", value),
                ));
            }
            self.clause.push(Lit::from_dimacs(value as isize));
        }
        if !terminated {
            return Err(syntax(line, "missing clause terminator"));
        }
        if self.clause.is_empty() {
            return Err(syntax(line, "empty clause"));
        }
        Ok(Some(&self.clause))
    }

    /// Reads lines into the buffer until a non-comment, non-blank line or
    /// the end of the file is reached.
    fn next_content_line(&mut self) -> Result<bool, ParseError> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(false);
            }
            self.line += 1;
            let content = self.buf.trim();
            if content.is_empty() || content.starts_with('c') {
                continue;
            }
            return Ok(true);
        }
    }
}

impl<R: Read> Parser<BufReader<R>> {
    /// Initializes a parser with an underlying [`Read`] instance.
    pub fn from_read(read: R) -> Self {
        Parser::new(BufReader::new(read))
    }
}

/// Writes a verdict in the DIMACS result convention.
///
/// `Sat` produces a `SAT` line followed by the assignment: every assigned
/// variable in index order, positive when true and negated when false,
/// terminated by `0`. Variables that are still free are omitted. `Unsat`
/// produces a single `UNSAT` line. `Timeout` writes nothing; the caller
/// reports it out of band and produces no result file.
pub fn write_result(
    writer: &mut impl Write,
    formula: &Formula,
    verdict: Verdict,
) -> io::Result<()> {
    match verdict {
        Verdict::Sat => {
            writeln!(writer, "SAT")?;
            for var in formula.vars.keys() {
                match formula.vars[var].value {
                    Value::True => write!(writer, "{} ", var.dimacs())?,
                    Value::False => write!(writer, "-{} ", var.dimacs())?,
                    Value::Free => {}
                }
            }
            writeln!(writer, "0")
        }
        Verdict::Unsat => writeln!(writer, "UNSAT"),
        Verdict::Timeout => Ok(()),
    }
}

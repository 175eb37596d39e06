//! `print` and its output sinks

use crate::executor::types::Val;
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

/// Destination for `print` output, one call per printed line
pub trait Printer {
    fn print_line(&mut self, line: &str) -> io::Result<()>;
}

/// print(a, b, ...) - join the textual forms with single spaces
pub fn print(args: &[Val], printer: &mut dyn Printer) -> io::Result<()> {
    let line = args
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    printer.print_line(&line)
}

/// Writes each line to stdout and flushes immediately
#[derive(Debug, Default)]
pub struct StdoutPrinter;

impl Printer for StdoutPrinter {
    fn print_line(&mut self, line: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", line)?;
        out.flush()
    }
}

/// Captures printed lines in memory
///
/// Clones share the same buffer, so a caller can keep one handle and give
/// the other to the interpreter.
#[derive(Debug, Clone, Default)]
pub struct BufferPrinter {
    lines: Rc<RefCell<Vec<String>>>,
}

impl BufferPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

impl Printer for BufferPrinter {
    fn print_line(&mut self, line: &str) -> io::Result<()> {
        self.lines.borrow_mut().push(line.to_string());
        Ok(())
    }
}

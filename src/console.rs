use colored::Colorize;

/// Destination for the pipeline's status lines.
pub trait Console {
    fn info(&self, line: &str);
    fn warn(&self, line: &str);
    fn error(&self, line: &str);
}

/// Colored lines on stdout, errors on stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn info(&self, line: &str) {
        println!("{}", line);
    }

    fn warn(&self, line: &str) {
        println!("{}", line.yellow());
    }

    fn error(&self, line: &str) {
        eprintln!("{}", line.red());
    }
}

impl<C: Console + ?Sized> Console for &C {
    fn info(&self, line: &str) {
        (**self).info(line)
    }

    fn warn(&self, line: &str) {
        (**self).warn(line)
    }

    fn error(&self, line: &str) {
        (**self).error(line)
    }
}

/// Keeps every line in memory so tests can assert on them.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingConsole {
    lines: std::cell::RefCell<Vec<String>>,
}

#[cfg(test)]
impl RecordingConsole {
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

#[cfg(test)]
impl Console for RecordingConsole {
    fn info(&self, line: &str) {
        self.lines.borrow_mut().push(line.to_string());
    }

    fn warn(&self, line: &str) {
        self.lines.borrow_mut().push(line.to_string());
    }

    fn error(&self, line: &str) {
        self.lines.borrow_mut().push(line.to_string());
    }
}

use std::{
    fmt::{Display, Error, Formatter},
    path::PathBuf,
};

/// One entry of a traceback: which function was running, in which file, on which line.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DebugStackFrame {
    pub name: String,
    pub path: PathBuf,
    pub line: usize,
}

impl DebugStackFrame {
    pub fn new(name: impl Into<String>, path: PathBuf, line: usize) -> Self {
        Self {
            name: name.into(),
            path,
            line,
        }
    }
}

impl Display for DebugStackFrame {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(
            f,
            "  File \"{}\", line {}, in {}",
            self.path.display(),
            self.line,
            self.name
        )
    }
}

pub trait ToDebugStackFrame {
    fn to_stack_frame(&self) -> DebugStackFrame;
}

/// A snapshot of the interpreter call stack at the moment an exception was raised, outermost
/// frame first.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct DebugCallStack {
    frames: Vec<DebugStackFrame>,
}

impl DebugCallStack {
    pub fn new(frames: Vec<DebugStackFrame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[DebugStackFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The innermost frame, where the exception originated.
    pub fn last_frame(&self) -> Option<&DebugStackFrame> {
        self.frames.last()
    }
}

impl Display for DebugCallStack {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        if self.frames.is_empty() {
            return Ok(());
        }

        writeln!(f, "Traceback (most recent call last):")?;
        for frame in &self.frames {
            writeln!(f, "{frame}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_like_a_python_traceback() {
        let stack = DebugCallStack::new(vec![
            DebugStackFrame::new("<module>", PathBuf::from("/tmp/a.py"), 3),
            DebugStackFrame::new("boom", PathBuf::from("/tmp/a.py"), 1),
        ]);

        assert_eq!(
            stack.to_string(),
            "Traceback (most recent call last):\n  File \"/tmp/a.py\", line 3, in <module>\n  File \"/tmp/a.py\", line 1, in boom\n"
        );
        assert_eq!(stack.last_frame().map(|f| f.line), Some(1));
    }

    #[test]
    fn empty_stack_renders_nothing() {
        assert_eq!(DebugCallStack::default().to_string(), "");
    }
}

//! Indented text emission for generated builder code.
//!
//! The [`Emitter`] is the single sink every translator writes into. It owns
//! the output buffer and the current nesting depth; one emitter is created
//! per translation, so concurrent translations never share state.
//!
//! Depth is never adjusted by hand. Anything that opens a bracketed
//! sub-block goes through [`Emitter::nested`], which restores the depth on
//! every exit path, including early returns through `?`.

/// Accumulates generated code, one `\t` per nesting level.
#[derive(Debug, Default)]
pub struct Emitter {
    out: String,
    depth: usize,
}

impl Emitter {
    /// Creates an empty emitter at depth zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Appends text to the current line.
    pub fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    /// Starts a new line indented to the current depth.
    pub fn line(&mut self) {
        self.out.push('\n');
        for _ in 0..self.depth {
            self.out.push('\t');
        }
    }

    /// Runs `f` one level deeper, restoring the depth afterwards whether or
    /// not `f` succeeded.
    pub fn nested<T, E>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, E>,
    ) -> Result<T, E> {
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Consumes the emitter, returning the generated text.
    pub fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_prefixes_tabs_for_depth() {
        let mut e = Emitter::new();
        e.push("a(");
        e.nested::<_, ()>(|e| {
            e.line();
            e.push("b,");
            Ok(())
        })
        .unwrap();
        e.line();
        e.push(")");
        assert_eq!(e.finish(), "a(\n\tb,\n)");
    }

    #[test]
    fn depth_restored_after_error() {
        let mut e = Emitter::new();
        let result: Result<(), &str> = e.nested(|e| {
            e.line();
            Err("boom")
        });
        assert!(result.is_err());
        assert_eq!(e.depth(), 0);
    }

    #[test]
    fn nested_scopes_stack() {
        let mut e = Emitter::new();
        e.nested::<_, ()>(|e| {
            e.nested::<_, ()>(|e| {
                e.line();
                e.push("x");
                Ok(())
            })?;
            assert_eq!(e.depth(), 1);
            Ok(())
        })
        .unwrap();
        assert_eq!(e.depth(), 0);
        assert_eq!(e.finish(), "\n\t\tx");
    }
}

//! Append-only buffer of generated code

use crate::config::CodegenConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Fragment {
    indent: usize,
    text: String,
}

/// Ordered fragments of generated text plus the current indentation level
///
/// Each fragment remembers the level in force when it was appended; the
/// indentation is written at the start of every rendered line.
///
/// # Example
///
/// ```rust
/// use transform_codegen::codegen::CodeBuffer;
///
/// let mut buffer = CodeBuffer::new();
/// buffer.append_line("data _null_;");
/// buffer.indent();
/// buffer.append_line("put 'hello';");
/// buffer.unindent();
/// buffer.append_line("run;");
/// assert_eq!(buffer.render(), "data _null_;\n   put 'hello';\nrun;\n");
/// ```
#[derive(Debug, Clone)]
pub struct CodeBuffer {
    fragments: Vec<Fragment>,
    indent: usize,
    indent_unit: String,
    line_break: &'static str,
}

impl Default for CodeBuffer {
    fn default() -> Self {
        Self::with_config(&CodegenConfig::default())
    }
}

impl CodeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &CodegenConfig) -> Self {
        Self {
            fragments: Vec::new(),
            indent: 0,
            indent_unit: config.indent_unit(),
            line_break: config.line_ending.as_str(),
        }
    }

    /// Append one fragment at the current indentation level
    pub fn append(&mut self, text: impl Into<String>) {
        self.fragments.push(Fragment {
            indent: self.indent,
            text: text.into(),
        });
    }

    /// Append a fragment followed by a line break
    pub fn append_line(&mut self, text: impl AsRef<str>) {
        let mut line = text.as_ref().to_string();
        line.push_str(self.line_break);
        self.append(line);
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    /// # Panics
    ///
    /// Panics when the level is already zero; that is a defect in the
    /// calling generator.
    pub fn unindent(&mut self) {
        assert!(
            self.indent > 0,
            "CodeBuffer::unindent called at indentation level 0"
        );
        self.indent -= 1;
    }

    pub fn indent_level(&self) -> usize {
        self.indent
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Concatenate all fragments in append order
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut at_line_start = true;

        for fragment in &self.fragments {
            for piece in fragment.text.split_inclusive('\n') {
                let blank = piece.trim_end_matches(['\r', '\n']).is_empty();
                if at_line_start && !blank {
                    for _ in 0..fragment.indent {
                        out.push_str(&self.indent_unit);
                    }
                }
                out.push_str(piece);
                at_line_start = piece.ends_with('\n');
            }
        }

        out
    }
}

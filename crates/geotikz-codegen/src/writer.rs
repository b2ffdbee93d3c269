//! TikZ 文本缓冲

use crate::format::comment_safe;

/// 按行累积输出，`finish` 时以换行连接
#[derive(Debug, Default)]
pub struct TikzWriter {
    output: Vec<String>,
    indent: usize,
}

impl TikzWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入一行（带当前缩进）
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if text.is_empty() {
            self.output.push(String::new());
        } else {
            self.output.push(format!("{}{}", "  ".repeat(self.indent), text));
        }
    }

    pub fn blank(&mut self) {
        self.output.push(String::new());
    }

    /// `% text`
    pub fn comment(&mut self, text: &str) {
        self.line(format!("% {}", comment_safe(text)));
    }

    /// `\begin{env}` 并增加缩进
    pub fn begin(&mut self, env: &str) {
        self.line(format!("\\begin{{{env}}}"));
        self.indent += 1;
    }

    /// 减少缩进并写入 `\end{env}`
    pub fn end(&mut self, env: &str) {
        self.indent = self.indent.saturating_sub(1);
        self.line(format!("\\end{{{env}}}"));
    }

    /// 追加另一个缓冲区的全部行（保持当前缩进）
    pub fn append(&mut self, other: TikzWriter) {
        for line in other.output {
            self.line(line);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    pub fn finish(self) -> String {
        let mut text = self.output.join("\n");
        text.push('\n');
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_indentation() {
        let mut writer = TikzWriter::new();
        writer.begin("tikzpicture");
        writer.comment("body\nline");
        writer.end("tikzpicture");
        assert_eq!(
            writer.finish(),
            "\\begin{tikzpicture}\n  % body line\n\\end{tikzpicture}\n"
        );
    }
}

//! 数值与文本格式化

use geotikz_core::math::Point2;

/// 保留两位小数，去掉末尾的零；`-0` 输出为 `0`
pub fn num(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = (value * 100.0).round() / 100.0;
    // 避免 -0.00
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };

    let mut text = format!("{:.2}", rounded);
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    text
}

/// `(x,y)`
pub fn coord(p: Point2) -> String {
    format!("({},{})", num(p.x), num(p.y))
}

/// 转义 LaTeX 特殊字符
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            '\n' => out.push_str("\\\\ "),
            _ => out.push(c),
        }
    }
    out
}

/// 注释中不能出现换行
pub fn comment_safe(text: &str) -> String {
    text.replace(['\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_trims_and_rounds() {
        assert_eq!(num(1.0), "1");
        assert_eq!(num(1.5), "1.5");
        assert_eq!(num(1.234), "1.23");
        assert_eq!(num(-0.001), "0");
        assert_eq!(num(-0.0), "0");
        assert_eq!(num(-2.5), "-2.5");
        assert_eq!(num(100.0), "100");
        assert_eq!(num(f64::NAN), "0");
    }

    #[test]
    fn test_escape_latex() {
        assert_eq!(escape_latex("50% & $x_1$"), "50\\% \\& \\$x\\_1\\$");
        assert_eq!(escape_latex("a\\b"), "a\\textbackslash{}b");
        assert_eq!(escape_latex("{~^}"), "\\{\\textasciitilde{}\\textasciicircum{}\\}");
    }
}

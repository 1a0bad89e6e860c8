//! String helpers for untrusted input / 不可信输入处理工具函数

/// HTML-encode an untrusted display name / 对不可信名称进行HTML编码
pub fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Exact-match query on the `id` field / 按ID精确查询
pub fn id_query(id: &str) -> String {
    field_query("id", id)
}

/// Exact-match query on the `path` field / 按路径精确查询
pub fn path_query(path: &str) -> String {
    field_query("path", path)
}

/// Quotes and backslashes are escaped so the value stays one phrase.
fn field_query(field: &str, value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("{}:\"{}\"", field, escaped)
}

/// Collapse a vocabulary entry onto one line / 将词表条目压缩为一行
pub fn single_line(entry: &str) -> String {
    entry
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Guess MIME type from a file name / 根据文件名推测MIME类型
pub fn guess_mime(name: &str) -> String {
    mime_guess::from_path(name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

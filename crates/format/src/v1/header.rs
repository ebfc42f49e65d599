//! Header text emitter.
//!
//! Every header entry is written on exactly one line: strings always use the single-line basic
//! form with escapes, and arrays and tables are written inline. A multi-line string could
//! otherwise contain a line equal to the header split and end the header early on the next read.

use toml::{Table, Value};

/// Write `table` as header text, one `key = value` line per entry, in table order.
pub(crate) fn write_header(table: &Table) -> String {
    let mut out = String::new();
    for (key, value) in table {
        write_key(key, &mut out);
        out.push_str(" = ");
        write_value(value, &mut out);
        out.push('\n');
    }
    out
}

fn write_key(key: &str, out: &mut String) {
    let bare = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare {
        out.push_str(key);
    } else {
        write_basic_string(key, out);
    }
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::String(s) => write_basic_string(s, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(item, out);
            }
            out.push(']');
        }
        Value::Table(table) => {
            if table.is_empty() {
                out.push_str("{}");
                return;
            }
            out.push_str("{ ");
            for (i, (key, item)) in table.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_key(key, out);
                out.push_str(" = ");
                write_value(item, out);
            }
            out.push_str(" }");
        }
        // Scalars other than strings never span lines.
        other => out.push_str(&other.to_string()),
    }
}

fn write_basic_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if c.is_control() && (c as u32) < 0x80 => {
                out.push_str(&format!("\\u{:04X}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

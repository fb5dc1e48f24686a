//! Serializer emitting the canonical single-quoted UCI form.

use super::{OptionValue, Package};

pub(super) fn serialize(pkg: &Package) -> String {
    let mut out = String::new();

    for (i, section) in pkg.sections.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str("config ");
        out.push_str(&section.ty);
        if !section.anonymous {
            out.push(' ');
            push_quoted(&mut out, &section.name);
        }
        out.push('\n');

        for option in &section.options {
            match &option.value {
                OptionValue::Scalar(value) => {
                    out.push_str("\toption ");
                    out.push_str(&option.name);
                    out.push(' ');
                    push_quoted(&mut out, value);
                    out.push('\n');
                }
                OptionValue::List(items) => {
                    for value in items {
                        out.push_str("\tlist ");
                        out.push_str(&option.name);
                        out.push(' ');
                        push_quoted(&mut out, value);
                        out.push('\n');
                    }
                }
            }
        }
    }

    out
}

/// Single-quote a value, escaping embedded quotes as `'\''`.
fn push_quoted(out: &mut String, value: &str) {
    out.push('\'');
    for ch in value.chars() {
        if ch == '\'' {
            out.push_str("'\\''");
        } else {
            out.push(ch);
        }
    }
    out.push('\'');
}

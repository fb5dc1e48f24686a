//! Line-based parser for the UCI configuration syntax.
//!
//! Grammar per line: `package <name>`, `config <type> ['<name>']`,
//! `option <name> <value>`, `list <name> <value>`, comments starting with
//! `#`, and blank lines. Tokens follow shell-style quoting: single quotes
//! are literal, double quotes and bare text honor backslash escapes.

use super::{ConfigOption, OptionValue, Package, Section, StoreError};
use super::{validate_name, validate_package_name, validate_type};

pub(super) fn parse(package: &str, input: &str) -> Result<Package, StoreError> {
    let mut pkg = Package {
        name: package.to_string(),
        sections: Vec::new(),
    };

    for (idx, raw) in input.lines().enumerate() {
        let line = idx + 1;
        let err = |message: String| StoreError::Parse {
            package: package.to_string(),
            line,
            message,
        };

        let tokens = split_line(raw).map_err(|msg| err(msg))?;
        let Some((keyword, args)) = tokens.split_first() else {
            continue;
        };

        match keyword.as_str() {
            "package" => match args {
                [name] => {
                    validate_package_name(name)
                        .map_err(|_| err(format!("invalid package name '{name}'")))?;
                }
                _ => return Err(err("'package' expects exactly one name".to_string())),
            },
            "config" => {
                let (ty, name) = match args {
                    [ty] => (ty, None),
                    [ty, name] => (ty, Some(name)),
                    _ => {
                        return Err(err(
                            "'config' expects a type and an optional name".to_string()
                        ));
                    }
                };
                validate_type(ty).map_err(|_| err(format!("invalid section type '{ty}'")))?;
                if let Some(name) = name {
                    validate_name(name)
                        .map_err(|_| err(format!("invalid section name '{name}'")))?;
                    if pkg.lookup_section(name).is_some() {
                        return Err(err(format!("duplicate section name '{name}'")));
                    }
                }
                pkg.sections.push(Section {
                    name: name.cloned().unwrap_or_default(),
                    ty: ty.clone(),
                    anonymous: name.is_none(),
                    options: Vec::new(),
                });
            }
            "option" | "list" => {
                let [name, value] = args else {
                    return Err(err(format!("'{keyword}' expects a name and a value")));
                };
                validate_name(name).map_err(|_| err(format!("invalid option name '{name}'")))?;
                let Some(section) = pkg.sections.last_mut() else {
                    return Err(err(format!("'{keyword}' outside of a config section")));
                };
                if keyword == "option" {
                    set_parsed_scalar(section, name, value);
                } else {
                    append_parsed_list(section, name, value);
                }
            }
            other => return Err(err(format!("unrecognized keyword '{other}'"))),
        }
    }

    Ok(pkg)
}

// Duplicate option names within a section collapse to the last declaration,
// and a list line after an option line upgrades it in place.
fn set_parsed_scalar(section: &mut Section, name: &str, value: &str) {
    match section.options.iter_mut().find(|o| o.name == name) {
        Some(opt) => opt.value = OptionValue::Scalar(value.to_string()),
        None => section.options.push(ConfigOption {
            name: name.to_string(),
            value: OptionValue::Scalar(value.to_string()),
        }),
    }
}

fn append_parsed_list(section: &mut Section, name: &str, value: &str) {
    match section.options.iter_mut().find(|o| o.name == name) {
        Some(opt) => match &mut opt.value {
            OptionValue::List(items) => items.push(value.to_string()),
            OptionValue::Scalar(prev) => {
                let first = std::mem::take(prev);
                opt.value = OptionValue::List(vec![first, value.to_string()]);
            }
        },
        None => section.options.push(ConfigOption {
            name: name.to_string(),
            value: OptionValue::List(vec![value.to_string()]),
        }),
    }
}

/// Split one line into tokens, honoring quotes and escapes.
///
/// An empty quoted token (`''`) is a real token; `#` starts a comment only
/// at a token boundary.
fn split_line(line: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut started = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            ' ' | '\t' => {
                if started {
                    tokens.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            '#' if !started => break,
            '\'' => {
                started = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(ch) => current.push(ch),
                        None => return Err("unterminated single quote".to_string()),
                    }
                }
            }
            '"' => {
                started = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(escaped) => current.push(escaped),
                            None => return Err("unterminated double quote".to_string()),
                        },
                        Some(ch) => current.push(ch),
                        None => return Err("unterminated double quote".to_string()),
                    }
                }
            }
            '\\' => {
                started = true;
                match chars.next() {
                    Some(escaped) => current.push(escaped),
                    None => return Err("trailing backslash".to_string()),
                }
            }
            ch => {
                started = true;
                current.push(ch);
            }
        }
    }

    if started {
        tokens.push(current);
    }
    Ok(tokens)
}

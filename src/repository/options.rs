//! Option operations: scalar and list access, shape conversion, delete.

use crate::error::{Error, Result};
use crate::store::{OptionValue, Store};

/// Get a scalar option value.
pub fn get_string(store: &Store, package: &str, section: &str, option: &str) -> Result<String> {
    let pkg = store.load(package)?;
    let sec = pkg
        .lookup_section(section)
        .ok_or_else(|| Error::SectionNotFound(section.to_string()))?;
    let opt = sec
        .lookup_option(option)
        .ok_or_else(|| Error::OptionNotFound(option.to_string()))?;
    match opt.value() {
        OptionValue::Scalar(value) => Ok(value.clone()),
        OptionValue::List(_) => Err(Error::NotAString(option.to_string())),
    }
}

/// Set a scalar option value, overwriting an existing option of either
/// shape. The empty string is not a representable scalar and is rejected
/// before any store access.
pub fn set_string(
    store: &Store,
    package: &str,
    section: &str,
    option: &str,
    value: &str,
) -> Result<()> {
    if value.is_empty() {
        return Err(Error::InvalidArgument("value must not be empty"));
    }
    let mut pkg = store.load(package)?;
    let sec = pkg
        .lookup_section_mut(section)
        .ok_or_else(|| Error::SectionNotFound(section.to_string()))?;
    sec.set_scalar(option, value)?;
    store.commit(&pkg)?;
    log::debug!("set {package}.{section}.{option}");
    Ok(())
}

/// Get the elements of a list option, order preserved.
pub fn get_list(store: &Store, package: &str, section: &str, option: &str) -> Result<Vec<String>> {
    let pkg = store.load(package)?;
    let sec = pkg
        .lookup_section(section)
        .ok_or_else(|| Error::SectionNotFound(section.to_string()))?;
    let opt = sec
        .lookup_option(option)
        .ok_or_else(|| Error::OptionNotFound(option.to_string()))?;
    match opt.value() {
        OptionValue::List(items) => Ok(items.clone()),
        OptionValue::Scalar(_) => Err(Error::NotAList(option.to_string())),
    }
}

/// Replace an option with a list, rebuilding it element by element.
///
/// An existing option of either shape is deleted first. An empty input
/// list is rejected; delete is the way to drop an option.
pub fn set_list(
    store: &Store,
    package: &str,
    section: &str,
    option: &str,
    values: &[String],
) -> Result<()> {
    if values.is_empty() {
        return Err(Error::InvalidArgument("list must not be empty"));
    }
    let mut pkg = store.load(package)?;
    let sec = pkg
        .lookup_section_mut(section)
        .ok_or_else(|| Error::SectionNotFound(section.to_string()))?;
    sec.delete_option(option);
    for value in values {
        sec.append_list_value(option, value)?;
    }
    store.commit(&pkg)?;
    log::debug!("set list {package}.{section}.{option} ({} elements)", values.len());
    Ok(())
}

/// Append one element to a list option.
///
/// A missing option becomes a single-element list and a scalar option is
/// upgraded to a list. Unlike the scalar setter, an empty string value is
/// accepted.
pub fn append(store: &Store, package: &str, section: &str, option: &str, value: &str) -> Result<()> {
    let mut pkg = store.load(package)?;
    let sec = pkg
        .lookup_section_mut(section)
        .ok_or_else(|| Error::SectionNotFound(section.to_string()))?;
    sec.append_list_value(option, value)?;
    store.commit(&pkg)?;
    log::debug!("appended to {package}.{section}.{option}");
    Ok(())
}

/// Delete an option. A missing section or option succeeds as a no-op.
pub fn delete(store: &Store, package: &str, section: &str, option: &str) -> Result<()> {
    let mut pkg = store.load(package)?;
    let Some(sec) = pkg.lookup_section_mut(section) else {
        return Ok(());
    };
    if sec.delete_option(option) {
        store.commit(&pkg)?;
        log::debug!("deleted {package}.{section}.{option}");
    }
    Ok(())
}

//! Section operations: lookup, create, delete, and by-type queries.

use crate::error::{Error, Result};
use crate::store::Store;

/// Get the type tag of a section.
pub fn get_type(store: &Store, package: &str, section: &str) -> Result<String> {
    let pkg = store.load(package)?;
    let sec = pkg
        .lookup_section(section)
        .ok_or_else(|| Error::SectionNotFound(section.to_string()))?;
    Ok(sec.section_type().to_string())
}

/// Create a section.
///
/// With no name (or an empty one) an anonymous section is created and a
/// name synthesized for it. A named create is idempotent when a section of
/// the same name and type already exists, and a conflict when the existing
/// section has a different type.
pub fn add(store: &Store, package: &str, ty: &str, name: Option<&str>) -> Result<()> {
    let mut pkg = store.load(package)?;

    match name {
        Some(name) if !name.is_empty() => {
            if let Some(existing) = pkg.lookup_section(name) {
                if existing.section_type() != ty {
                    return Err(Error::TypeConflict {
                        name: name.to_string(),
                        existing: existing.section_type().to_string(),
                        requested: ty.to_string(),
                    });
                }
                return Ok(());
            }
            pkg.add_named_section(ty, name)?;
            store.commit(&pkg)?;
            log::info!("created section {package}.{name} of type '{ty}'");
        }
        _ => {
            let name = pkg.add_anonymous_section(ty)?;
            store.commit(&pkg)?;
            log::info!("created anonymous section {package}.{name} of type '{ty}'");
        }
    }

    Ok(())
}

/// Delete a section. Deleting a missing section succeeds as a no-op.
pub fn delete(store: &Store, package: &str, section: &str) -> Result<()> {
    let mut pkg = store.load(package)?;
    if pkg.delete_section(section) {
        store.commit(&pkg)?;
        log::info!("deleted section {package}.{section}");
    }
    Ok(())
}

/// Get the names of all sections of a type, in declaration order.
pub fn all_of_type(store: &Store, package: &str, ty: &str) -> Result<Vec<String>> {
    let pkg = store.load(package)?;
    Ok(pkg
        .sections()
        .filter(|s| s.section_type() == ty)
        .map(|s| s.name().to_string())
        .collect())
}

/// Get the name of the nth section of a type.
///
/// Non-negative indices count from the first match, negative ones from the
/// last (-1 is the last match).
pub fn nth_of_type(store: &Store, package: &str, ty: &str, index: isize) -> Result<String> {
    let pkg = store.load(package)?;
    let mut matches = pkg.sections().filter(|s| s.section_type() == ty);

    let found = if index >= 0 {
        matches.nth(index as usize)
    } else {
        let all: Vec<_> = matches.collect();
        let back = index.unsigned_abs();
        if back <= all.len() {
            Some(all[all.len() - back])
        } else {
            None
        }
    };

    found
        .map(|s| s.name().to_string())
        .ok_or_else(|| Error::NoSuchIndex {
            ty: ty.to_string(),
            index,
        })
}

//! File-backed package store in the UCI configuration format.
//!
//! The store maps a package name to one plain-text file under the config
//! directory. A [`Package`] is loaded fresh for every accessor call and
//! dropped at the end of it; nothing borrows file or parser state past the
//! call. Commits rewrite the package file atomically.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

mod parser;
mod writer;

/// Errors reported by the store engine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("config directory {0:?} is missing or not a directory")]
    BadConfigDir(PathBuf),

    #[error("package '{0}' not found")]
    PackageNotFound(String),

    #[error("invalid name '{0}'")]
    InvalidName(String),

    #[error("values may not contain newline or NUL characters")]
    InvalidValue,

    #[error("parse error in package '{package}' at line {line}: {message}")]
    Parse {
        package: String,
        line: usize,
        message: String,
    },

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Handle to a directory of package files.
pub struct Store {
    config_dir: PathBuf,
}

impl Store {
    /// Open a store over an existing config directory.
    pub fn open(config_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let config_dir = config_dir.into();
        if !config_dir.is_dir() {
            return Err(StoreError::BadConfigDir(config_dir));
        }
        Ok(Self { config_dir })
    }

    /// Get the directory this store reads and writes.
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Load and parse a package by name.
    ///
    /// A missing package file is `PackageNotFound`, not an empty package.
    pub fn load(&self, package: &str) -> Result<Package, StoreError> {
        let path = self.package_path(package)?;
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::PackageNotFound(package.to_string()));
            }
            Err(err) => return Err(err.into()),
        };
        let mut pkg = parser::parse(package, &text)?;
        pkg.fixup_anonymous_names();
        Ok(pkg)
    }

    /// Serialize a package and atomically replace its file.
    pub fn commit(&self, package: &Package) -> Result<(), StoreError> {
        let path = self.package_path(package.name())?;
        // Package names cannot contain '.', so the temp path cannot collide
        // with another package's file.
        let tmp = self.config_dir.join(format!("{}.tmp", package.name()));
        fs::write(&tmp, writer::serialize(package))?;
        fs::rename(&tmp, &path)?;
        log::trace!("committed package '{}'", package.name());
        Ok(())
    }

    fn package_path(&self, package: &str) -> Result<PathBuf, StoreError> {
        validate_package_name(package)?;
        Ok(self.config_dir.join(package))
    }
}

/// One loaded package: an ordered collection of sections.
#[derive(Debug, Clone)]
pub struct Package {
    name: String,
    sections: Vec<Section>,
}

impl Package {
    /// Get the package name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Iterate sections in declaration order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    /// Look up a section by name.
    pub fn lookup_section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Look up a section by name for mutation.
    pub fn lookup_section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.name == name)
    }

    /// Append a named section. The caller must have ruled out an existing
    /// section with the same name.
    pub fn add_named_section(&mut self, ty: &str, name: &str) -> Result<(), StoreError> {
        validate_type(ty)?;
        validate_name(name)?;
        self.sections.push(Section {
            name: name.to_string(),
            ty: ty.to_string(),
            anonymous: false,
            options: Vec::new(),
        });
        Ok(())
    }

    /// Append an anonymous section and return its synthesized name.
    pub fn add_anonymous_section(&mut self, ty: &str) -> Result<String, StoreError> {
        validate_type(ty)?;
        let taken: HashSet<String> = self.sections.iter().map(|s| s.name.clone()).collect();
        let name = probe_name(&taken, &self.name, ty, self.sections.len());
        self.sections.push(Section {
            name: name.clone(),
            ty: ty.to_string(),
            anonymous: true,
            options: Vec::new(),
        });
        Ok(name)
    }

    /// Remove a section by name. Returns whether a section was removed.
    pub fn delete_section(&mut self, name: &str) -> bool {
        let before = self.sections.len();
        self.sections.retain(|s| s.name != name);
        self.sections.len() != before
    }

    /// Assign synthesized names to anonymous sections after a load.
    ///
    /// The name is a hash over package name, section type, and ordinal, so
    /// reloading an unchanged file yields the same names.
    fn fixup_anonymous_names(&mut self) {
        let mut taken: HashSet<String> = self
            .sections
            .iter()
            .filter(|s| !s.anonymous)
            .map(|s| s.name.clone())
            .collect();
        for i in 0..self.sections.len() {
            if !self.sections[i].anonymous {
                continue;
            }
            let name = probe_name(&taken, &self.name, &self.sections[i].ty, i);
            taken.insert(name.clone());
            self.sections[i].name = name;
        }
    }
}

/// One section: a typed, possibly anonymous group of options.
#[derive(Debug, Clone)]
pub struct Section {
    name: String,
    ty: String,
    anonymous: bool,
    options: Vec<ConfigOption>,
}

impl Section {
    /// Get the section name (synthesized for anonymous sections).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the section type tag.
    pub fn section_type(&self) -> &str {
        &self.ty
    }

    /// Whether the section was declared without a name.
    pub fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    /// Iterate options in declaration order.
    pub fn options(&self) -> impl Iterator<Item = &ConfigOption> {
        self.options.iter()
    }

    /// Look up an option by name.
    pub fn lookup_option(&self, name: &str) -> Option<&ConfigOption> {
        self.options.iter().find(|o| o.name == name)
    }

    /// Set an option to a scalar value, overwriting any previous shape.
    pub fn set_scalar(&mut self, option: &str, value: &str) -> Result<(), StoreError> {
        validate_name(option)?;
        validate_value(value)?;
        match self.options.iter_mut().find(|o| o.name == option) {
            Some(opt) => opt.value = OptionValue::Scalar(value.to_string()),
            None => self.options.push(ConfigOption {
                name: option.to_string(),
                value: OptionValue::Scalar(value.to_string()),
            }),
        }
        Ok(())
    }

    /// Append one element to a list option.
    ///
    /// A missing option becomes a single-element list; a scalar option is
    /// upgraded to a list with the old value as its first element.
    pub fn append_list_value(&mut self, option: &str, value: &str) -> Result<(), StoreError> {
        validate_name(option)?;
        validate_value(value)?;
        match self.options.iter_mut().find(|o| o.name == option) {
            Some(opt) => match &mut opt.value {
                OptionValue::List(items) => items.push(value.to_string()),
                OptionValue::Scalar(prev) => {
                    let first = std::mem::take(prev);
                    opt.value = OptionValue::List(vec![first, value.to_string()]);
                }
            },
            None => self.options.push(ConfigOption {
                name: option.to_string(),
                value: OptionValue::List(vec![value.to_string()]),
            }),
        }
        Ok(())
    }

    /// Remove an option by name. Returns whether an option was removed.
    pub fn delete_option(&mut self, name: &str) -> bool {
        let before = self.options.len();
        self.options.retain(|o| o.name != name);
        self.options.len() != before
    }
}

/// A named option inside a section.
#[derive(Debug, Clone)]
pub struct ConfigOption {
    name: String,
    value: OptionValue,
}

impl ConfigOption {
    /// Get the option name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the option value.
    pub fn value(&self) -> &OptionValue {
        &self.value
    }
}

/// The two value shapes an option can hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Scalar(String),
    List(Vec<String>),
}

impl OptionValue {
    /// Get as scalar, `None` if the option is a list.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            OptionValue::Scalar(v) => Some(v),
            OptionValue::List(_) => None,
        }
    }

    /// Get as list elements, `None` if the option is a scalar.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            OptionValue::Scalar(_) => None,
            OptionValue::List(items) => Some(items),
        }
    }
}

fn synth_name(package: &str, ty: &str, index: usize, salt: u32) -> String {
    let mut hash: u32 = 5381;
    for b in package.bytes().chain(ty.bytes()) {
        hash = hash.wrapping_mul(33) ^ u32::from(b);
    }
    hash = hash.wrapping_mul(33) ^ index as u32;
    hash = hash.wrapping_mul(33) ^ salt;
    format!("cfg{:06x}", hash & 0x00ff_ffff)
}

fn probe_name(taken: &HashSet<String>, package: &str, ty: &str, index: usize) -> String {
    let mut salt = 0;
    loop {
        let name = synth_name(package, ty, index, salt);
        if !taken.contains(&name) {
            return name;
        }
        salt += 1;
    }
}

/// Package names become file names: letters, digits, '_' and '-' only.
pub(crate) fn validate_package_name(name: &str) -> Result<(), StoreError> {
    if !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        Ok(())
    } else {
        Err(StoreError::InvalidName(name.to_string()))
    }
}

/// Section and option names: letters, digits and '_' only.
pub(crate) fn validate_name(name: &str) -> Result<(), StoreError> {
    if !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        Ok(())
    } else {
        Err(StoreError::InvalidName(name.to_string()))
    }
}

/// Section types additionally allow '-'.
pub(crate) fn validate_type(ty: &str) -> Result<(), StoreError> {
    if !ty.is_empty()
        && ty
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        Ok(())
    } else {
        Err(StoreError::InvalidName(ty.to_string()))
    }
}

/// Values are stored one per line; line breaks and NUL cannot round-trip.
fn validate_value(value: &str) -> Result<(), StoreError> {
    if value.contains(['\n', '\r', '\0']) {
        Err(StoreError::InvalidValue)
    } else {
        Ok(())
    }
}

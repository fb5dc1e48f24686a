//! The accessor facade: one entry point per operation over the store.

use std::path::Path;

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::repository::{options, sections};
use crate::store::Store;

type ErrorHook = Box<dyn Fn(&str) + Send + Sync>;

/// CRUD accessor over a directory of UCI-style package files.
///
/// Construction is explicit and teardown happens on drop; there is no
/// global state, so independent instances can coexist in one process.
/// An internal lock serializes operations, so a shared `Uci` is safe to
/// use from multiple threads.
///
/// Every operation loads the named package fresh, applies its change or
/// copies its result out, persists on mutation, and drops the package
/// before returning. Nothing is cached across calls.
pub struct Uci {
    store: Store,
    lock: Mutex<()>,
    error_hook: Option<ErrorHook>,
}

impl Uci {
    /// Open an accessor over an existing config directory.
    pub fn open(config_dir: impl AsRef<Path>) -> Result<Self> {
        let store = Store::open(config_dir.as_ref().to_path_buf())?;
        Ok(Self {
            store,
            lock: Mutex::new(()),
            error_hook: None,
        })
    }

    /// Register a hook receiving one formatted message per failed operation.
    ///
    /// The hook is a diagnostic sink on top of the always-on `log` output,
    /// not part of the data contract.
    pub fn with_error_logger(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.error_hook = Some(Box::new(hook));
        self
    }

    /// Get the type of a section.
    pub fn get_section_type(&self, package: &str, section: &str) -> Result<String> {
        self.run("get_section_type", |store| {
            sections::get_type(store, package, section)
        })
    }

    /// Add a section; `None` or an empty name creates an anonymous section.
    ///
    /// Re-creating an existing section of the same type succeeds; an
    /// existing section of another type is a conflict and is left intact.
    pub fn add_section(&self, package: &str, ty: &str, name: Option<&str>) -> Result<()> {
        self.run("add_section", |store| sections::add(store, package, ty, name))
    }

    /// Delete a section. Deleting a missing section succeeds.
    pub fn delete_section(&self, package: &str, section: &str) -> Result<()> {
        self.run("delete_section", |store| {
            sections::delete(store, package, section)
        })
    }

    /// Get the names of all sections of a type, in declaration order.
    ///
    /// Anonymous sections yield their synthesized name, which is a valid
    /// section identifier for subsequent calls.
    pub fn get_all_sections_of_type(&self, package: &str, ty: &str) -> Result<Vec<String>> {
        self.run("get_all_sections_of_type", |store| {
            sections::all_of_type(store, package, ty)
        })
    }

    /// Get the name of the nth section of a type.
    ///
    /// The index starts at 0 and may be negative: -1 is the last match,
    /// -2 the second to last, and so on.
    pub fn get_nth_section_of_type(&self, package: &str, ty: &str, index: isize) -> Result<String> {
        self.run("get_nth_section_of_type", |store| {
            sections::nth_of_type(store, package, ty, index)
        })
    }

    /// Get the value of a string option.
    pub fn get_option_string(&self, package: &str, section: &str, option: &str) -> Result<String> {
        self.run("get_option_string", |store| {
            options::get_string(store, package, section, option)
        })
    }

    /// Set a string option, replacing an existing option of either shape.
    /// The empty string is rejected.
    pub fn set_option_string(
        &self,
        package: &str,
        section: &str,
        option: &str,
        value: &str,
    ) -> Result<()> {
        self.run("set_option_string", |store| {
            options::set_string(store, package, section, option, value)
        })
    }

    /// Get the elements of a list option.
    pub fn get_option_list(&self, package: &str, section: &str, option: &str) -> Result<Vec<String>> {
        self.run("get_option_list", |store| {
            options::get_list(store, package, section, option)
        })
    }

    /// Replace an option with a non-empty list of values.
    pub fn set_option_list(
        &self,
        package: &str,
        section: &str,
        option: &str,
        values: &[String],
    ) -> Result<()> {
        self.run("set_option_list", |store| {
            options::set_list(store, package, section, option, values)
        })
    }

    /// Append a value to a list option, upgrading a scalar option to a
    /// list and creating the option when missing.
    pub fn append_to_option_list(
        &self,
        package: &str,
        section: &str,
        option: &str,
        value: &str,
    ) -> Result<()> {
        self.run("append_to_option_list", |store| {
            options::append(store, package, section, option, value)
        })
    }

    /// Delete an option. Deleting a missing option succeeds.
    pub fn delete_option(&self, package: &str, section: &str, option: &str) -> Result<()> {
        self.run("delete_option", |store| {
            options::delete(store, package, section, option)
        })
    }

    fn run<T>(&self, op: &str, f: impl FnOnce(&Store) -> Result<T>) -> Result<T> {
        let _guard = self.lock.lock();
        f(&self.store).map_err(|err| self.report(op, err))
    }

    fn report(&self, op: &str, err: Error) -> Error {
        let message = format!("[{op}] {err}");
        log::error!("{message}");
        if let Some(hook) = &self.error_hook {
            hook(&message);
        }
        err
    }
}

//! A simplifying CRUD access layer over UCI-style configuration files.
//!
//! The [`Uci`] accessor mediates every operation: sections are looked up
//! or created with anonymous/named disambiguation, options are read and
//! written as strings or ordered string lists, and by-type queries support
//! signed indices with negative wraparound. The underlying store is a
//! directory of plain-text package files in the UCI syntax, loaded fresh
//! and committed atomically on every call.
//!
//! ```no_run
//! use easy_uci::Uci;
//!
//! # fn main() -> easy_uci::Result<()> {
//! let uci = Uci::open("/etc/config")?;
//! uci.set_option_string("network", "lan", "ipaddr", "192.168.1.1")?;
//! let addr = uci.get_option_string("network", "lan", "ipaddr")?;
//! assert_eq!(addr, "192.168.1.1");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod repository;
pub mod store;

mod uci;

pub use error::{Error, Result};
pub use store::{OptionValue, Store, StoreError};
pub use uci::Uci;

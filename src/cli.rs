//! Command-line surface over the accessor.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use easy_uci::Uci;

#[derive(Parser)]
#[command(name = "easy-uci")]
#[command(about = "Read and edit UCI-style configuration files")]
pub struct Cli {
    /// Directory holding the package files
    #[arg(long, default_value = "/etc/config")]
    pub config_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the type of a section
    SectionType { package: String, section: String },
    /// Create a section, anonymous when no name is given
    AddSection {
        package: String,
        r#type: String,
        name: Option<String>,
    },
    /// Delete a section (succeeds when it does not exist)
    DelSection { package: String, section: String },
    /// List the names of all sections of a type, in declaration order
    Sections { package: String, r#type: String },
    /// Print the name of the nth section of a type (negative counts from the end)
    NthSection {
        package: String,
        r#type: String,
        #[arg(allow_hyphen_values = true)]
        index: isize,
    },
    /// Print a string option
    Get {
        package: String,
        section: String,
        option: String,
    },
    /// Set a string option
    Set {
        package: String,
        section: String,
        option: String,
        value: String,
    },
    /// Print a list option, one element per line
    GetList {
        package: String,
        section: String,
        option: String,
    },
    /// Replace a list option with the given elements
    SetList {
        package: String,
        section: String,
        option: String,
        #[arg(required = true)]
        values: Vec<String>,
    },
    /// Append one element to a list option
    Append {
        package: String,
        section: String,
        option: String,
        value: String,
    },
    /// Delete an option (succeeds when it does not exist)
    DelOption {
        package: String,
        section: String,
        option: String,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    let uci = Uci::open(&cli.config_dir)?;

    match cli.command {
        Commands::SectionType { package, section } => {
            println!("{}", uci.get_section_type(&package, &section)?);
        }
        Commands::AddSection {
            package,
            r#type,
            name,
        } => {
            uci.add_section(&package, &r#type, name.as_deref())?;
        }
        Commands::DelSection { package, section } => {
            uci.delete_section(&package, &section)?;
        }
        Commands::Sections { package, r#type } => {
            for name in uci.get_all_sections_of_type(&package, &r#type)? {
                println!("{name}");
            }
        }
        Commands::NthSection {
            package,
            r#type,
            index,
        } => {
            println!("{}", uci.get_nth_section_of_type(&package, &r#type, index)?);
        }
        Commands::Get {
            package,
            section,
            option,
        } => {
            println!("{}", uci.get_option_string(&package, &section, &option)?);
        }
        Commands::Set {
            package,
            section,
            option,
            value,
        } => {
            uci.set_option_string(&package, &section, &option, &value)?;
        }
        Commands::GetList {
            package,
            section,
            option,
        } => {
            for value in uci.get_option_list(&package, &section, &option)? {
                println!("{value}");
            }
        }
        Commands::SetList {
            package,
            section,
            option,
            values,
        } => {
            uci.set_option_list(&package, &section, &option, &values)?;
        }
        Commands::Append {
            package,
            section,
            option,
            value,
        } => {
            uci.append_to_option_list(&package, &section, &option, &value)?;
        }
        Commands::DelOption {
            package,
            section,
            option,
        } => {
            uci.delete_option(&package, &section, &option)?;
        }
    }

    Ok(())
}

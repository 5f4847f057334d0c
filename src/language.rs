use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported hardware description languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Verilog,
    #[serde(rename = "sv")]
    #[value(name = "sv")]
    SystemVerilog,
    Vhdl,
}

/// Shape of an instantiation statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternFamily {
    /// `type_name instance_name (`
    CLike,
    /// `label : entity library.entity_name`
    Entity,
}

impl Language {
    /// File extension (without the dot) that sources in this language use.
    pub fn extension(&self) -> &'static str {
        match self {
            Language::Verilog => "v",
            Language::SystemVerilog => "sv",
            Language::Vhdl => "vhdl",
        }
    }

    pub fn comment_marker(&self) -> &'static str {
        match self {
            Language::Verilog | Language::SystemVerilog => "//",
            Language::Vhdl => "--",
        }
    }

    pub fn pattern_family(&self) -> PatternFamily {
        match self {
            Language::Verilog | Language::SystemVerilog => PatternFamily::CLike,
            Language::Vhdl => PatternFamily::Entity,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Verilog => "verilog",
            Language::SystemVerilog => "sv",
            Language::Vhdl => "vhdl",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

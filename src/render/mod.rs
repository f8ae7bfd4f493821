pub mod csv;
pub mod html;
pub mod print;
pub mod text;

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Table in the terminal.
    Text,
    /// HTML table fragment for embedding in a page.
    Html,
    Csv,
    /// Standalone printable HTML document.
    Print,
}

impl Format {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Html | Self::Print => "html",
            Self::Csv => "csv",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Text => "text/plain;charset=utf-8",
            Self::Html | Self::Print => "text/html;charset=utf-8",
            Self::Csv => csv::MIME,
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        let ext = std::path::Path::new(path).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "html" | "htm" => Some(Self::Print),
            "txt" => Some(Self::Text),
            _ => None,
        }
    }
}

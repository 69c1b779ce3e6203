use colored::Colorize;

pub mod config;
pub mod extract;
pub mod report;

pub use config::ExtractorConfig;
pub use extract::{ExtractError, ExtractResponse, Extractor, RequestKind};

const BANNER: &str = r#"
  ___ _ _
 / __(_) |_ ___ _ __  __ _ _ __ _ __  ___ _ _
 \__ \ |  _/ -_) '  \/ _` | '_ \ '_ \/ -_) '_|
 |___/_|\__\___|_|_|_\__,_| .__/ .__/\___|_|
                          |_|  |_|
"#;

pub fn print_banner() {
    println!("{}", BANNER.bright_cyan().bold());
    println!(
        "  {} {}\n",
        "sitemapper".bright_white().bold(),
        env!("CARGO_PKG_VERSION").bright_black()
    );
}

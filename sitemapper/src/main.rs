use colored::Colorize;
use sitemapper::command_argument_builder;
use sitemapper::handlers::{handle_extract, handle_serve};
use sitemapper_core::extract::RequestKind;
use sitemapper_core::print_banner;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    let result = match chosen_command.subcommand() {
        Some(("serve", primary_command)) => handle_serve(primary_command).await,
        Some(("domain", primary_command)) => {
            handle_extract(RequestKind::Domain, primary_command).await
        }
        Some(("sitemap", primary_command)) => {
            handle_extract(RequestKind::Sitemap, primary_command).await
        }
        // No subcommand provided, just show the banner
        None => return,
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}

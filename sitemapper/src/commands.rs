use clap::{Arg, arg, command};
use std::net::SocketAddr;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitemapper")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitemapper")
        .styles(CLAP_STYLING)
        .about("Discover a site's sitemap and flatten it into a list of URLs")
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("serve")
                .about(
                    "Serve the extraction API. POST /sitemap with {\"sitemap\": URL} or POST \
                /domain with {\"domain\": DOMAIN}.",
                )
                .arg(
                    arg!(-b --"bind" <ADDR>)
                        .required(false)
                        .help("Address to bind the HTTP server to (host:port)")
                        .env("SITEMAPPER_BIND")
                        .value_parser(clap::value_parser!(SocketAddr))
                        .default_value("0.0.0.0:8080"),
                )
                .args(probe_arguments()),
        )
        .subcommand(
            command!("domain")
                .about("Locate the sitemap of a domain and list every URL it declares")
                .arg(
                    arg!(<DOMAIN>)
                        .required(true)
                        .help("Domain or URL of the site, e.g. example.com"),
                )
                .args(probe_arguments())
                .args(output_arguments()),
        )
        .subcommand(
            command!("sitemap")
                .about("List every URL declared by a sitemap, following sitemap indexes")
                .arg(
                    arg!(<URL>)
                        .required(true)
                        .help("Absolute address of the sitemap"),
                )
                .args(output_arguments()),
        )
}

fn probe_arguments() -> Vec<Arg> {
    vec![
        arg!(--"probe-timeout" <SECONDS>)
            .required(false)
            .help("Timeout for the robots.txt fetch and each sitemap location probe")
            .env("SITEMAPPER_PROBE_TIMEOUT")
            .value_parser(clap::value_parser!(u64))
            .default_value("3"),
        arg!(--"probe-concurrency" <NUM>)
            .required(false)
            .help("Sitemap location probes kept in flight; the first match in list order still wins")
            .value_parser(clap::value_parser!(usize))
            .default_value("1"),
    ]
}

fn output_arguments() -> Vec<Arg> {
    vec![
        arg!(-o --"output" <PATH>)
            .required(false)
            .help("Save report to file (default: display to screen)")
            .value_parser(clap::value_parser!(std::path::PathBuf)),
        arg!(-f --"format" <FORMAT>)
            .required(false)
            .help("Report format: text, json")
            .value_parser(["text", "json"])
            .default_value("text"),
    ]
}

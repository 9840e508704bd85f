use clap::Parser;

use propkeep::cli::{self, Cli, Invocation};
use propkeep::{Settings, logging, pipeline};

fn main() {
    let cli = Cli::parse_from(cli::normalize_args(std::env::args_os()));

    let (old, new, overrides) = match cli.into_invocation() {
        Invocation::Version => {
            println!("{}", cli::version_text());
            return;
        }
        Invocation::Usage => {
            eprintln!("{}", cli::usage_text());
            std::process::exit(1);
        }
        Invocation::Merge {
            old,
            new,
            overrides,
        } => (old, new, overrides),
    };

    logging::init(overrides.verbose);

    let settings = Settings::load(overrides).unwrap_or_else(|e| {
        eprintln!("Failed to load settings:\n{e}");
        std::process::exit(1);
    });

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = pipeline::run(&old, &new, &settings, &mut out) {
        eprintln!("Merge failed:\n{e}");
        std::process::exit(1);
    }
}

use clap::Parser;
use miette::Result;
use pct::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    // This is standard practice for CLI tools that output to stdout.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    match cli.command {
        Commands::List(args) => pct::cli::commands::list::run(args, &global),
        Commands::Show(args) => pct::cli::commands::show::run(args, &global),
        Commands::Export(args) => pct::cli::commands::export::run(args, &global),
        Commands::Import(args) => pct::cli::commands::import::run(args, &global),
        Commands::Template(args) => pct::cli::commands::template::run(args, &global),
        Commands::Variants(args) => pct::cli::commands::variants::run(args, &global),
        Commands::Dup(args) => pct::cli::commands::dup::run(args, &global),
        Commands::Validate(args) => pct::cli::commands::validate::run(args, &global),
        Commands::Completions(args) => pct::cli::commands::completions::run(args),
    }
}

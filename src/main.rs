use clap::Parser;
use miette::Result;
use nyd::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Terminate quietly on a closed pipe (`nyd judge ... cases | head`)
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
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
    nyd::logging::init_logging(global.verbose);

    match cli.command {
        Commands::Init(args) => nyd::cli::commands::init::run(args, &global),
        Commands::Auth(cmd) => nyd::cli::commands::auth::run(cmd, &global),
        Commands::Judge(args) => nyd::cli::commands::judge::run(args, &global),
        Commands::Advocate(args) => nyd::cli::commands::advocate::run(args, &global),
        Commands::Analytics(args) => nyd::cli::commands::analytics::run(args, &global),
        Commands::Status(args) => nyd::cli::commands::status::run(args, &global),
        Commands::Completions(args) => nyd::cli::commands::completions::run(args),
    }
}

use clap::Parser;
use linkrepo::cli::{Cli, Command};
use linkrepo::commands::CommandContext;
use linkrepo::{cmd_graph, cmd_init, cmd_proxy};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match cli.command {
        Command::Init(args) => cmd_init(args),
        Command::Graph(args) => match CommandContext::new(&cli.config_dir, cli.token) {
            Ok(ctx) => cmd_graph(args, ctx),
            Err(code) => code,
        },
        Command::Proxy(args) => match CommandContext::new(&cli.config_dir, cli.token) {
            Ok(ctx) => cmd_proxy(args, ctx),
            Err(code) => code,
        },
    };

    std::process::exit(exit_code);
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("linkrepo={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

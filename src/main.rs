use clap::Parser;
use rentbuy::api::{Cli, Command, CompareArgs, build_input, run_http_server};
use rentbuy::core::run_comparison;
use rentbuy::report::render_report;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Command::Serve { port }) => {
            if let Err(e) = run_http_server(port).await {
                eprintln!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Some(Command::Compare(args)) => compare(&args),
        None => compare(&CompareArgs::default()),
    }
}

fn compare(args: &CompareArgs) {
    let comparison = match build_input(args).and_then(|input| run_comparison(&input)) {
        Ok(comparison) => comparison,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&comparison) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
    } else {
        print!("{}", render_report(&comparison, args.every));
    }
}

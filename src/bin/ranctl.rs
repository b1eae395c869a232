//! Interactive CLI client binary.

use clap::Parser;
use ranctl::client::{HttpTransport, Repl, Session};
use std::process;

#[derive(Parser, Debug)]
#[command(name = "ranctl", version, about = "Interactive RAN emulator client")]
struct Args {
    /// Connect to this server before the first prompt
    #[arg(long)]
    connect: Option<String>,

    /// Disable color output
    #[arg(long = "no-color")]
    no_color: bool,
}

fn main() {
    let args = Args::parse();

    let transport = match HttpTransport::new() {
        Ok(transport) => transport,
        Err(e) => {
            eprintln!("Failed to initialize client: {e}");
            process::exit(1);
        }
    };
    let session = Session::new(Box::new(transport));
    let mut repl = match Repl::new(session, !args.no_color) {
        Ok(repl) => repl,
        Err(e) => {
            eprintln!("Failed to initialize client: {e}");
            process::exit(1);
        }
    };

    println!();
    println!("Interactive CLI Client");
    println!("Type 'help' to see available commands");
    println!("Type 'connect http://localhost:4000' to connect to a server");

    if let Some(url) = &args.connect {
        repl.connect(url);
    }

    if let Err(e) = repl.run() {
        eprintln!("{e}");
        process::exit(1);
    }
}

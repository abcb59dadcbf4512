use flagtag::{derive::*, make_flags, ErrorHandling, FlagSet, ParseError};
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Default, Flags)]
struct Tls {
    #[flag(desc = "certificate file")]
    pub cert: String,
}

#[derive(Flags)]
struct Config {
    #[flag(default = "127.0.0.1:8080", desc = "the address to listen on")]
    pub addr: SocketAddr,
    #[flag(default = "3", desc = "attempts per request")]
    pub retries: usize,
    #[flag(default = "30s", desc = "per request")]
    pub timeout: Duration,
    pub tls: Option<Tls>,
    pub verbose: bool,
}

fn print_defaults(flags: &FlagSet) {
    for flag in flags.iter() {
        let (name, usage) = flag.unquote_usage();
        println!("  -{} {name}", flag.name());
        println!("    \t{usage} (default {})", flag.default());
    }
}

fn main() {
    let mut config = Config {
        addr: SocketAddr::from(([0, 0, 0, 0], 0)),
        retries: 0,
        timeout: Duration::ZERO,
        tls: None,
        verbose: false,
    };
    let mut flags = make_flags(&mut config, "demo_server", ErrorHandling::ContinueOnError)
        .unwrap_or_else(|error| panic!("{error}"));

    match flags.parse(std::env::args().skip(1)) {
        Ok(()) => {}
        Err(ParseError::Help) => {
            print_defaults(&flags);
            return;
        }
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(2);
        }
    }

    drop(flags);
    println!(
        "Listening on {} (retries: {}, timeout: {:?}, verbose: {}).",
        config.addr, config.retries, config.timeout, config.verbose
    );
}

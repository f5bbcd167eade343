//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

#[expect(clippy::print_stderr, reason = "report fatal errors to the terminal")]
fn main() {
    if let Err(err) = roost_cli::run() {
        eprintln!("roost: {err}");
        std::process::exit(1);
    }
}

use unitsearch::cli;
use unitsearch::observability::{Logger, Severity};

fn main() {
    if let Err(e) = cli::run() {
        let fields = [("code", e.code_str()), ("message", e.message())];
        match e.severity() {
            Severity::Fatal => Logger::fatal("CLI_FAILED", &fields),
            _ => Logger::error("CLI_FAILED", &fields),
        }
        let _ = cli::write_error(e.code_str(), e.message());
        std::process::exit(1);
    }
}

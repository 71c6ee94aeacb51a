use std::process::ExitCode;

fn main() -> ExitCode {
    match cwlog_filter::run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(2)
        }
    }
}

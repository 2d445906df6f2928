use std::process::ExitCode;

fn main() -> ExitCode {
    match fluxdoctor::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            fluxdoctor::ui::output::error(format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}

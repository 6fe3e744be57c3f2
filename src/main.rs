use std::process::ExitCode;

fn main() -> ExitCode {
    vietgender_lib::run()
}

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    guardian_lib::run().await
}

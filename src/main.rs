use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    unifi_auth_test::run().await
}

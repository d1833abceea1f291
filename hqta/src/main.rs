use clap::Parser;
use hqta::app::{HqtaApp, HqtaAppError};

fn main() -> Result<(), HqtaAppError> {
    env_logger::init();
    let args = HqtaApp::parse();
    args.op.run()
}

use clap::Parser;
use log::{error, info};
use std::process::ExitCode;

use voc2yolo::{prepare_dataset, Args};

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let paths = args.dataset_paths();
    let options = args.convert_options();

    info!(
        "Starting the dataset preparation: {} -> {}",
        paths.image_dir.display(),
        paths.output_dir.display()
    );

    match prepare_dataset(&paths, &options) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Failed to prepare dataset: {}", e);
            ExitCode::FAILURE
        }
    }
}

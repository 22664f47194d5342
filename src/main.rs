use std::sync::Arc;

use video_decode::prelude::*;

fn main() {
    let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| String::from("info"));
    pretty_env_logger::formatted_builder().parse_filters(&filters).init();

    let settings = AppBuilder::new()
        .name("Video Decode")
        .version((1, 0, 0))
        .engine_name("No Engine")
        .engine_version((1, 0, 0))
        .validation(true)
        .logical_device(true)
        .build();

    let runtime = match VulkanRuntime::load() {
        Ok(runtime) => Arc::new(runtime),
        Err(err) => {
            log::error!("Error initializing VideoDecode struct: {:#}", err);
            std::process::exit(EXIT_FAILURE);
        }
    };

    std::process::exit(video_decode::run(runtime, &settings));
}

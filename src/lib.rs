pub mod color;
pub mod geometry;
pub mod math;
pub mod scene;
pub mod settings;
pub mod shapes;
pub mod surface;

pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init();
}

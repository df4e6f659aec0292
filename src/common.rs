pub mod encoding;
pub mod output_path;

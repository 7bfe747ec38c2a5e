pub mod constants;
pub mod output_name;
pub mod time_range;

pub mod pipeline_logger;
pub mod remove_interviewer_use_case;

mod input;
mod storage;

pub use input::{InputFormat, load_report_input, parse_report_input};
pub use storage::{DataDirectory, POLICY_FILE_NAME, StorageError, load_policy_file};

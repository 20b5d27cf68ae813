pub mod task_parser;
pub mod task_serializer;

pub use task_parser::parse_tasks;
pub use task_serializer::serialize_tasks;

use crate::task::Task;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A simple example task to demonstrate the Task trait.
///
/// Models the kind of work the surrounding application submits: asking an
/// AI service to generate tags for an article. The handler decodes the
/// payload back into this struct and performs the actual call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateTagsTask {
    pub article_id: i64,
    pub content: String,
}

impl GenerateTagsTask {
    pub const TASK_TYPE: &'static str = "generate_tags";

    pub fn new(article_id: i64, content: impl Into<String>) -> Self {
        Self {
            article_id,
            content: content.into(),
        }
    }
}

impl Task for GenerateTagsTask {
    fn task_type(&self) -> &str {
        Self::TASK_TYPE
    }

    fn payload(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

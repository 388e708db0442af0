#[cfg(test)]
mod tests {
    use crate::task::example_task::GenerateTagsTask;
    use crate::task::Task;

    #[test]
    fn example_task_exposes_its_type_tag() {
        let task = GenerateTagsTask::new(1, "some article content");
        assert_eq!(task.task_type(), GenerateTagsTask::TASK_TYPE);
    }

    #[test]
    fn example_task_payload_round_trips() {
        let task = GenerateTagsTask::new(42, "Rust is a systems programming language");

        let payload = task.payload();
        let decoded: GenerateTagsTask =
            serde_json::from_value(payload).expect("payload should decode");

        assert_eq!(decoded.article_id, 42);
        assert_eq!(decoded.content, "Rust is a systems programming language");
    }
}

// Task model for the REST task store
// Field names are camelCase to match the JSON records served by the API

use serde::{Deserialize, Deserializer, Serialize};

use super::common::nowIso;

/// User-editable part of a task. Also the payload of the task form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskFields {
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub cardColor: String,
    pub startTime: String,  // HH:MM, 24-hour
    pub endTime: String,    // HH:MM, 24-hour
    pub dueDate: String,    // YYYY-MM-DD
}

impl TaskFields {
    /// Copy with surrounding whitespace stripped from every field
    pub fn trimmed(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            category: self.category.trim().to_string(),
            priority: self.priority.trim().to_string(),
            cardColor: self.cardColor.trim().to_string(),
            startTime: self.startTime.trim().to_string(),
            endTime: self.endTime.trim().to_string(),
            dueDate: self.dueDate.trim().to_string(),
        }
    }
}

/// A task as stored by the remote API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(deserialize_with = "deserializeId")]
    pub id: String,  // Assigned by the store, never changes
    #[serde(flatten)]
    pub fields: TaskFields,
    #[serde(default)]
    pub isCompleted: bool,
    #[serde(default)]
    pub createdAt: String,
}

impl Task {
    pub fn title(&self) -> &str {
        &self.fields.title
    }
}

/// json-server hands out string ids, older stores use numbers. Both are kept as text.
fn deserializeId<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

/// POST body for a new task
#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    #[serde(flatten)]
    pub fields: TaskFields,
    pub isCompleted: bool,
    pub createdAt: String,
}

impl NewTask {
    pub fn new(fields: TaskFields) -> Self {
        Self {
            fields,
            isCompleted: false,
            createdAt: nowIso(),
        }
    }
}

/// PATCH body. Only the fields that are set go on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cardColor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub startTime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endTime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dueDate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isCompleted: Option<bool>,
}

impl TaskPatch {
    pub fn completion(isCompleted: bool) -> Self {
        Self {
            isCompleted: Some(isCompleted),
            ..Self::default()
        }
    }

    /// Patch replacing every editable field
    pub fn fromFields(fields: TaskFields) -> Self {
        Self {
            title: Some(fields.title),
            description: Some(fields.description),
            category: Some(fields.category),
            priority: Some(fields.priority),
            cardColor: Some(fields.cardColor),
            startTime: Some(fields.startTime),
            endTime: Some(fields.endTime),
            dueDate: Some(fields.dueDate),
            isCompleted: None,
        }
    }

    pub fn applyTo(&self, task: &mut Task) {
        let fields = &mut task.fields;
        let slots = [
            (&self.title, &mut fields.title),
            (&self.description, &mut fields.description),
            (&self.category, &mut fields.category),
            (&self.priority, &mut fields.priority),
            (&self.cardColor, &mut fields.cardColor),
            (&self.startTime, &mut fields.startTime),
            (&self.endTime, &mut fields.endTime),
            (&self.dueDate, &mut fields.dueDate),
        ];
        for (value, slot) in slots {
            if let Some(value) = value {
                *slot = value.clone();
            }
        }
        if let Some(done) = self.isCompleted {
            task.isCompleted = done;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn task_accepts_string_and_numeric_ids() {
        let text: Task = serde_json::from_value(json!({"id": "a1f3", "title": "Read"})).unwrap();
        let number: Task = serde_json::from_value(json!({"id": 42, "title": "Read"})).unwrap();
        assert_eq!(text.id, "a1f3");
        assert_eq!(number.id, "42");
        assert!(!number.isCompleted);
        assert_eq!(number.fields.dueDate, "");
    }

    #[test]
    fn task_reads_camel_case_fields() {
        let task: Task = serde_json::from_value(json!({
            "id": "7",
            "title": "Gym",
            "description": "Leg day",
            "category": "health",
            "priority": "high",
            "cardColor": "green",
            "startTime": "06:00",
            "endTime": "07:15",
            "dueDate": "2024-05-01",
            "isCompleted": true,
            "createdAt": "2024-04-30T10:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(task.fields.cardColor, "green");
        assert_eq!(task.fields.endTime, "07:15");
        assert!(task.isCompleted);
    }

    #[test]
    fn new_task_starts_incomplete_and_stamped() {
        let body = serde_json::to_value(NewTask::new(TaskFields {
            title: "Buy milk".into(),
            ..TaskFields::default()
        }))
        .unwrap();
        assert_eq!(body["title"], "Buy milk");
        assert_eq!(body["isCompleted"], false);
        assert!(body["createdAt"].as_str().unwrap().ends_with('Z'));
        assert!(body.get("id").is_none());
    }

    #[test]
    fn completion_patch_serializes_only_the_flag() {
        let body = serde_json::to_value(TaskPatch::completion(true)).unwrap();
        assert_eq!(body, json!({"isCompleted": true}));
    }

    #[test]
    fn patch_leaves_unset_fields_alone() {
        let mut task: Task =
            serde_json::from_value(json!({"id": "1", "title": "Old", "category": "work"})).unwrap();
        TaskPatch {
            title: Some("New".into()),
            ..TaskPatch::default()
        }
        .applyTo(&mut task);
        assert_eq!(task.title(), "New");
        assert_eq!(task.fields.category, "work");
    }

    #[test]
    fn trimmed_strips_every_field() {
        let fields = TaskFields {
            title: "  Buy milk ".into(),
            dueDate: " 2024-05-01".into(),
            ..TaskFields::default()
        };
        let trimmed = fields.trimmed();
        assert_eq!(trimmed.title, "Buy milk");
        assert_eq!(trimmed.dueDate, "2024-05-01");
    }
}

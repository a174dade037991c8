//! Field-level updates of the report record.
//!
//! Every operation consumes the current record and returns the next one with
//! exactly one slice replaced. None of them can fail: unknown item ids leave
//! the record untouched and text is stored exactly as given.

use uuid::Uuid;

use super::model::*;

const ID_LEN: usize = 9;

fn assign<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Generate an id not used by any item of `items`.
pub fn fresh_id<T: Keyed>(items: &[T]) -> String {
    loop {
        let mut candidate = Uuid::new_v4().simple().to_string();
        candidate.truncate(ID_LEN);
        if !items.iter().any(|item| item.id() == candidate) {
            return candidate;
        }
    }
}

fn update_by_id<T, F>(items: Vec<T>, id: &str, apply: F) -> Vec<T>
where
    T: Keyed,
    F: Fn(&mut T),
{
    items
        .into_iter()
        .map(|mut item| {
            if item.id() == id {
                apply(&mut item);
            }
            item
        })
        .collect()
}

fn remove_by_id<T: Keyed>(items: Vec<T>, id: &str) -> Vec<T> {
    items.into_iter().filter(|item| item.id() != id).collect()
}

impl ReportRecord {
    pub fn with_student(mut self, patch: StudentPatch) -> Self {
        let student = &mut self.student;
        assign(&mut student.name, patch.name);
        assign(&mut student.nis, patch.nis);
        assign(&mut student.dob, patch.dob);
        assign(&mut student.parent_name, patch.parent_name);
        assign(&mut student.address, patch.address);
        assign(&mut student.academic_year, patch.academic_year);
        assign(&mut student.semester, patch.semester);
        assign(&mut student.group, patch.group);
        assign(&mut student.photo_url, patch.photo_url);
        self
    }

    pub fn with_photo(mut self, data_url: String) -> Self {
        self.student.photo_url = Some(data_url);
        self
    }

    pub fn with_health(mut self, patch: HealthPatch) -> Self {
        let health = &mut self.health;
        assign(&mut health.weight, patch.weight);
        assign(&mut health.height, patch.height);
        assign(&mut health.head_circumference, patch.head_circumference);
        assign(&mut health.eyes, patch.eyes);
        assign(&mut health.ears, patch.ears);
        assign(&mut health.teeth, patch.teeth);
        self
    }

    pub fn with_attendance(mut self, patch: AttendancePatch) -> Self {
        let attendance = &mut self.attendance;
        assign(&mut attendance.present, patch.present);
        assign(&mut attendance.sick, patch.sick);
        assign(&mut attendance.permission, patch.permission);
        assign(&mut attendance.alpha, patch.alpha);
        self
    }

    pub fn with_signature(mut self, patch: SignaturePatch) -> Self {
        let signature = &mut self.signature;
        assign(&mut signature.principal_name, patch.principal_name);
        assign(&mut signature.teacher_name, patch.teacher_name);
        assign(&mut signature.date, patch.date);
        assign(&mut signature.place, patch.place);
        self
    }

    pub fn with_narrative(mut self, narrative: String) -> Self {
        self.narrative = narrative;
        self
    }

    pub fn with_teacher_note(mut self, note: String) -> Self {
        self.teacher_note = note;
        self
    }

    pub fn with_texts(self, patch: TextsPatch) -> Self {
        let mut next = self;
        if let Some(narrative) = patch.narrative {
            next = next.with_narrative(narrative);
        }
        if let Some(note) = patch.teacher_note {
            next = next.with_teacher_note(note);
        }
        next
    }

    pub fn update_development_item(mut self, id: &str, patch: DevelopmentItemPatch) -> Self {
        self.development_items = update_by_id(self.development_items, id, |item| {
            assign(&mut item.scope, patch.scope.clone());
            assign(&mut item.description, patch.description.clone());
            assign(&mut item.level, patch.level);
        });
        self
    }

    pub fn update_character_item(mut self, id: &str, patch: CharacterItemPatch) -> Self {
        self.character_items = update_by_id(self.character_items, id, |item| {
            assign(&mut item.aspect, patch.aspect.clone());
            assign(&mut item.score, patch.score);
        });
        self
    }

    /// Append an empty daily activity row; returns the new record and the row id.
    pub fn add_daily_activity(mut self) -> (Self, String) {
        let id = fresh_id(&self.daily_activities);
        self.daily_activities.push(DailyActivity {
            id: id.clone(),
            activity: String::new(),
            indicator: String::new(),
            grade: Grade::default(),
            note: String::new(),
        });
        (self, id)
    }

    pub fn remove_daily_activity(mut self, id: &str) -> Self {
        self.daily_activities = remove_by_id(self.daily_activities, id);
        self
    }

    pub fn update_daily_activity(mut self, id: &str, patch: DailyActivityPatch) -> Self {
        self.daily_activities = update_by_id(self.daily_activities, id, |item| {
            assign(&mut item.activity, patch.activity.clone());
            assign(&mut item.indicator, patch.indicator.clone());
            assign(&mut item.grade, patch.grade);
            assign(&mut item.note, patch.note.clone());
        });
        self
    }

    pub fn add_extracurricular(mut self) -> (Self, String) {
        let id = fresh_id(&self.extracurriculars);
        self.extracurriculars.push(Extracurricular {
            id: id.clone(),
            name: String::new(),
            grade: Grade::default().letter().to_string(),
            note: String::new(),
        });
        (self, id)
    }

    pub fn remove_extracurricular(mut self, id: &str) -> Self {
        self.extracurriculars = remove_by_id(self.extracurriculars, id);
        self
    }

    pub fn update_extracurricular(mut self, id: &str, patch: ExtracurricularPatch) -> Self {
        self.extracurriculars = update_by_id(self.extracurriculars, id, |item| {
            assign(&mut item.name, patch.name.clone());
            assign(&mut item.grade, patch.grade.clone());
            assign(&mut item.note, patch.note.clone());
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::template::initial_record;

    #[test]
    fn test_fresh_id_is_unused() {
        let record = initial_record();
        let id = fresh_id(&record.daily_activities);
        assert_eq!(id.len(), ID_LEN);
        assert!(record.daily_activities.iter().all(|d| d.id != id));
    }

    #[test]
    fn test_update_by_id_touches_every_match() {
        let mut record = initial_record();
        record.daily_activities[1].id = "d1".to_string();
        let record = record.update_daily_activity(
            "d1",
            DailyActivityPatch {
                note: Some("Sama".to_string()),
                ..Default::default()
            },
        );
        assert!(record.daily_activities.iter().all(|d| d.note == "Sama"));
    }

    #[test]
    fn test_with_texts_keeps_unset_text() {
        let record = initial_record()
            .with_teacher_note("Tetap".to_string())
            .with_texts(TextsPatch {
                narrative: Some("Baru".to_string()),
                teacher_note: None,
            });
        assert_eq!(record.narrative, "Baru");
        assert_eq!(record.teacher_note, "Tetap");
    }

    #[test]
    fn test_null_photo_clears_and_absent_keeps() {
        let record = initial_record().with_photo("data:image/png;base64,AA==".to_string());

        let patch: StudentPatch = serde_json::from_str(r#"{"name": "Siti"}"#).unwrap();
        let kept = record.clone().with_student(patch);
        assert_eq!(kept.student.photo_url.as_deref(), Some("data:image/png;base64,AA=="));

        let patch: StudentPatch = serde_json::from_str(r#"{"photoUrl": null}"#).unwrap();
        let cleared = record.with_student(patch);
        assert!(cleared.student.photo_url.is_none());
    }
}

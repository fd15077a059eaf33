use serde::{Deserialize, Serialize};

/// Natural key of a schedule slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotIdentifier {
    pub date: String,
    pub time: String,
    pub subject: String,
    pub teacher: String,
}

impl SlotIdentifier {
    pub fn new(
        date: impl Into<String>,
        time: impl Into<String>,
        subject: impl Into<String>,
        teacher: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
            subject: subject.into(),
            teacher: teacher.into(),
        }
    }

    /// Copy with every field trimmed.
    pub fn normalized(&self) -> Self {
        Self::new(
            self.date.trim(),
            self.time.trim(),
            self.subject.trim(),
            self.teacher.trim(),
        )
    }

    /// Trimmed comparison on all four fields, case-insensitive on subject.
    pub fn matches(&self, other: &SlotIdentifier) -> bool {
        self.date.trim() == other.date.trim()
            && self.time.trim() == other.time.trim()
            && self.teacher.trim() == other.teacher.trim()
            && same_subject(&self.subject, &other.subject)
    }
}

pub(crate) fn same_subject(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// One schedule row as held by the scheduling store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRecord {
    /// Store-internal position (sheet row number for the Sheets backend).
    pub position: usize,
    pub slot: SlotIdentifier,
    pub student_name: String,
    pub contact_info: String,
}

impl SlotRecord {
    pub fn open(position: usize, slot: SlotIdentifier) -> Self {
        Self {
            position,
            slot,
            student_name: String::new(),
            contact_info: String::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.student_name.trim().is_empty()
    }

    /// Open slot on exactly `date` (trimmed) for `subject` (case-insensitive).
    pub fn is_open_for(&self, date: &str, subject: &str) -> bool {
        self.is_available()
            && self.slot.date.trim() == date.trim()
            && same_subject(&self.slot.subject, subject)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySlot {
    #[serde(flatten)]
    pub slot: SlotIdentifier,
    /// Informational only; bookings locate slots by natural key.
    pub row_index: usize,
}

impl From<&SlotRecord> for AvailabilitySlot {
    fn from(record: &SlotRecord) -> Self {
        Self {
            slot: record.slot.normalized(),
            row_index: record.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_trims_and_ignores_subject_case() {
        let stored = SlotIdentifier::new(" 2025-06-02", "10:00 ", "MATH", "Ms Tan");
        let requested = SlotIdentifier::new("2025-06-02", "10:00", "math ", " Ms Tan");
        assert!(stored.matches(&requested));
    }

    #[test]
    fn test_teacher_and_time_are_case_sensitive_exact() {
        let stored = SlotIdentifier::new("2025-06-02", "10:00", "Math", "Ms Tan");
        assert!(!stored.matches(&SlotIdentifier::new("2025-06-02", "11:00", "Math", "Ms Tan")));
        assert!(!stored.matches(&SlotIdentifier::new("2025-06-02", "10:00", "Math", "Mr Lee")));
    }

    #[test]
    fn test_blank_student_counts_as_available() {
        let mut record = SlotRecord::open(2, SlotIdentifier::new("2025-06-02", "10:00", "Math", "Ms Tan"));
        record.student_name = "   ".to_string();
        assert!(record.is_open_for("2025-06-02", "math"));

        record.student_name = "Alice".to_string();
        assert!(!record.is_open_for("2025-06-02", "math"));
    }

    #[test]
    fn test_date_must_match_exactly() {
        let record = SlotRecord::open(2, SlotIdentifier::new("2025-06-02", "10:00", "Math", "Ms Tan"));
        assert!(!record.is_open_for("2025-6-2", "Math"));
        assert!(!record.is_open_for("2025-06-03", "Math"));
    }

    #[test]
    fn test_availability_slot_serializes_flat() {
        let record = SlotRecord::open(7, SlotIdentifier::new("2025-06-02", "10:00", "Math", "Ms Tan"));
        let value = serde_json::to_value(AvailabilitySlot::from(&record)).unwrap();
        assert_eq!(value["date"], "2025-06-02");
        assert_eq!(value["rowIndex"], 7);
    }
}

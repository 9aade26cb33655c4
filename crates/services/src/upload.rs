//! Files picked for an analysis, before submission.

use exam_core::model::upload::MAX_FILES_PER_KIND;
use exam_core::model::{UploadError, UploadFile, UploadKind};

use crate::analysis::AnalysisRequest;

/// Result of adding a batch of files to one slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddFilesOutcome {
    pub accepted: usize,
    pub rejected: Vec<UploadError>,
}

/// Papers and syllabus files chosen so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSelection {
    papers: Vec<UploadFile>,
    syllabus: Vec<UploadFile>,
}

impl UploadSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn files(&self, kind: UploadKind) -> &[UploadFile] {
        match kind {
            UploadKind::Papers => &self.papers,
            UploadKind::Syllabus => &self.syllabus,
        }
    }

    fn slot_mut(&mut self, kind: UploadKind) -> &mut Vec<UploadFile> {
        match kind {
            UploadKind::Papers => &mut self.papers,
            UploadKind::Syllabus => &mut self.syllabus,
        }
    }

    /// Add a batch of files to `kind`.
    ///
    /// Files of an unsupported type are skipped and reported; the rest are
    /// kept.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::LimitExceeded` and adds nothing when the batch
    /// would take the slot over the limit.
    pub fn add(
        &mut self,
        kind: UploadKind,
        files: Vec<UploadFile>,
    ) -> Result<AddFilesOutcome, UploadError> {
        let slot = self.slot_mut(kind);
        if slot.len() + files.len() > MAX_FILES_PER_KIND {
            return Err(UploadError::LimitExceeded {
                kind,
                current: slot.len(),
                adding: files.len(),
            });
        }

        let mut outcome = AddFilesOutcome::default();
        for file in files {
            match file.validate_type() {
                Ok(()) => {
                    slot.push(file);
                    outcome.accepted += 1;
                }
                Err(err) => outcome.rejected.push(err),
            }
        }
        Ok(outcome)
    }

    /// Remove and return the file at `index` of `kind`.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::IndexOutOfRange` if there is no such file.
    pub fn remove(&mut self, kind: UploadKind, index: usize) -> Result<UploadFile, UploadError> {
        let slot = self.slot_mut(kind);
        if index >= slot.len() {
            return Err(UploadError::IndexOutOfRange { index });
        }
        Ok(slot.remove(index))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.papers.is_empty() && self.syllabus.is_empty()
    }

    #[must_use]
    pub fn into_request(self, name: impl Into<String>) -> AnalysisRequest {
        AnalysisRequest::new(name, self.papers).with_syllabus(self.syllabus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(names: &[&str]) -> Vec<UploadFile> {
        names
            .iter()
            .map(|n| UploadFile::guessing_mime(*n, Vec::new()))
            .collect()
    }

    #[test]
    fn invalid_types_are_skipped_individually() {
        let mut selection = UploadSelection::new();
        let outcome = selection
            .add(UploadKind::Papers, files(&["a.pdf", "b.txt", "c.png"]))
            .unwrap();

        assert_eq!(outcome.accepted, 2);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(selection.files(UploadKind::Papers).len(), 2);
        assert!(selection.files(UploadKind::Syllabus).is_empty());
    }

    #[test]
    fn batch_over_limit_is_rejected_whole() {
        let mut selection = UploadSelection::new();
        let nine: Vec<String> = (0..9).map(|i| format!("p{i}.pdf")).collect();
        let nine: Vec<&str> = nine.iter().map(String::as_str).collect();
        selection.add(UploadKind::Papers, files(&nine)).unwrap();

        let err = selection
            .add(UploadKind::Papers, files(&["x.pdf", "y.pdf"]))
            .unwrap_err();
        assert_eq!(
            err,
            UploadError::LimitExceeded {
                kind: UploadKind::Papers,
                current: 9,
                adding: 2,
            }
        );
        assert_eq!(selection.files(UploadKind::Papers).len(), 9);

        selection.add(UploadKind::Papers, files(&["x.pdf"])).unwrap();
        assert_eq!(selection.files(UploadKind::Papers).len(), 10);
    }

    #[test]
    fn remove_checks_bounds() {
        let mut selection = UploadSelection::new();
        selection.add(UploadKind::Syllabus, files(&["s.docx"])).unwrap();

        assert_eq!(
            selection.remove(UploadKind::Syllabus, 1).unwrap_err(),
            UploadError::IndexOutOfRange { index: 1 }
        );
        let removed = selection.remove(UploadKind::Syllabus, 0).unwrap();
        assert_eq!(removed.file_name(), "s.docx");
        assert!(selection.is_empty());
    }

    #[test]
    fn into_request_keeps_both_slots() {
        let mut selection = UploadSelection::new();
        selection.add(UploadKind::Papers, files(&["p.pdf"])).unwrap();
        selection.add(UploadKind::Syllabus, files(&["s.pdf"])).unwrap();

        let request = selection.into_request("Finals");
        assert_eq!(request.name, "Finals");
        assert_eq!(request.papers.len(), 1);
        assert_eq!(request.syllabus.len(), 1);
        assert!(request.validate().is_ok());
    }
}

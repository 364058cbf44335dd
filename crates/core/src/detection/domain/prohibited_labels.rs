use crate::detection::domain::object_detector::ObjectDetection;

/// Set of object terms whose presence in a frame is reported.
///
/// A detected label matches a term when, ignoring case, the whole label
/// equals the term or one of its whitespace-separated words does. `"phone"`
/// therefore matches `"cell phone"` but not `"headphones"`.
#[derive(Clone, Debug)]
pub struct ProhibitedLabels {
    terms: Vec<String>,
}

impl ProhibitedLabels {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            terms: terms
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    pub fn matches(&self, label: &str) -> bool {
        let label = label.to_lowercase();
        self.terms
            .iter()
            .any(|term| label == *term || label.split_whitespace().any(|word| word == term))
    }

    /// First detection whose label is prohibited, if any.
    pub fn first_match<'a>(&self, detections: &'a [ObjectDetection]) -> Option<&'a ObjectDetection> {
        detections.iter().find(|d| self.matches(&d.label))
    }
}

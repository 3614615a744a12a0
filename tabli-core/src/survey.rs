use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HearAboutUs {
    SocialMedia,
    FriendOrFamily,
    GoogleSearch,
    WalkedBy,
    FoodBlog,
    Other,
}

/// Optional feedback a customer leaves right after booking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyResponse {
    pub hear_about_us: Option<HearAboutUs>,
    pub special_requirements: Option<String>,
    pub improvements: Option<String>,
}

impl SurveyResponse {
    /// Blank free-text answers count as unanswered.
    pub fn normalized(self) -> Self {
        Self {
            hear_about_us: self.hear_about_us,
            special_requirements: non_blank(self.special_requirements),
            improvements: non_blank(self.improvements),
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.hear_about_us.is_none() && self.special_requirements.is_none() && self.improvements.is_none()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_answers_are_dropped() {
        let survey = SurveyResponse {
            hear_about_us: None,
            special_requirements: Some("   ".to_string()),
            improvements: Some(" More vegan options ".to_string()),
        }
        .normalized();

        assert_eq!(survey.special_requirements, None);
        assert_eq!(survey.improvements.as_deref(), Some("More vegan options"));
        assert!(!survey.is_skipped());
        assert!(SurveyResponse::default().normalized().is_skipped());
    }
}

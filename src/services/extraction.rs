use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Languages the simulated analyzer produces output for. Selected by the
/// uploader; the uploaded bytes play no part in the choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
}

impl Language {
    pub fn parse(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "en" => Some(Self::English),
            "hi" => Some(Self::Hindi),
            _ => None,
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Hindi => "hi",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::English
    }
}

/// Closed label set for recognized entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityLabel {
    Person,
    Location,
    State,
    Aadhaar,
    Phone,
    Date,
    ApplicationId,
    Area,
    SurveyNumber,
    Year,
}

/// One recognized span. `start`/`end` are character offsets into the
/// extracted text (not byte offsets; the Hindi template is multi-byte).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NamedEntity {
    pub text: String,
    pub label: EntityLabel,
    pub confidence: f32,
    pub start: usize,
    pub end: usize,
}

/// Final output of a document analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub language: Language,
    pub page_count: i32,
    pub extracted_text: String,
    pub entities: Vec<NamedEntity>,
}

/// Pages reported for every document; the simulator reads no bytes.
pub const CANNED_PAGE_COUNT: i32 = 3;

const ENGLISH_TEXT: &str = "Form A - Claim for Rights to Forest Land under the Scheduled Tribes \
and Other Traditional Forest Dwellers (Recognition of Forest Rights) Act, 2006. \
Applicant: Ram Prasad Meena, son of Shyam Lal Meena, resident of village Karahal, \
district Sheopur, Madhya Pradesh. Aadhaar No: 4521 8765 9012, Contact: +91 94253 67890. \
The applicant has been cultivating the claimed land bearing survey number 245/2 \
measuring 2.5 hectares since 15/03/2005. Application ID: FRA/2023/MP/004521.";

const HINDI_TEXT: &str = "प्रपत्र क - अनुसूचित जनजाति और अन्य परम्परागत वन निवासी (वन अधिकारों की मान्यता) \
अधिनियम, 2006 के अंतर्गत वन भूमि पर अधिकार का दावा। आवेदक: राम प्रसाद मीणा, पिता श्याम लाल मीणा, \
ग्राम करहल, जिला श्योपुर, मध्य प्रदेश के निवासी। आधार संख्या: 4521 8765 9012, संपर्क: +91 94253 67890। \
आवेदक खसरा संख्या 245/2 की 2.5 हेक्टेयर भूमि पर दिनांक 15/03/2005 से काबिज है। \
आवेदन क्रमांक: FRA/2023/MP/004521।";

const ENGLISH_ENTITIES: &[(&str, EntityLabel, f32)] = &[
    ("Ram Prasad Meena", EntityLabel::Person, 0.98),
    ("Shyam Lal Meena", EntityLabel::Person, 0.95),
    ("Karahal", EntityLabel::Location, 0.97),
    ("Madhya Pradesh", EntityLabel::State, 0.96),
    ("4521 8765 9012", EntityLabel::Aadhaar, 0.99),
    ("+91 94253 67890", EntityLabel::Phone, 0.97),
    ("15/03/2005", EntityLabel::Date, 0.94),
    ("FRA/2023/MP/004521", EntityLabel::ApplicationId, 0.99),
    ("2.5 hectares", EntityLabel::Area, 0.92),
    ("245/2", EntityLabel::SurveyNumber, 0.91),
    ("2006", EntityLabel::Year, 0.88),
];

const HINDI_ENTITIES: &[(&str, EntityLabel, f32)] = &[
    ("राम प्रसाद मीणा", EntityLabel::Person, 0.98),
    ("श्याम लाल मीणा", EntityLabel::Person, 0.95),
    ("करहल", EntityLabel::Location, 0.97),
    ("मध्य प्रदेश", EntityLabel::State, 0.96),
    ("4521 8765 9012", EntityLabel::Aadhaar, 0.99),
    ("+91 94253 67890", EntityLabel::Phone, 0.97),
    ("15/03/2005", EntityLabel::Date, 0.94),
    ("FRA/2023/MP/004521", EntityLabel::ApplicationId, 0.99),
    ("2.5 हेक्टेयर", EntityLabel::Area, 0.92),
    ("245/2", EntityLabel::SurveyNumber, 0.91),
    ("2006", EntityLabel::Year, 0.88),
];

/// The fixed analysis payload for a language. Two documents uploaded with
/// the same language get identical output; the uploaded content is never
/// read.
pub fn canned_report(language: Language) -> AnalysisReport {
    let (text, table) = match language {
        Language::English => (ENGLISH_TEXT, ENGLISH_ENTITIES),
        Language::Hindi => (HINDI_TEXT, HINDI_ENTITIES),
    };

    AnalysisReport {
        language,
        page_count: CANNED_PAGE_COUNT,
        extracted_text: text.to_string(),
        entities: resolve_entities(text, table),
    }
}

/// Anchors each template entity at its first occurrence in `text` and
/// converts the byte position to a character offset.
fn resolve_entities(text: &str, table: &[(&str, EntityLabel, f32)]) -> Vec<NamedEntity> {
    let mut entities = Vec::with_capacity(table.len());

    for (span, label, confidence) in table {
        let Some(byte_start) = text.find(*span) else {
            tracing::error!("extraction template out of sync: '{}' not in text", span);
            continue;
        };

        let start = text[..byte_start].chars().count();
        let end = start + span.chars().count();

        entities.push(NamedEntity {
            text: (*span).to_string(),
            label: *label,
            confidence: *confidence,
            start,
            end,
        });
    }

    entities
}

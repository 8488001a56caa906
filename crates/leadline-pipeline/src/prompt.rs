//! LLM prompt for CRM field extraction

/// Builds the extraction prompt for one meeting summary
pub struct PromptBuilder<'a> {
    summary: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(summary: &'a str) -> Self {
        Self { summary }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::with_capacity(
            EXTRACTION_INSTRUCTIONS.len() + OUTPUT_RULES.len() + self.summary.len() + 32,
        );

        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");
        prompt.push_str(OUTPUT_RULES);
        prompt.push_str("\n\nMeeting Summary:\n");
        prompt.push_str(self.summary);
        prompt.push('\n');

        prompt
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"You are a CRM data extraction expert. Extract information from the meeting summary and return ONLY valid JSON.

Required JSON structure:
{
  "contact": {
    "name": "string or null",
    "title": "string or null",
    "email": "string or null",
    "phone": "string or null"
  },
  "company": {
    "name": "string or null",
    "industry": "string or null",
    "size": "string or null",
    "budget": "string or null"
  },
  "deal": {
    "value": "string or null",
    "stage": "string or null",
    "timeline": "string or null",
    "competitor": "string or null",
    "next_action": "string or null"
  }
}"#;

const OUTPUT_RULES: &str = r#"Rules:
- Return ONLY the JSON object, no other text
- Use null for missing information
- Ensure all JSON is properly formatted
- Extract information accurately from the context"#;

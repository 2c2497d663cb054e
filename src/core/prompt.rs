//! Prompt templates sent to the generative-text provider
//!
//! Each builder produces a single self-contained instruction string. Filter
//! clauses are emitted only for filters that are actually set.

use crate::models::{AnalysisRequest, ChatMessage, ChatRole, SearchFilters};

/// Number of facilities the provider is asked to return
pub const FACILITIES_PER_RESPONSE: usize = 5;

const FACILITY_STRUCTURE: &str = r#"Format each facility as a JSON object with these properties:
{
  "name": "Facility Name",
  "type": "Specific type (Hospital/Clinic/etc)",
  "address": "Full street address",
  "distance": number (kilometers from provided location),
  "rating": number (1-5),
  "phone": "Formatted phone number",
  "hours": "Operating hours",
  "services": ["Array of available services"],
  "coordinates": {
    "lat": exact_latitude,
    "lng": exact_longitude
  },
  "description": "Detailed facility description",
  "emergency": boolean,
  "insurance": ["Accepted insurance providers"],
  "website": "Facility website URL",
  "reviews": number
}"#;

/// Build the facility search instruction for a location and filters
pub fn facility_prompt(location: &str, filters: &SearchFilters) -> String {
    let base = format!(
        "Act as a healthcare facility database. For the given location ({}), provide detailed information about nearby healthcare facilities.",
        location
    );

    let requirements = filter_clauses(filters).join("\n");

    let response_guide = format!(
        "Important requirements:
1. Return exactly {} most relevant facilities based on the filters
2. Ensure all coordinates are accurate for the given addresses
3. Provide realistic and accurate information
4. Format as a valid JSON array
5. Include detailed service descriptions
6. Specify emergency service availability
7. Include accurate distance calculations from the provided location",
        FACILITIES_PER_RESPONSE
    );

    let mut sections = vec![base];
    if !requirements.is_empty() {
        sections.push(requirements);
    }
    sections.push(FACILITY_STRUCTURE.to_string());
    sections.push(response_guide);
    sections.push(
        "Return only the JSON array without any markdown formatting or additional text.".to_string(),
    );

    sections.join("\n\n")
}

/// One instruction line per active filter, in a fixed order
pub fn filter_clauses(filters: &SearchFilters) -> Vec<String> {
    let mut clauses = Vec::new();

    if let Some(facility_type) = filters.active_type() {
        clauses.push(format!("Focus on {} facilities.", facility_type));
    }
    if let Some(max_distance) = filters.active_max_distance() {
        clauses.push(format!("Include facilities within {} km.", max_distance));
    }
    if filters.emergency_only {
        clauses.push("Prioritize facilities with emergency services.".to_string());
    }
    if filters.hours_24 {
        clauses.push("Include facilities that operate 24/7.".to_string());
    }
    if !filters.insurance.is_empty() {
        clauses.push(format!(
            "Show facilities accepting these insurances: {}.",
            join(&filters.insurance)
        ));
    }
    if let Some(min_rating) = filters.active_min_rating() {
        clauses.push(format!(
            "Include facilities with ratings of {} or higher.",
            min_rating
        ));
    }
    if !filters.specialties.is_empty() {
        clauses.push(format!(
            "Focus on facilities offering these specialties: {}.",
            join(&filters.specialties)
        ));
    }
    if let Some(query) = filters.active_query() {
        clauses.push(format!("Particularly look for facilities matching: {}", query));
    }

    clauses
}

const ANALYSIS_TEMPLATE: &str = r#"You are an advanced medical analysis system. Analyze the following patient data and provide a comprehensive medical assessment.

Patient Data:
Symptoms: {symptoms}
Severity: {severity}
Duration: {duration}
Medical History:
- Conditions: {conditions}
- Medications: {medications}
- Allergies: {allergies}
- Surgeries: {surgeries}
Lifestyle Factors:
- Smoking: {smoking}
- Alcohol: {alcohol}
- Exercise: {exercise}
- Diet: {diet}
- Stress: {stress}
- Sleep: {sleep}
Recent Changes: {recentChanges}
Family History: {familyHistory}

Provide a detailed analysis focusing on these key areas:

1. Potential Conditions (3-5 conditions)
2. Lifestyle Impact Analysis (at least 4 factors)
3. Medication Considerations (at least 3 types)
4. Comprehensive Recommendations

Return a detailed JSON response with the following structure:

{
  "conditions": [
    {
      "condition": "Name of condition",
      "probability": "High/Moderate/Low",
      "description": "Detailed description of the condition",
      "reasoning": ["Specific symptom matches", "Risk factor correlations"],
      "commonSymptoms": ["Typical symptoms of the condition"],
      "riskFactors": ["Age-related factors", "Lifestyle impacts"],
      "suggestedTests": ["Specific diagnostic tests"]
    }
  ],
  "urgencyLevel": {
    "level": "Emergency/Urgent/Soon/Routine",
    "reasoning": ["Detailed reason for urgency level"],
    "timeframe": "Specific timeframe recommendation"
  },
  "lifestyleImpact": [
    {
      "factor": "Specific lifestyle factor",
      "impact": "How this factor affects the condition",
      "recommendations": ["Specific actionable change"]
    }
  ],
  "medicationConsiderations": [
    {
      "type": "Category of medication",
      "warning": "Specific interaction or contraindication warning",
      "recommendation": "Detailed medication guidance"
    }
  ],
  "preventiveMeasures": ["Specific preventive action"],
  "followUpRecommendations": ["Timeframe for follow-up"],
  "specialistReferrals": ["Specific type of specialist"],
  "redFlags": ["Critical warning signs"],
  "disclaimer": "Medical disclaimer emphasizing professional consultation"
}

Use exactly one of High, Moderate or Low for probability and one of Emergency, Urgent, Soon or Routine for level.
Return only the JSON object without any markdown formatting or additional text."#;

/// Build the symptom analysis instruction for a patient
pub fn analysis_prompt(request: &AnalysisRequest) -> String {
    let history = &request.medical_history;
    let lifestyle = &request.lifestyle;

    ANALYSIS_TEMPLATE
        .replace("{symptoms}", &request.symptoms.join(", "))
        .replace("{severity}", or_default(&request.severity, "Not specified"))
        .replace("{duration}", or_default(&request.duration, "Not specified"))
        .replace("{conditions}", &join_or(&history.conditions, "None"))
        .replace("{medications}", &join_or(&history.medications, "None"))
        .replace("{allergies}", &join_or(&history.allergies, "None"))
        .replace("{surgeries}", &join_or(&history.surgeries, "None"))
        .replace("{smoking}", if lifestyle.smoking { "true" } else { "false" })
        .replace("{alcohol}", or_default(&lifestyle.alcohol, "Not specified"))
        .replace("{exercise}", or_default(&lifestyle.exercise, "Not specified"))
        .replace("{diet}", or_default(&lifestyle.diet, "Not specified"))
        .replace("{stress}", or_default(&lifestyle.stress, "Not specified"))
        .replace("{sleep}", or_default(&lifestyle.sleep, "Not specified"))
        .replace("{recentChanges}", or_default(&request.recent_changes, "None reported"))
        .replace("{familyHistory}", &join_or(&request.family_history, "None reported"))
}

const MEDICAL_CONTEXT: &str = r#"You are an advanced medical AI assistant named HealNav Assistant. Format your responses using proper markdown:

Formatting Guidelines:
- Use ## for section headers
- Use **bold** for emphasis
- Use proper bullet points with "-" or numbered lists with "1."
- Use > for important quotes or warnings
- Use proper line breaks between sections

Your responses should be:
1. Professional yet friendly and empathetic
2. Structured with clear sections
3. Include relevant medical terminology with layman explanations
4. Always emphasize the importance of consulting healthcare professionals
5. Use proper markdown formatting for clarity
6. Provide actionable recommendations

Remember to:
- Immediately identify emergency situations
- Cite general medical guidelines when relevant
- Explain both benefits and risks
- Use simple language while being thorough
- Be clear about your limitations as an AI"#;

/// Build the next chat turn: assistant persona, prior turns, then the new message
pub fn chat_prompt(history: &[ChatMessage], message: &str) -> String {
    let conversation = history
        .iter()
        .map(|turn| {
            let speaker = match turn.role {
                ChatRole::User => "User",
                ChatRole::Assistant => "Assistant",
            };
            format!("{}: {}", speaker, turn.content)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{}\n\nConversation history:\n{}\n\nUser: {}\nAssistant:",
        MEDICAL_CONTEXT, conversation, message
    )
}

fn join<'a, I>(items: I) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    items.into_iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

fn join_or(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        items.join(", ")
    }
}

fn or_default<'a>(value: &'a str, empty: &'a str) -> &'a str {
    if value.trim().is_empty() {
        empty
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filters_emit_no_clauses() {
        assert!(filter_clauses(&SearchFilters::default()).is_empty());

        let prompt = facility_prompt("40.7,-74.0", &SearchFilters::default());
        assert!(prompt.contains("(40.7,-74.0)"));
        assert!(!prompt.contains("Focus on"));
        assert!(!prompt.contains("Prioritize"));
        assert!(!prompt.contains("Include facilities within"));
    }

    #[test]
    fn test_active_filters_emit_clauses_in_order() {
        let filters = SearchFilters {
            facility_type: Some("hospital".to_string()),
            max_distance_km: Some(10.0),
            emergency_only: true,
            hours_24: true,
            insurance: ["Medicare".to_string(), "Aetna".to_string()].into_iter().collect(),
            min_rating: Some(4.0),
            search_query: Some("pediatrics".to_string()),
            specialties: ["Cardiology".to_string()].into_iter().collect(),
        };

        let clauses = filter_clauses(&filters);
        assert_eq!(clauses.len(), 8);
        assert_eq!(clauses[0], "Focus on hospital facilities.");
        assert_eq!(clauses[1], "Include facilities within 10 km.");
        // BTreeSet keeps insurances sorted
        assert_eq!(clauses[4], "Show facilities accepting these insurances: Aetna, Medicare.");
        assert_eq!(clauses[5], "Include facilities with ratings of 4 or higher.");
        assert_eq!(clauses[7], "Particularly look for facilities matching: pediatrics");
    }

    #[test]
    fn test_all_type_and_zero_values_are_unset() {
        let filters = SearchFilters {
            facility_type: Some("all".to_string()),
            max_distance_km: Some(0.0),
            min_rating: Some(0.0),
            search_query: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(filter_clauses(&filters).is_empty());
    }

    #[test]
    fn test_prompt_demands_bare_json_array() {
        let prompt = facility_prompt("here", &SearchFilters::default());
        assert!(prompt.contains("Return exactly 5 most relevant facilities"));
        assert!(prompt.ends_with("Return only the JSON array without any markdown formatting or additional text."));
        for field in ["\"name\"", "\"coordinates\"", "\"emergency\"", "\"insurance\"", "\"website\"", "\"reviews\""] {
            assert!(prompt.contains(field), "missing field {}", field);
        }
    }

    #[test]
    fn test_chat_prompt_replays_history() {
        let history = vec![
            ChatMessage { role: ChatRole::User, content: "I have a headache".to_string() },
            ChatMessage { role: ChatRole::Assistant, content: "How long has it lasted?".to_string() },
        ];

        let prompt = chat_prompt(&history, "Two days");

        assert!(prompt.starts_with("You are an advanced medical AI assistant named HealNav Assistant."));
        assert!(prompt.contains(
            "Conversation history:\nUser: I have a headache\nAssistant: How long has it lasted?\n\n"
        ));
        assert!(prompt.ends_with("User: Two days\nAssistant:"));
    }

    #[test]
    fn test_analysis_prompt_fills_placeholders() {
        let request = AnalysisRequest {
            symptoms: vec!["headache".to_string(), "fever".to_string()],
            severity: "moderate".to_string(),
            duration: "3 days".to_string(),
            ..Default::default()
        };

        let prompt = analysis_prompt(&request);
        assert!(prompt.contains("Symptoms: headache, fever"));
        assert!(prompt.contains("- Conditions: None"));
        assert!(prompt.contains("Recent Changes: None reported"));
        assert!(prompt.contains("- Smoking: false"));
        assert!(!prompt.contains("{symptoms}"));
        assert!(!prompt.contains("{familyHistory}"));
    }
}

// src/extraction/schema.rs
//! JSON schema handed to the structured-output service. The generated object
//! is still re-validated by deserializing into `CandidateFields`.

use serde_json::{json, Value};

pub fn candidate_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "name": { "type": "string", "description": "Full name of the recruiting professional" },
            "email": { "type": "string", "description": "Email address if available" },
            "phone": { "type": "string", "description": "Phone number if available" },
            "location": { "type": "string", "description": "Current location/city/country" },
            "linkedin_url": { "type": "string", "description": "LinkedIn profile URL" },

            "current_job_title": { "type": "string", "description": "Current job title/position" },
            "current_company": { "type": "string", "description": "Current company name" },
            "years_in_current_role": { "type": "number", "description": "Years in current position" },
            "total_years_experience": { "type": "number", "description": "Total years of professional recruiting experience" },

            "industries": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Industries they recruit for (e.g., Technology, FMCG, Healthcare, Finance, Manufacturing, Retail, Automotive, Pharma, Consulting)"
            },
            "seniority_levels_placed": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Seniority levels they typically place (e.g., Graduate, Junior, Mid-level, Senior, Manager, Director, VP, C-Level, Board)"
            },
            "market_focus": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Market segments they focus on (e.g., Local market, Expat candidates, Regional APAC, Global mobility, Niche specialists)"
            },
            "recruitment_tools": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Tools and platforms they use (e.g., LinkedIn Recruiter, Workday, Greenhouse, ATS systems, Boolean search, Xing, Indeed)"
            },
            "sourcing_methods": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Their approach and methodology (e.g., BD focused, Delivery only, 360 recruitment, Headhunting, Executive search, RPO, Contingency, Retained search)"
            },

            "current_salary": { "type": "string", "description": "Current salary/compensation package" },
            "commission_structure": { "type": "string", "description": "Commission, bonus structure, or incentive plan" },
            "revenue_generated": { "type": "string", "description": "Revenue generated, billing targets, or placement fees achieved" },

            "ai_summary": {
                "type": "string",
                "description": "Comprehensive professional summary highlighting key strengths, specializations, and market positioning (2-3 sentences)"
            },
            "strengths": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Key professional strengths, achievements, and competitive advantages (be specific about recruiting capabilities)"
            },
            "red_flags": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Potential concerns or risks (e.g., frequent job changes, employment gaps, unclear career progression)"
            },
            "push_factors": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Factors that might push them to leave their current role"
            },
            "pull_factors": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Factors that would attract them to new opportunities"
            },
            "stay_factors": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Factors that might keep them in their current role"
            },
            "likelihood_score": {
                "type": "number",
                "minimum": 0,
                "maximum": 100,
                "description": "Likelihood of being open to new opportunities based on career stage, recent changes, and market indicators (0-100)"
            },

            "business_development_exposure": {
                "type": "string",
                "description": "Level of BD/sales exposure and client-facing experience"
            },
            "client_facing_strength": {
                "type": "string",
                "description": "Assessment of client relationship and communication skills based on profile content"
            },
            "career_trajectory": {
                "type": "string",
                "description": "Analysis of career progression pattern"
            },
            "market_reputation": {
                "type": "string",
                "description": "Indicators of market standing and professional reputation"
            },

            "languages": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Languages mentioned or inferred"
            },
            "cultural_background": {
                "type": "string",
                "description": "Cultural background or market familiarity relevant for recruiting roles"
            },

            "confidence_scores": {
                "type": "object",
                "description": "Confidence level (0-100) for each extracted field based on clarity and availability of information",
                "additionalProperties": { "type": "number", "minimum": 0, "maximum": 100 }
            },
            "extraction_quality": {
                "type": "string",
                "enum": ["excellent", "good", "fair", "poor"],
                "description": "Overall quality of information available for extraction"
            },
            "missing_critical_info": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Critical information that could not be extracted and should be gathered"
            }
        },
        "required": ["name", "extraction_quality"]
    })
}

/// Schema for the second-pass strategic enhancement call.
pub fn enhancement_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "enhanced_summary": {
                "type": "string",
                "description": "Enhanced professional summary with strategic insights"
            },
            "risk_factors": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Potential risks or challenges in hiring"
            },
            "value_proposition": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Unique value they would bring to a team"
            },
            "updated_likelihood_score": {
                "type": "number",
                "minimum": 0,
                "maximum": 100,
                "description": "Refined likelihood score based on deeper analysis"
            },
            "next_steps": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Recommended next steps for engaging this candidate"
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_schema_requires_name_and_quality() {
        let schema = candidate_schema();
        let required = schema["required"].as_array().unwrap();
        assert!(required.iter().any(|v| v == "name"));
        assert!(required.iter().any(|v| v == "extraction_quality"));
    }

    #[test]
    fn test_candidate_schema_lists_all_array_fields() {
        let schema = candidate_schema();
        let props = schema["properties"].as_object().unwrap();
        for field in [
            "industries",
            "seniority_levels_placed",
            "market_focus",
            "recruitment_tools",
            "sourcing_methods",
            "strengths",
            "red_flags",
            "push_factors",
            "pull_factors",
            "stay_factors",
            "languages",
        ] {
            assert_eq!(props[field]["type"], "array", "field {}", field);
        }
    }
}

// All LLM prompt constants for the Analysis module.
// Placeholders are `{name}` and are filled in one pass by `fill_template`, so
// text inserted for one placeholder is never scanned for another.

/// Résumé analysis template. Replace `{resume_text}`.
/// The SCORE / FEEDBACK / SUGGESTIONS layout is what `ai_parser::free_text` reads.
pub const RESUME_ANALYSIS_TEMPLATE: &str = r#"Analyze the following resume and provide:

1. An overall score from 0-100 based on:
- Formatting and readability
- Content quality and relevance
- Skills presentation
- Experience descriptions
- Grammar and professionalism

2. Detailed feedback covering:
- What the resume does well
- What needs improvement
- Missing elements

3. Specific actionable suggestions for improvement

Resume to analyze:
{resume_text}

Provide your response in this format:
SCORE: [number 0-100]
FEEDBACK: [your detailed analysis]
SUGGESTIONS: [numbered list of improvements]"#;

/// Cover letter template. Replace `{job_title}`, `{company_name}`,
/// `{job_description}` and `{resume_text}`. The completion is stored verbatim.
pub const COVER_LETTER_TEMPLATE: &str = r#"Write a professional cover letter for the position of {job_title} at {company_name}.

Job description:
{job_description}

Candidate resume:
{resume_text}

Rules:
- Three to four paragraphs, under 400 words
- Only mention experience that appears in the resume
- Address the specific requirements of the job description
- Return only the letter text, with no headings or commentary"#;

/// Job match template. Replace `{job_description}` and `{resume_text}`.
pub const JOB_MATCH_TEMPLATE: &str = r#"Compare the candidate resume with the job description.

Job description:
{job_description}

Candidate resume:
{resume_text}

Return a JSON object with this EXACT schema (no extra fields):
{
  "match_percentage": 75,
  "matching_skills": ["Python", "SQL"],
  "missing_skills": ["Kubernetes"],
  "suggestions": ["Highlight your data pipeline work"]
}

match_percentage is an integer from 0 to 100."#;

/// ATS compatibility template. Replace `{resume_text}`.
pub const ATS_CHECK_TEMPLATE: &str = r#"Evaluate how well the following resume will be parsed by applicant tracking systems (ATS).

Consider section headings, layout (tables, columns, graphics), file-friendly fonts,
keyword usage, contact details and date formats.

Resume:
{resume_text}

Return a JSON object with this EXACT schema (no extra fields):
{
  "ats_score": 82,
  "issues_found": ["Contact details are inside a header block"],
  "recommendations": ["Move contact details into the document body"],
  "is_ats_friendly": true
}

ats_score is an integer from 0 to 100. is_ats_friendly is true when ats_score is 70 or above."#;

pub fn resume_analysis_prompt(resume_text: &str) -> String {
    fill_template(RESUME_ANALYSIS_TEMPLATE, &[("resume_text", resume_text)])
}

pub fn cover_letter_prompt(
    job_title: &str,
    company_name: &str,
    job_description: &str,
    resume_text: &str,
) -> String {
    fill_template(
        COVER_LETTER_TEMPLATE,
        &[
            ("job_title", job_title),
            ("company_name", company_name),
            ("job_description", job_description),
            ("resume_text", resume_text),
        ],
    )
}

pub fn job_match_prompt(job_description: &str, resume_text: &str) -> String {
    fill_template(
        JOB_MATCH_TEMPLATE,
        &[("job_description", job_description), ("resume_text", resume_text)],
    )
}

pub fn ats_check_prompt(resume_text: &str) -> String {
    fill_template(ATS_CHECK_TEMPLATE, &[("resume_text", resume_text)])
}

/// Replaces each `{name}` in `template` whose name is in `vars`. Braces that do
/// not enclose a known name (the JSON schemas) are copied through unchanged.
fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(
        template.len() + vars.iter().map(|(_, v)| v.len()).sum::<usize>(),
    );
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let known = after.find('}').and_then(|end| {
            let name = &after[..end];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, end))
        });
        match known {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_prompt_asks_for_parser_markers() {
        let prompt = resume_analysis_prompt("Jane Doe\nRust engineer");
        assert!(prompt.contains("Jane Doe\nRust engineer"));
        assert!(prompt.contains("SCORE:"));
        assert!(prompt.contains("FEEDBACK:"));
        assert!(prompt.contains("SUGGESTIONS:"));
        assert!(!prompt.contains("{resume_text}"));
    }

    #[test]
    fn test_cover_letter_prompt_fills_every_placeholder() {
        let prompt = cover_letter_prompt("Data Engineer", "Acme", "Build pipelines", "Jane Doe");
        assert!(prompt.contains("Data Engineer at Acme"));
        assert!(prompt.contains("Build pipelines"));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn test_job_match_prompt_carries_schema_keys() {
        let prompt = job_match_prompt("JD", "CV");
        for key in ["match_percentage", "matching_skills", "missing_skills", "suggestions"] {
            assert!(prompt.contains(key), "missing {key}");
        }
    }

    #[test]
    fn test_prompts_are_deterministic() {
        assert_eq!(ats_check_prompt("CV"), ats_check_prompt("CV"));
        assert!(ats_check_prompt("CV").contains("\"is_ats_friendly\""));
    }

    #[test]
    fn test_placeholder_text_in_inputs_is_left_alone() {
        let prompt = job_match_prompt("Must know {resume_text}", "SECRET_CV");
        assert_eq!(prompt.matches("SECRET_CV").count(), 1);
        assert!(prompt.contains("Must know {resume_text}"));

        let letter = cover_letter_prompt("{company_name}", "Acme", "{job_title}", "CV");
        assert!(letter.contains("position of {company_name} at Acme"));
        assert!(letter.contains("Job description:\n{job_title}"));
    }

    #[test]
    fn test_schema_braces_survive_filling() {
        let prompt = job_match_prompt("JD", "CV");
        assert!(prompt.contains("{\n  \"match_percentage\": 75,"));
        assert!(prompt.trim_end().ends_with("integer from 0 to 100."));
    }
}

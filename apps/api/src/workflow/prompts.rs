// Gateway prompt templates, one per request kind.

pub const TAILOR_SYSTEM: &str = "\
You are an expert resume writer and applicant-tracking-system specialist. \
You rewrite resumes stored as JSON so they match a target role while staying truthful. \
You MUST respond with valid JSON only. No markdown fences, no explanations.";

pub const OPTIMIZE_PROMPT_TEMPLATE: &str = r#"Rewrite the resume below so it is tailored to the job description.

{fidelity_instruction}

JOB DESCRIPTION:
{job_description}

RESUME (JSON):
{resume_json}

Return exactly this structure:
{
  "resume": <the full rewritten resume, same JSON shape as the input>,
  "metadata": {
    "improvementsCount": number,
    "keywordsMatched": ["string"],
    "wordCount": number,
    "changes": [{"type": "modified" | "added" | "removed", "section": "string", "description": "string", "before": "string", "after": "string", "reason": "string"}]
  }
}"#;

pub const ADJUST_PROMPT_TEMPLATE: &str = r#"Apply the following instruction to the resume below. Change only what the instruction asks for.

{fidelity_instruction}

INSTRUCTION:
{instructions}

RESUME (JSON):
{resume_json}

Return exactly this structure:
{
  "resume": <the full adjusted resume, same JSON shape as the input>,
  "metadata": {
    "improvementsCount": number,
    "changes": [{"type": "string", "section": "string", "description": "string"}]
  }
}"#;

pub const CONVERT_PROMPT_TEMPLATE: &str = r#"Convert the plain-text resume below into structured JSON. Use only information present in the text.

RESUME TEXT:
{resume_text}

Return a single JSON object with this shape:
{
  "basics": {"name": "string", "headline": "string", "email": "string", "phone": "string", "location": "string", "url": {"label": "string", "href": "string"}},
  "sections": {
    "summary": {"id": "summary", "name": "Summary", "visible": true, "content": "string"},
    "experience": {"id": "experience", "name": "Experience", "visible": true, "items": [
      {"id": "string", "visible": true, "company": "string", "position": "string", "location": "string", "date": "string", "summary": "string"}
    ]},
    "education": {"id": "education", "name": "Education", "visible": true, "items": [
      {"id": "string", "visible": true, "institution": "string", "studyType": "string", "area": "string", "score": "string", "date": "string"}
    ]},
    "projects": {"id": "projects", "name": "Projects", "visible": true, "items": [
      {"id": "string", "visible": true, "name": "string", "description": "string", "date": "string", "keywords": ["string"]}
    ]},
    "skills": {"id": "skills", "name": "Skills", "visible": true, "items": [
      {"id": "string", "visible": true, "name": "string", "level": "string", "keywords": ["string"]}
    ]}
  }
}
Omit sections the text has no content for. Every item needs a unique string "id"."#;

//! Skill detection over extracted resume text.

/// Keywords recognised in resumes, in reporting order.
pub const SKILL_KEYWORDS: &[&str] = &[
    "JavaScript",
    "TypeScript",
    "Python",
    "Java",
    "C++",
    "C#",
    "Go",
    "Rust",
    "Ruby",
    "PHP",
    "React",
    "Angular",
    "Vue",
    "Node",
    "Express",
    "Django",
    "Flask",
    "Spring",
    "MongoDB",
    "PostgreSQL",
    "MySQL",
    "Redis",
    "Docker",
    "Kubernetes",
    "AWS",
    "Azure",
    "GCP",
    "Git",
    "REST",
    "GraphQL",
    "HTML",
    "CSS",
];

/// Returned when nothing recognisable was found or the file could not be read.
pub const FALLBACK_SKILL: &str = "General";

pub fn fallback_skills() -> Vec<String> {
    vec![FALLBACK_SKILL.to_string()]
}

/// Lower-cases and collapses all whitespace runs to single spaces.
fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Keywords that appear as case-insensitive substrings of `text`, in
/// keyword-list order, or the fallback when none do.
pub fn detect_skills(text: &str) -> Vec<String> {
    let haystack = normalize_text(text);
    let found: Vec<String> = SKILL_KEYWORDS
        .iter()
        .filter(|skill| haystack.contains(&skill.to_lowercase()))
        .map(|skill| skill.to_string())
        .collect();

    if found.is_empty() {
        fallback_skills()
    } else {
        found
    }
}

//! The `examforge init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create examforge.toml
    if std::path::Path::new("examforge.toml").exists() {
        println!("examforge.toml already exists, skipping.");
    } else {
        std::fs::write("examforge.toml", SAMPLE_CONFIG)?;
        println!("Created examforge.toml");
    }

    // Create example exam documents
    std::fs::create_dir_all("exams")?;
    write_if_absent("exams/se-2025-06-05-questions.toml", EXAMPLE_QUESTIONS)?;
    write_if_absent("exams/se-2025-06-05-responses.toml", EXAMPLE_RESPONSES)?;
    write_if_absent("exams/se-2025-06-05-grades.toml", EXAMPLE_GRADES)?;

    // Create example checklists
    std::fs::create_dir_all("solutions")?;
    write_if_absent("solutions/CI-1.toml", EXAMPLE_CHECKLIST_CI)?;
    write_if_absent("solutions/VC-1.toml", EXAMPLE_CHECKLIST_VC)?;

    println!("\nNext steps:");
    println!("  1. Edit examforge.toml or export GROQ_API_KEY");
    println!("  2. Run: examforge validate --date 2025-06-05");
    println!("  3. Run: examforge run --date 2025-06-05");

    Ok(())
}

fn write_if_absent(path: &str, content: &str) -> Result<()> {
    if std::path::Path::new(path).exists() {
        println!("{path} already exists, skipping.");
    } else {
        std::fs::write(path, content)?;
        println!("Created {path}");
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# examforge configuration

[providers.groq]
type = "groq"
api_key = "${GROQ_API_KEY}"

default_provider = "groq"
default_model = "llama-3.3-70b-versatile"
default_temperature = 0.1
max_tokens = 8000
workers = 3
exams_dir = "./exams"
solutions_dir = "./solutions"
output_dir = "./evaluations"
"#;

const EXAMPLE_QUESTIONS: &str = r#"[[questions]]
id = "CI-1"
text = "Explain what continuous integration is and why teams use it."
score = 3.0

[[questions]]
id = "VC-1"
text = "What is a merge conflict and how do you resolve one?"
score = 3.0
"#;

const EXAMPLE_RESPONSES: &str = r#"[[students]]
emailaddress = "alice@university.edu"
state = "Finished"
startedon = "5 June 2025 9:00 AM"
completed = "5 June 2025 10:13 AM"
timetaken = "1 hour 13 mins"
response1 = "CI means every push triggers an automated build and test run, so integration problems surface early."
response2 = "A merge conflict happens when two branches change the same lines; you resolve it by editing the conflict markers and committing."

[[students]]
emailaddress = "bob@university.edu"
state = "Finished"
startedon = "5 June 2025 9:02 AM"
completed = "5 June 2025 9:55 AM"
timetaken = "53 mins"
response1 = "It is about merging code often."
response2 = "-"
"#;

const EXAMPLE_GRADES: &str = r#"[[grades]]
emailaddress = "alice@university.edu"
state = "Finished"
grade2700 = 5.5
q1123 = 3.0
q2456 = 2.5

[[grades]]
emailaddress = "bob@university.edu"
state = "Finished"
grade2700 = 1.0
q1123 = 1.0
q2456 = 0.0
"#;

const EXAMPLE_CHECKLIST_CI: &str = r#"core = [
    "mentions automated builds or tests triggered by commits",
    "mentions integrating changes frequently",
]
details_important = [
    "names a concrete CI tool or service",
    "mentions early detection of integration problems",
]
"#;

const EXAMPLE_CHECKLIST_VC: &str = r#"core = [
    "explains that a conflict arises from overlapping edits",
    "describes resolving the conflicting sections manually",
]
details_important = [
    "mentions conflict markers or a merge tool",
]
"#;

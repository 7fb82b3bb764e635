pub mod prompt_versions;
pub mod prompts;
pub mod qa_prompts;

//! The `palabras init` command.

use std::path::Path;

use anyhow::{Context, Result};

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("palabras.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("suite").context("failed to create suite/")?;
    write_if_missing(Path::new("suite/vocabulary_short.json"), SAMPLE_VOCABULARY)?;
    write_if_missing(Path::new("suite/prompts.json"), SAMPLE_PROMPTS)?;
    write_if_missing(Path::new("suite/models_list.txt"), SAMPLE_MODELS)?;

    println!("\nNext steps:");
    println!("  1. Export OPENAI_API_KEY for the judge model");
    println!("  2. Edit suite/models_list.txt (prefix a line with # to disable it)");
    println!("  3. Run: palabras validate");
    println!("  4. Run: palabras run");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# palabras configuration

suite_dir = "suite"
output_dir = "output"
summary_file = "summary.json"
temperature = 0.7
max_tokens = 500

# Models under test are served locally.
[generator]
type = "ollama"
base_url = "http://localhost:11434"

# The judge runs on a hosted provider.
[judge]
model = "gpt-4o-mini"

[judge.provider]
type = "openai"
api_key = "${OPENAI_API_KEY}"
"#;

const SAMPLE_VOCABULARY: &str = r#"[
  {"word": "casa", "answer": "house; a building where people live"},
  {"word": "perro", "answer": "dog"},
  {"word": "libro", "answer": "book"}
]
"#;

const SAMPLE_PROMPTS: &str = r#"{
  "prompt_a": "What does the Spanish word \"{word}\" mean? Answer with a short definition in English.",
  "prompt_b": "Use the Spanish word \"{word}\" in two sentences."
}
"#;

const SAMPLE_MODELS: &str = "llama3.1:8b\nmistral:7b\n# qwen2.5:7b\n";

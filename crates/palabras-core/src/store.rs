//! On-disk result store.
//!
//! Layout: `<root>/<model>/<word>.json`, one [`ResultRecord`] per file holding
//! both prompt variants. The directory tree is the single source of truth;
//! every write replaces a whole file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::model::ResultRecord;

/// A model directory found in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDir {
    /// Directory name, used as the model key in summaries.
    pub name: String,
    pub path: PathBuf,
}

/// Directory tree of result records.
#[derive(Debug, Clone)]
pub struct ResultStore {
    root: PathBuf,
}

impl ResultStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn model_dir(&self, model: &str) -> PathBuf {
        self.root.join(path_component(model))
    }

    pub fn record_path(&self, model: &str, word: &str) -> PathBuf {
        self.model_dir(model)
            .join(format!("{}.json", path_component(word)))
    }

    /// Write a record to its canonical location, replacing any previous file.
    pub fn save(&self, record: &ResultRecord) -> Result<PathBuf> {
        let path = self.record_path(&record.model, &record.word);
        Self::save_to(&path, record)?;
        Ok(path)
    }

    /// Write a record to an explicit path.
    pub fn save_to(path: &Path, record: &ResultRecord) -> Result<()> {
        let json = serde_json::to_string_pretty(record).context("failed to serialize record")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        // Write a sibling temp file, then rename over the target.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .with_context(|| format!("failed to write record to {}", tmp.display()))?;
        std::fs::rename(&tmp, path)
            .with_context(|| format!("failed to write record to {}", path.display()))?;
        Ok(())
    }

    /// Read a record file.
    pub fn load(path: &Path) -> Result<ResultRecord> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read record from {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse record {}", path.display()))
    }

    /// All model directories, sorted by name. A missing root is empty.
    pub fn model_dirs(&self) -> Result<Vec<ModelDir>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut dirs = Vec::new();
        for entry in std::fs::read_dir(&self.root)
            .with_context(|| format!("failed to read directory {}", self.root.display()))?
        {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                dirs.push(ModelDir {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    path,
                });
            }
        }
        dirs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(dirs)
    }

    /// All `.json` record files in a model directory, sorted by path.
    pub fn record_files(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)
            .with_context(|| format!("failed to read directory {}", dir.display()))?
        {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

/// Make a model name or word safe to use as a single path component.
pub fn path_component(name: &str) -> String {
    let cleaned = name.trim().replace(['/', '\\'], "_");
    match cleaned.as_str() {
        "" => "_".to_string(),
        "." | ".." => cleaned.replace('.', "_"),
        _ => cleaned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{VariantResult, Verdict, VocabularyEntry};

    fn record(model: &str, word: &str) -> ResultRecord {
        let mut record = ResultRecord::new(
            &VocabularyEntry {
                word: word.into(),
                answer: "house".into(),
            },
            model,
        );
        record.prompt_a = VariantResult::generated(format!("Define {word}"), "A house.");
        record.prompt_b = VariantResult::generated(format!("Use {word}"), "Mi casa. Tu casa.");
        record
    }

    #[test]
    fn path_components() {
        assert_eq!(path_component("llama3.1:8b"), "llama3.1:8b");
        assert_eq!(path_component("meta/llama-3"), "meta_llama-3");
        assert_eq!(path_component(".."), "__");
        assert_eq!(path_component("  "), "_");
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path().join("output"));

        let mut original = record("m1", "casa");
        original
            .prompt_a
            .set_verdict(Verdict::Correct, "Correct, it means house.");
        let path = store.save(&original).unwrap();

        assert_eq!(path, dir.path().join("output").join("m1").join("casa.json"));
        assert!(!path.with_extension("json.tmp").exists());
        let loaded = ResultStore::load(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path());

        store.save(&record("m1", "casa")).unwrap();
        let mut second = record("m1", "casa");
        second.prompt_a.model_response = "Una casa.".into();
        let path = store.save(&second).unwrap();

        assert_eq!(
            ResultStore::load(&path).unwrap().prompt_a.model_response,
            "Una casa."
        );
        assert_eq!(ResultStore::record_files(&store.model_dir("m1")).unwrap().len(), 1);
    }

    #[test]
    fn missing_root_has_no_models() {
        let store = ResultStore::new("/nonexistent/palabras-output");
        assert!(store.model_dirs().unwrap().is_empty());
    }

    #[test]
    fn lists_model_dirs_and_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        store.save(&record("m2", "perro")).unwrap();
        store.save(&record("m1", "casa")).unwrap();
        store.save(&record("m1", "libro")).unwrap();
        std::fs::create_dir_all(dir.path().join("empty")).unwrap();
        std::fs::write(dir.path().join("m1").join("notes.txt"), "ignored").unwrap();
        std::fs::write(dir.path().join("stray.json"), "{}").unwrap();

        let dirs = store.model_dirs().unwrap();
        let names: Vec<_> = dirs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["empty", "m1", "m2"]);

        let files = ResultStore::record_files(&dirs[1].path).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("casa.json"));
        assert!(ResultStore::record_files(&dirs[0].path).unwrap().is_empty());
    }
}

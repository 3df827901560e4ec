//! 选项目录：显示标签到内部代码、代码到取值的双向映射
//!
//! Option catalogs. Each entry has a display label (often Chinese), a stable
//! code sent to the model or service, and an optional typed value. Entries keep
//! registration order so `labels()` can drive a selection list.

pub mod prompts;

pub use prompts::{
    build_prompt, BuiltPrompt, MemoryMode, CAPTION_LENGTHS, CAPTION_TYPES, EXEC_OPTIONS,
    EXTRA_OPTIONS, MEMORY_MODES,
};

#[derive(Debug, Clone)]
struct Entry<V> {
    label: String,
    code: String,
    value: V,
}

/// Ordered label → code → value table.
#[derive(Debug, Clone)]
pub struct LabelCatalog<V> {
    entries: Vec<Entry<V>>,
}

impl<V> LabelCatalog<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add an entry. Re-registering a label or code replaces the old entry in place.
    pub fn register(&mut self, label: impl Into<String>, code: impl Into<String>, value: V) -> &mut Self {
        let entry = Entry {
            label: label.into(),
            code: code.into(),
            value,
        };
        match self
            .entries
            .iter()
            .position(|e| e.label == entry.label || e.code == entry.code)
        {
            Some(idx) => self.entries[idx] = entry,
            None => self.entries.push(entry),
        }
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, label: impl Into<String>, code: impl Into<String>, value: V) -> Self {
        self.register(label, code, value);
        self
    }

    pub fn code_for(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.code.as_str())
    }

    pub fn value_for(&self, code: &str) -> Option<&V> {
        self.entries.iter().find(|e| e.code == code).map(|e| &e.value)
    }

    /// Accept either a label or a code; returns the code.
    pub fn resolve(&self, label_or_code: &str) -> Option<&str> {
        self.code_for(label_or_code).or_else(|| {
            self.entries
                .iter()
                .find(|e| e.code == label_or_code)
                .map(|e| e.code.as_str())
        })
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    pub fn codes(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.code.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for LabelCatalog<V> {
    fn default() -> Self {
        Self::new()
    }
}

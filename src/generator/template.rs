//! Worker template with typed variable injection.
//!
//! Placeholders are `__NAME__` tokens standing where a JS expression goes.
//! Every value is rendered as a JS literal (strings through JSON, patterns as
//! `new RegExp(...)`), and all tokens are replaced in one pass, so an inserted
//! value is never itself substituted.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::path::Path;
use std::sync::LazyLock;

use super::GenerationError;
use super::entries::PrecacheEntry;
use crate::config::{GeneratorConfig, RuntimeCaching};

/// Built-in worker template.
const SERVICE_WORKER_JS: &str = include_str!("template/service-worker.js");

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__([A-Z][A-Z_]*[A-Z])__").unwrap());

/// Trait for template variable sets
pub trait TemplateVars {
    fn apply(&self, content: &str) -> String;
}

/// Template with typed variable injection
#[derive(Debug, Clone)]
pub struct Template {
    content: Cow<'static, str>,
}

impl Template {
    /// The embedded default template.
    pub const fn builtin() -> Self {
        Self {
            content: Cow::Borrowed(SERVICE_WORKER_JS),
        }
    }

    /// A user template read from disk.
    pub fn from_path(path: &Path) -> Result<Self, GenerationError> {
        let content = std::fs::read_to_string(path)
            .map_err(|err| GenerationError::Io(path.to_path_buf(), err))?;
        Ok(Self {
            content: Cow::Owned(content),
        })
    }

    /// Built-in template unless `templateFilePath` is set.
    pub fn for_config(config: &GeneratorConfig) -> Result<Self, GenerationError> {
        match &config.template_file_path {
            Some(path) => Self::from_path(path),
            None => Ok(Self::builtin()),
        }
    }

    pub fn render(&self, vars: &impl TemplateVars) -> String {
        vars.apply(&self.content)
    }
}

/// Variables for the worker template.
pub struct WorkerVars<'a> {
    pub entries: &'a [PrecacheEntry],
    pub config: &'a GeneratorConfig,
}

impl WorkerVars<'_> {
    /// JS literal for one placeholder name, `None` if the name is not ours.
    fn value(&self, name: &str) -> Option<String> {
        let config = self.config;
        let value = match name {
            "VERSION" => env!("CARGO_PKG_VERSION").to_string(),
            "PRECACHE_CONFIG" => precache_config(self.entries),
            "CACHE_ID" => js_string(&config.cache_id),
            "DIRECTORY_INDEX" => js_string(config.directory_index.as_deref().unwrap_or_default()),
            "IGNORE_URL_PARAMETERS_MATCHING" => {
                js_regex_array(&config.ignore_url_parameters_matching)
            }
            "DONT_CACHE_BUST_URLS_MATCHING" => config
                .dont_cache_bust_urls_matching
                .as_deref()
                .map_or_else(|| "false".to_string(), js_regex),
            "NAVIGATE_FALLBACK_WHITELIST" => js_regex_array(&config.navigate_fallback_whitelist),
            "NAVIGATE_FALLBACK" => {
                js_string(config.navigate_fallback.as_deref().unwrap_or_default())
            }
            "RUNTIME_CACHING" => runtime_caching(&config.runtime_caching),
            "HANDLE_FETCH" => js_bool(config.handle_fetch).to_string(),
            "SKIP_WAITING" => js_bool(config.skip_waiting).to_string(),
            "CLIENTS_CLAIM" => js_bool(config.clients_claim).to_string(),
            "IMPORT_SCRIPTS" => import_scripts(&config.import_scripts),
            _ => return None,
        };
        Some(value)
    }
}

impl TemplateVars for WorkerVars<'_> {
    /// Single pass over the template; inserted values are never rescanned.
    fn apply(&self, content: &str) -> String {
        PLACEHOLDER
            .replace_all(content, |caps: &Captures| {
                self.value(&caps[1]).unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

/// `[["url","revision"],...]`
fn precache_config(entries: &[PrecacheEntry]) -> String {
    let pairs: Vec<[&str; 2]> = entries
        .iter()
        .map(|e| [e.url.as_str(), e.revision.as_str()])
        .collect();
    serde_json::to_string(&pairs).unwrap_or_else(|_| "[]".into())
}

fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".into())
}

fn js_bool(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

fn js_regex(source: &str) -> String {
    format!("new RegExp({})", js_string(source))
}

fn js_regex_array(sources: &[String]) -> String {
    let items: Vec<String> = sources.iter().map(|s| js_regex(s)).collect();
    format!("[{}]", items.join(", "))
}

fn runtime_caching(rules: &[RuntimeCaching]) -> String {
    let items: Vec<String> = rules
        .iter()
        .map(|rule| {
            let handler = serde_json::to_string(&rule.handler).unwrap_or_else(|_| "\"\"".into());
            let mut item = format!(
                "{{urlPattern: {}, handler: {}",
                js_regex(&rule.url_pattern),
                handler
            );
            if let Some(options) = &rule.options {
                if let Some(name) = &options.cache_name {
                    item.push_str(&format!(", cacheName: {}", js_string(name)));
                }
                if let Some(max) = options.max_entries {
                    item.push_str(&format!(", maxEntries: {max}"));
                }
            }
            item.push('}');
            item
        })
        .collect();
    format!("[{}]", items.join(", "))
}

fn import_scripts(urls: &[String]) -> String {
    if urls.is_empty() {
        return String::new();
    }
    let args: Vec<String> = urls.iter().map(|u| js_string(u)).collect();
    format!("importScripts({});\n", args.join(", "))
}

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum I18nError {
    #[error("failed to read i18n directory {path}: {source}")]
    ReadDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read message file {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse message file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 普通字符串，或 { "one", "other" } 复数形式，由参数 Count 选择
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Message {
    Plain(String),
    Plural { one: Option<String>, other: String },
}

impl Message {
    fn select(&self, count: Option<i64>) -> &str {
        match self {
            Message::Plain(text) => text,
            Message::Plural { one, other } => match (count, one) {
                (Some(1), Some(one)) => one,
                _ => other,
            },
        }
    }
}

pub type Messages = HashMap<String, Message>;

#[derive(Debug, Clone)]
pub struct Translator {
    default_locale: String,
    bundles: HashMap<String, Messages>,
}

impl Translator {
    pub fn new(default_locale: impl Into<String>) -> Self {
        Self {
            default_locale: default_locale.into(),
            bundles: HashMap::new(),
        }
    }

    pub fn with_messages(mut self, locale: impl Into<String>, messages: Messages) -> Self {
        self.bundles.entry(locale.into()).or_default().extend(messages);
        self
    }

    /// 加载目录下所有 active.<locale>.json 文件
    pub fn load_dir(dir: impl AsRef<Path>, default_locale: &str) -> Result<Self, I18nError> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|source| I18nError::ReadDir {
            path: dir.display().to_string(),
            source,
        })?;

        let mut translator = Translator::new(default_locale);
        for entry in entries {
            let path = entry
                .map_err(|source| I18nError::ReadDir {
                    path: dir.display().to_string(),
                    source,
                })?
                .path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            let Some(locale) = locale_from_file_name(&path) else {
                tracing::warn!("Skipping message file without locale: {}", path.display());
                continue;
            };

            let raw = fs::read_to_string(&path).map_err(|source| I18nError::ReadFile {
                path: path.display().to_string(),
                source,
            })?;
            let messages: Messages =
                serde_json::from_str(&raw).map_err(|source| I18nError::Parse {
                    path: path.display().to_string(),
                    source,
                })?;

            tracing::info!(
                locale = %locale,
                file = %path.display(),
                message_count = messages.len(),
                "Loaded locale messages"
            );
            translator = translator.with_messages(locale, messages);
        }

        Ok(translator)
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// 查找顺序：请求语言 → 默认语言 → message key 本身
    pub fn translate(&self, locale: &str, key: &str, params: Option<&Value>) -> String {
        let message = self
            .lookup(locale, key)
            .or_else(|| self.lookup(&self.default_locale, key));

        let Some(message) = message else {
            tracing::warn!(lang = %locale, id = %key, "Failed to localize message");
            return key.to_string();
        };

        let count = params
            .and_then(|p| p.get("Count"))
            .and_then(|c| c.as_i64().or_else(|| c.as_f64().map(|f| f as i64)));
        render(message.select(count), params)
    }

    fn lookup(&self, locale: &str, key: &str) -> Option<&Message> {
        self.bundles.get(locale).and_then(|messages| messages.get(key))
    }
}

fn locale_from_file_name(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let (_, locale) = stem.rsplit_once('.')?;
    (!locale.is_empty()).then(|| locale.to_string())
}

// 单次从左到右替换，已替换的值不会再被扫描
fn render(template: &str, params: Option<&Value>) -> String {
    let Some(Value::Object(params)) = params else {
        return template.to_string();
    };

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };

        let name = &after[..close];
        match params.get(name) {
            Some(Value::String(s)) => out.push_str(s),
            Some(other) => out.push_str(&other.to_string()),
            None => out.push_str(&rest[open..open + close + 2]),
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

//! Prompt templates for llmfn functions.
//!
//! Every prompt is a versioned, testable artifact. The built-in templates
//! below are compiled in; [`PromptEngine::from_directory`] can override them
//! with TOML files (see `prompts/v1/`).
//!
//! Placeholders use `{key}`. Anything in braces that is not a known key is
//! left alone, so CSS and code samples inside templates need no escaping.

/// Math function: answer with the number only.
pub const MATH_SYSTEM: &str = r"You are a mathematical computation function. You ONLY output the numerical result.
Examples:
Input: 2 + 2=
Output: 4

Input: What is 5 * 3?
Output: 15

Input: Calculate 10/2
Output: 5";

pub const MATH_USER: &str = r"{question}";

/// String function: apply a named text operation.
pub const STRING_SYSTEM: &str = r"You are a string manipulation function. You ONLY output the exact result with NO additional text.
Examples:
Input Operation: reverse
Input Text: hello world
Output: dlrow olleh

Input Operation: capitalize
Input Text: hello world
Output: HELLO WORLD

Input Operation: count_words
Input Text: hello beautiful world
Output: 3

Input Operation: remove_punctuation
Input Text: Hello, World! How are you?
Output: Hello World How are you

IMPORTANT:
- Return ONLY the processed result
- For remove_punctuation, preserve spaces between words
- For count_words, return only the number
- Never add explanations or extra text";

pub const STRING_USER: &str = r"Input Operation: {operation}
Input Text: {text}";

/// Code function: rewrite code according to an operation.
pub const CODE_SYSTEM: &str = r"You are an expert {language} developer. You modify code based on requested operations.
ONLY output the modified code with NO explanations.

Examples:
Input Operation: optimize
Input Code:
def factorial(n):
    if n == 0: return 1
    return n * factorial(n-1)
Output:
def factorial(n):
    result = 1
    for i in range(1, n + 1):
        result *= i
    return result

Input Operation: add_typing
Input Code:
def merge_lists(list1, list2):
    return sorted(list1 + list2)
Output:
def merge_lists(list1: list[int], list2: list[int]) -> list[int]:
    return sorted(list1 + list2)

IMPORTANT:
- Return ONLY the modified code
- Preserve functionality while improving code
- Follow language best practices
- No comments or explanations in output";

pub const CODE_USER: &str = r"Input Operation: {operation}
Input Code:
{code}";

/// Debug function: four labelled sections, parsed by
/// `llmfn_core::sections`.
pub const DEBUG_SYSTEM: &str = r"You are an expert debugging assistant. Analyze errors and provide clear, actionable solutions.
ONLY respond in this exact format with these exact sections:

ANALYSIS:
<single line brief error analysis>

ROOT_CAUSE:
<single line root cause>

FIX:
<code or steps to fix>

PREVENTION:
<bullet points for prevention>

DO NOT include any other text or sections.";

pub const DEBUG_USER: &str = r"Debug this error:
{error_context}";

/// Web function: two delimited blocks, parsed by `llmfn_core::blocks`.
pub const WEB_SYSTEM: &str = r#"You are an expert web developer. Generate valid HTML5 and CSS3 based on descriptions.
Return ONLY the code in this format:
---HTML---
<your html here>
---CSS---
<your css here>

Example:
Input Operation: form
Input Content: Create a login form with email and password
Style: minimal
Output:
---HTML---
<form class="login-form">
    <input type="email" placeholder="Email" required>
    <input type="password" placeholder="Password" required>
    <button type="submit">Login</button>
</form>
---CSS---
.login-form {
    display: flex;
    flex-direction: column;
    gap: 1rem;
    max-width: 300px;
}

IMPORTANT:
- Generate semantic HTML5
- Use modern CSS features
- Ensure accessibility
- Keep it responsive
- Follow {style} design principles"#;

pub const WEB_USER: &str = r"Input Operation: {operation}
Input Content: {content}
Style: {style}";

/// Vision function.
pub const VISION_SYSTEM: &str =
    r"You are a precise image analysis model. Respond with accurate, factual descriptions only.";

pub const VISION_USER: &str = r"{prompt}";

/// Template interpolation for prompts.
///
/// Replaces `{key}` with the corresponding value in a single pass, so text
/// inserted from one variable is never re-scanned for another. Unknown
/// placeholders are kept verbatim.
#[must_use]
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let key = &after[..close];
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, value)| (*value, close))
        });
        match replaced {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
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

// ---------------------------------------------------------------------------
// PromptEngine — Versioned TOML Template Loader
// ---------------------------------------------------------------------------

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::LlmError;

/// Identifies a prompt template by purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    /// Numeric answers.
    Math,
    /// Text operations.
    String,
    /// Code rewriting.
    Code,
    /// Error analysis in four sections.
    Debug,
    /// HTML + CSS generation.
    Web,
    /// Image description.
    Vision,
}

impl PromptId {
    /// Returns the TOML filename (without path) for this prompt.
    #[must_use]
    pub fn filename(self) -> &'static str {
        match self {
            Self::Math => "math.toml",
            Self::String => "string.toml",
            Self::Code => "code.toml",
            Self::Debug => "debug.toml",
            Self::Web => "web.toml",
            Self::Vision => "vision.toml",
        }
    }

    /// All prompt IDs.
    #[must_use]
    pub fn all() -> &'static [PromptId] {
        &[
            Self::Math,
            Self::String,
            Self::Code,
            Self::Debug,
            Self::Web,
            Self::Vision,
        ]
    }
}

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Math => "math",
            Self::String => "string",
            Self::Code => "code",
            Self::Debug => "debug",
            Self::Web => "web",
            Self::Vision => "vision",
        };
        write!(f, "{name}")
    }
}

impl FromStr for PromptId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "math" => Ok(Self::Math),
            "string" => Ok(Self::String),
            "code" => Ok(Self::Code),
            "debug" => Ok(Self::Debug),
            "web" => Ok(Self::Web),
            "vision" => Ok(Self::Vision),
            _ => Err(format!("unknown prompt id: '{s}'")),
        }
    }
}

/// Metadata and templates parsed from a TOML prompt file.
#[derive(Debug, Clone, Deserialize)]
struct TomlPromptFile {
    prompt: TomlPromptData,
}

/// Inner `[prompt]` section of a TOML file.
#[derive(Debug, Clone, Deserialize)]
struct TomlPromptData {
    version: String,
    #[serde(default)]
    max_tokens: Option<u32>,
    system: String,
    user: String,
}

/// A loaded, ready-to-render prompt template.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// Prompt version string (e.g., "1.0").
    pub version: String,
    /// Maximum output tokens, if the prompt wants a cap.
    pub max_tokens: Option<u32>,
    /// System prompt template (contains `{key}` placeholders).
    pub system: String,
    /// User prompt template (contains `{key}` placeholders).
    pub user: String,
}

impl PromptTemplate {
    fn builtin(system: &str, user: &str) -> Self {
        Self {
            version: "builtin".into(),
            max_tokens: None,
            system: system.into(),
            user: user.into(),
        }
    }
}

/// Engine that holds prompt templates and renders them.
///
/// # Example
///
/// ```
/// use llmfn_llm::prompt::{PromptEngine, PromptId};
///
/// let engine = PromptEngine::builtin();
/// let (system, user) = engine
///     .render(PromptId::String, &[("operation", "reverse"), ("text", "hello")])
///     .unwrap();
/// assert!(system.contains("string manipulation"));
/// assert!(user.ends_with("Input Text: hello"));
/// ```
#[derive(Debug, Clone)]
pub struct PromptEngine {
    templates: HashMap<PromptId, PromptTemplate>,
}

impl PromptEngine {
    /// Create a `PromptEngine` pre-loaded with the built-in constant templates.
    #[must_use]
    pub fn builtin() -> Self {
        let mut templates = HashMap::new();
        templates.insert(PromptId::Math, PromptTemplate::builtin(MATH_SYSTEM, MATH_USER));
        templates.insert(PromptId::String, PromptTemplate::builtin(STRING_SYSTEM, STRING_USER));
        templates.insert(PromptId::Code, PromptTemplate::builtin(CODE_SYSTEM, CODE_USER));
        templates.insert(PromptId::Debug, PromptTemplate::builtin(DEBUG_SYSTEM, DEBUG_USER));
        templates.insert(PromptId::Web, PromptTemplate::builtin(WEB_SYSTEM, WEB_USER));
        templates.insert(PromptId::Vision, PromptTemplate::builtin(VISION_SYSTEM, VISION_USER));
        Self { templates }
    }

    /// Load prompt templates from a directory of TOML files.
    ///
    /// Each file named after a [`PromptId`] replaces the built-in template
    /// for that ID; the rest keep their built-in version. Unknown files are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ConfigError`] if a file exists but cannot be read
    /// or parsed, or if the directory holds no prompt files at all.
    pub fn from_directory(dir: impl AsRef<Path>) -> Result<Self, LlmError> {
        let dir = dir.as_ref();
        let mut engine = Self::builtin();
        let mut loaded = 0usize;

        for id in PromptId::all() {
            let path = dir.join(id.filename());
            if !path.exists() {
                continue;
            }
            let content = std::fs::read_to_string(&path).map_err(|e| {
                LlmError::ConfigError(format!("failed to read {}: {e}", path.display()))
            })?;
            let parsed: TomlPromptFile = toml::from_str(&content).map_err(|e| {
                LlmError::ConfigError(format!("failed to parse {}: {e}", path.display()))
            })?;

            let d = parsed.prompt;
            engine.templates.insert(*id, PromptTemplate {
                version: d.version,
                max_tokens: d.max_tokens,
                system: d.system,
                user: d.user,
            });
            loaded += 1;
        }

        if loaded == 0 {
            return Err(LlmError::ConfigError(format!(
                "no prompt templates found in directory: {}",
                dir.display()
            )));
        }

        tracing::info!(dir = %dir.display(), loaded, "Loaded prompt templates");
        Ok(engine)
    }

    /// Get a loaded prompt template by ID.
    #[must_use]
    pub fn get(&self, id: PromptId) -> Option<&PromptTemplate> {
        self.templates.get(&id)
    }

    /// Render both system and user prompts for a given ID.
    ///
    /// Returns `(system_prompt, user_prompt)` with all known `{key}`
    /// placeholders replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt ID is not loaded.
    pub fn render(
        &self,
        id: PromptId,
        vars: &[(&str, &str)],
    ) -> Result<(String, String), LlmError> {
        let tpl = self.get(id).ok_or_else(|| {
            LlmError::ConfigError(format!("prompt template '{id}' not loaded"))
        })?;

        let system = render_template(&tpl.system, vars);
        let user = render_template(&tpl.user, vars);
        Ok((system, user))
    }

    /// Number of loaded templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether no templates are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for PromptEngine {
    fn default() -> Self {
        Self::builtin()
    }
}
